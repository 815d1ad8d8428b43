use num_bigint::BigUint;

use crate::{
    crypto::{derive_master_secret, CryptoError, DhParams, MasterSecret, PrfMode},
    framing::ProtocolVersion,
    protocol::{CipherSuite, Random},
    trace::Explanation,
};

// What both peers agree on once the key exchange is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstablishedSession {
    pub version: ProtocolVersion,
    pub cipher_suite: CipherSuite,
    pub prf: PrfMode,
    pub client_random: Random,
    pub server_random: Random,
    pub master_secret: MasterSecret,
}

impl EstablishedSession {
    // Runs the PRF selected by `version` over the pre-master secret.
    pub fn derive(
        version: ProtocolVersion,
        cipher_suite: CipherSuite,
        pre_master_secret: &[u8],
        client_random: Random,
        server_random: Random,
    ) -> Result<Self, CryptoError> {
        let prf = PrfMode::for_version(version);
        let master_secret = derive_master_secret(prf, pre_master_secret, &client_random, &server_random)?;
        Ok(Self { version, cipher_suite, prf, client_random, server_random, master_secret })
    }
}

// Inputs and outputs of one side's DH agreement, for the trace.
pub(crate) struct KeyAgreement<'a> {
    pub params: &'a DhParams,
    pub own_public: &'a BigUint,
    pub peer_public: &'a BigUint,
    pub shared: &'a [u8],
    pub session: &'a EstablishedSession,
}

impl KeyAgreement<'_> {
    pub fn explain(&self, title: &str) -> Explanation {
        let mut step = Explanation::new(title);
        step.push("DH modulus p", self.params.p.to_bytes_be())
            .push("DH generator g", self.params.g.to_bytes_be())
            .push("Own public value", self.own_public.to_bytes_be())
            .push("Peer public value", self.peer_public.to_bytes_be())
            .push("Pre-master secret", self.shared)
            .push("Client random", self.session.client_random.0)
            .push("Server random", self.session.server_random.0)
            .push("Master secret", self.session.master_secret);
        step
    }
}
