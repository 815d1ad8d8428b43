use std::sync::Arc;

use crate::{
    crypto::{test_keys, CertificateDecoder, CryptoError, PublicKey},
    handshake::{ClientConfig, ClientHandshake, ServerConfig, ServerHandshake},
    trace::RecordingTrace,
};

pub(crate) const FAKE_CERT: &[u8] = b"not really DER, the decoder below knows it";

// Hands out a fixed key for FAKE_CERT and refuses anything else.
#[derive(Debug)]
pub(crate) struct StaticDecoder(pub PublicKey);

impl CertificateDecoder for StaticDecoder {
    fn public_key(&self, der: &[u8]) -> Result<PublicKey, CryptoError> {
        if der == FAKE_CERT {
            Ok(self.0.clone())
        } else {
            Err(CryptoError::Certificate("unknown test certificate".into()))
        }
    }
}

pub(crate) fn server_config() -> ServerConfig {
    ServerConfig::new(vec![FAKE_CERT.to_vec()], test_keys::rsa_1024(), test_keys::dh_512())
}

pub(crate) fn rsa_decoder() -> Arc<StaticDecoder> {
    Arc::new(StaticDecoder(PublicKey::Rsa(test_keys::rsa_1024().public_key())))
}

pub(crate) struct Pair {
    pub client: ClientHandshake,
    pub server: ServerHandshake,
    pub client_trace: Arc<RecordingTrace>,
    pub server_trace: Arc<RecordingTrace>,
}

pub(crate) fn pair(client_config: ClientConfig, server_config: ServerConfig) -> Pair {
    let client_trace = Arc::new(RecordingTrace::new());
    let server_trace = Arc::new(RecordingTrace::new());
    Pair {
        client: ClientHandshake::new(client_config, rsa_decoder(), client_trace.clone()),
        server: ServerHandshake::new(server_config, server_trace.clone()),
        client_trace,
        server_trace,
    }
}
