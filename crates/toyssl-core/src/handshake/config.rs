use crate::{
    crypto::{DhParams, RsaPrivateKey},
    framing::ProtocolVersion,
    protocol::{
        AuthAlgorithm, BulkCipher, CipherMode, CipherSuite, CipherSuiteDirectory, CompressionMethod, Extension,
        ExtensionType, HashAlgorithm, KeyExchangeAlgorithm, SignatureAlgorithm, SignatureAndHash, SuiteFilter,
    },
};

// What the client offers in its hello.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub version: ProtocolVersion,
    pub cipher_suites: Vec<CipherSuite>,
    pub compression_methods: Vec<CompressionMethod>,
    pub extensions: Option<Vec<Extension>>,
}

impl ClientConfig {
    // Every DHE_RSA suite with 128-bit AES in CBC mode.
    pub fn dhe_rsa_aes128_cbc() -> Vec<CipherSuite> {
        CipherSuiteDirectory::filter(&SuiteFilter {
            kex: Some(KeyExchangeAlgorithm::Dh),
            auth: Some(AuthAlgorithm::Rsa),
            cipher: Some(BulkCipher::Aes),
            key_bits: Some(128),
            mode: Some(CipherMode::Cbc),
            ..SuiteFilter::default()
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: ProtocolVersion::Ssl3_0,
            cipher_suites: Self::dhe_rsa_aes128_cbc(),
            compression_methods: vec![CompressionMethod::Null],
            extensions: Some(vec![
                Extension::SignatureAlgorithms(vec![SignatureAndHash::new(
                    SignatureAlgorithm::Ecdsa,
                    HashAlgorithm::Sha256,
                )]),
                Extension::Unknown { ext_type: ExtensionType::Heartbeat.code(), data: vec![0x01] },
            ]),
        }
    }
}

// Server identity and preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    // Highest version the server speaks.
    pub version: ProtocolVersion,
    // Leaf first, DER.
    pub certificate_chain: Vec<Vec<u8>>,
    pub private_key: RsaPrivateKey,
    pub dh_params: DhParams,
    // Preference order; the first one the client also offers wins.
    pub cipher_suites: Vec<CipherSuite>,
}

impl ServerConfig {
    pub fn new(certificate_chain: Vec<Vec<u8>>, private_key: RsaPrivateKey, dh_params: DhParams) -> Self {
        Self {
            version: ProtocolVersion::Tls1_0,
            certificate_chain,
            private_key,
            dh_params,
            cipher_suites: vec![CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA],
        }
    }
}
