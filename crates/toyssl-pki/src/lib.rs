/*
    toyssl-pki
      - x509-parser backed implementation of toyssl-core's CertificateDecoder.
      - Loaders for the server's PEM files: certificate chain, RSA key, DH parameters.
      - All ASN.1 walking is confined to `der`.
*/
mod der;
pub mod error;

use std::path::Path;

use toyssl_core::crypto::{CertificateDecoder, CryptoError, DhParams, PublicKey, RsaPrivateKey};

pub use error::PkiError;

pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";
pub const PKCS8_KEY_LABEL: &str = "PRIVATE KEY";
pub const PKCS1_KEY_LABEL: &str = "RSA PRIVATE KEY";
pub const DH_PARAMS_LABEL: &str = "DH PARAMETERS";

/// Certificate decoder backed by x509-parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct X509Decoder;

impl X509Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl CertificateDecoder for X509Decoder {
    fn public_key(&self, der: &[u8]) -> Result<PublicKey, CryptoError> {
        der::x509::subject_public_key(der).map_err(|e| CryptoError::Certificate(e.to_string()))
    }
}

// Every CERTIFICATE block, in file order, as DER.
pub fn parse_certificate_chain_pem(pem: &[u8]) -> Result<Vec<Vec<u8>>, PkiError> {
    let chain = der::pem::blocks(pem, &[CERTIFICATE_LABEL])?;
    if chain.is_empty() {
        return Err(der::pem::missing(&[CERTIFICATE_LABEL]));
    }
    Ok(chain.into_iter().map(|b| b.contents).collect())
}

// First RSA key, PKCS#8 or PKCS#1.
pub fn parse_private_key_pem(pem: &[u8]) -> Result<RsaPrivateKey, PkiError> {
    let block = der::pem::first(pem, &[PKCS8_KEY_LABEL, PKCS1_KEY_LABEL])?;
    if block.label == PKCS8_KEY_LABEL {
        der::keys::rsa_from_pkcs8(&block.contents)
    } else {
        der::keys::rsa_from_pkcs1(&block.contents)
    }
}

pub fn parse_dh_params_pem(pem: &[u8]) -> Result<DhParams, PkiError> {
    let block = der::pem::first(pem, &[DH_PARAMS_LABEL])?;
    der::keys::dh_params(&block.contents)
}

pub fn load_certificate_chain(path: impl AsRef<Path>) -> Result<Vec<Vec<u8>>, PkiError> {
    let path = path.as_ref();
    parse_certificate_chain_pem(&read(path)?).map_err(|e| e.in_file(path))
}

pub fn load_private_key(path: impl AsRef<Path>) -> Result<RsaPrivateKey, PkiError> {
    let path = path.as_ref();
    parse_private_key_pem(&read(path)?).map_err(|e| e.in_file(path))
}

pub fn load_dh_params(path: impl AsRef<Path>) -> Result<DhParams, PkiError> {
    let path = path.as_ref();
    parse_dh_params_pem(&read(path)?).map_err(|e| e.in_file(path))
}

fn read(path: &Path) -> Result<Vec<u8>, PkiError> {
    std::fs::read(path).map_err(|source| PkiError::Io { path: path.display().to_string(), source })
}

#[cfg(test)]
mod tests;
