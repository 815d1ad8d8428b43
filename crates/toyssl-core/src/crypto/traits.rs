use crate::crypto::{CryptoError, PublicKey};

// Seam to the certificate parser. The handshake only ever needs the
// subject public key of a DER certificate.
pub trait CertificateDecoder: Send + Sync {
    fn public_key(&self, der: &[u8]) -> Result<PublicKey, CryptoError>;
}
