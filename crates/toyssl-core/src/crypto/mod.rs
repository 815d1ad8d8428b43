pub mod traits;
pub mod types;

pub mod dh;
pub mod prf;
pub mod rsa;

#[cfg(test)]
pub(crate) mod test_keys;


pub use dh::*;
pub use prf::*;
pub use rsa::*;
pub use traits::*;
pub use types::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("cannot PKCS#1 pad {len} bytes into {target} bytes")]
    MessageTooLong { len: usize, target: usize },

    #[error("malformed PKCS#1 padding: {0}")]
    BadPadding(&'static str),

    #[error("signature verification failed")]
    BadSignature,

    #[error("signature value is not smaller than the modulus")]
    SignatureOutOfRange,

    #[error("invalid DH parameters: {0}")]
    InvalidParameters(&'static str),

    #[error("DH public value out of range (0, p)")]
    InvalidPublicValue,

    #[error("DH session holds no private exponent")]
    MissingPrivateExponent,

    #[error("unsupported public key: {0}")]
    UnsupportedKey(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(&'static str),

    #[error("certificate decode failed: {0}")]
    Certificate(String),
}
