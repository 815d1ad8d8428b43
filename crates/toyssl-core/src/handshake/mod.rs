pub mod traits;
pub mod types;

pub mod client;
pub mod config;
pub mod server;
pub mod transcript;

#[cfg(test)]
pub(crate) mod test_certs;

#[cfg(test)]
mod client_tests;

pub use client::*;
pub use config::*;
pub use server::*;
pub use traits::*;
pub use transcript::*;
pub use types::*;

use crate::{
    crypto::CryptoError,
    framing::ProtocolVersion,
    protocol::{CipherSuite, CompressionMethod, MessageKind, ProtocolError},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandshakeError {
    #[error("unexpected {got} in state {state}")]
    UnexpectedMessage { state: &'static str, got: MessageKind },

    #[error("handshake not started")]
    NotStarted,

    #[error("handshake already complete")]
    AlreadyComplete,

    #[error("no cipher suite in common with the peer")]
    NoCommonCipherSuite,

    #[error("peer does not offer null compression")]
    NoNullCompression,

    #[error("server answered with {0}, above the offered version")]
    VersionTooHigh(ProtocolVersion),

    #[error("server selected {0}, which was not offered")]
    UnofferedCipherSuite(CipherSuite),

    #[error("server selected compression {0}, which was not offered")]
    UnofferedCompression(CompressionMethod),

    #[error("no {0} retained in the message log")]
    MissingMessage(MessageKind),

    #[error("server certificate chain is empty")]
    EmptyCertificateChain,

    #[error("server certificate carries an {0} key, DHE_RSA needs rsa")]
    WrongKeyType(&'static str),

    #[error("ServerKeyExchange signature rejected: {0}")]
    BadSignature(CryptoError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
