use thiserror::Error;

use crate::{
    crypto::CryptoError,
    framing::FramingError,
    handshake::HandshakeError,
    protocol::ProtocolError,
    wire::WireError,
};

#[derive(Debug, Error)]
pub enum ToysslError {
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("handshake error: {0}")]
    Handshake(#[from] HandshakeError),
}
