use std::time::Duration;

use thiserror::Error;

use toyssl_core::{framing::FramingError, handshake::HandshakeError, protocol::ProtocolError};

#[derive(Debug, Error)]
pub enum NetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("handshake error: {0}")]
    Handshake(#[from] HandshakeError),

    #[error("peer closed the connection before the handshake completed")]
    PeerClosed,

    #[error("connecting to {addr} timed out after {after:?}")]
    ConnectTimeout { addr: String, after: Duration },

    #[error("no free port on {host} in {first}..={last}")]
    NoFreePort { host: String, first: u16, last: u16 },
}
