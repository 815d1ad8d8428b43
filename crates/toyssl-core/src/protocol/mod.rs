pub mod codes;
pub mod traits;
pub mod types;

pub mod codec;
pub mod extensions;
pub mod suites;

#[cfg(test)]
mod extensions_tests;

pub use codes::*;
pub use extensions::*;
pub use suites::*;
pub use traits::*;
pub use types::*;

use crate::wire::WireError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Wire(#[from] WireError),

    #[error("expected {expected} message, got type {got}")]
    TypeMismatch { expected: HandshakeType, got: u8 },

    #[error("unknown handshake type: {0}")]
    UnknownHandshakeType(u8),

    #[error("unknown {field} code: {code:#x}")]
    UnknownCode { field: &'static str, code: u32 },

    #[error("{field}: declared length {declared} but {actual} bytes remain")]
    LengthMismatch { field: &'static str, declared: usize, actual: usize },

    #[error("{remaining} trailing bytes after {field}")]
    TrailingBytes { field: &'static str, remaining: usize },

    #[error("invalid ChangeCipherSpec payload: {0:02x?}")]
    BadChangeCipherSpec(Vec<u8>),

    #[error("empty handshake record")]
    EmptyRecord,
}
