/*
    toyssl-core
        SSLv3 / TLS 1.0 handshake engine for study:
        wire codec, record framing, handshake messages,
        DHE_RSA key agreement and the master secret PRF.
 */

pub mod error;

pub mod wire;
pub mod framing;
pub mod protocol;
pub mod crypto;
pub mod handshake;
pub mod trace;

pub use error::ToysslError;

#[cfg(test)]
mod lib_tests;
