/*
    toyssl-net-tokio
      - TCP connect / accept for toyssl peers.
      - Drives a HandshakeMachine over a reassembling record stream.
*/
pub mod conn;
pub mod error;

pub use conn::*;
pub use error::NetError;
