use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::BigUint;
use rand::{rngs::OsRng, RngCore};

use crate::{
    framing::ProtocolVersion,
    protocol::{CipherSuite, CompressionMethod, Extension, HandshakeType},
};

pub const RANDOM_LEN: usize = 32;

// Hello random: 4-byte big-endian Unix time followed by 28 random bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Random(pub [u8; RANDOM_LEN]);

impl Random {
    pub fn generate() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        Self::with_timestamp(now)
    }

    pub fn with_timestamp(unix_time: u32) -> Self {
        let mut out = [0u8; RANDOM_LEN];
        out[..4].copy_from_slice(&unix_time.to_be_bytes());
        OsRng.fill_bytes(&mut out[4..]);
        Random(out)
    }

    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub version: ProtocolVersion,
    pub random: Random,
    pub session_id: Vec<u8>,
    pub cipher_suites: Vec<CipherSuite>,
    pub compression_methods: Vec<CompressionMethod>,
    // None when the hello ends without an extensions block.
    pub extensions: Option<Vec<Extension>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    pub version: ProtocolVersion,
    pub random: Random,
    pub session_id: Vec<u8>,
    pub cipher_suite: CipherSuite,
    pub compression_method: CompressionMethod,
    pub extensions: Option<Vec<Extension>>,
}

// Certificate chain, leaf first, each entry a DER blob.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Certificate {
    pub chain: Vec<Vec<u8>>,
}

impl Certificate {
    pub fn leaf(&self) -> Option<&[u8]> {
        self.chain.first().map(Vec::as_slice)
    }
}

/// DHE ServerKeyExchange.
///
/// The integers are kept as the big-endian bytes seen on the wire so the
/// signed payload can be rebuilt exactly, whatever encoding the peer used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerKeyExchange {
    pub p: Vec<u8>,
    pub g: Vec<u8>,
    pub public_value: Vec<u8>,
    pub signature: Vec<u8>,
}

impl ServerKeyExchange {
    pub fn new_dhe(p: &BigUint, g: &BigUint, public_value: &BigUint) -> Self {
        Self {
            p: p.to_bytes_be(),
            g: g.to_bytes_be(),
            public_value: public_value.to_bytes_be(),
            signature: Vec::new(),
        }
    }

    pub fn p(&self) -> BigUint {
        BigUint::from_bytes_be(&self.p)
    }

    pub fn g(&self) -> BigUint {
        BigUint::from_bytes_be(&self.g)
    }

    pub fn public_value(&self) -> BigUint {
        BigUint::from_bytes_be(&self.public_value)
    }
}

// DHE ClientKeyExchange. The exercised flow leaves `signature` empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKeyExchange {
    pub public_value: Vec<u8>,
    pub signature: Option<Vec<u8>>,
}

impl ClientKeyExchange {
    pub fn new_dhe(public_value: &BigUint) -> Self {
        Self { public_value: public_value.to_bytes_be(), signature: None }
    }

    pub fn public_value(&self) -> BigUint {
        BigUint::from_bytes_be(&self.public_value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerHelloDone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeMessage {
    ClientHello(ClientHello),
    ServerHello(ServerHello),
    Certificate(Certificate),
    ServerKeyExchange(ServerKeyExchange),
    ClientKeyExchange(ClientKeyExchange),
    ServerHelloDone(ServerHelloDone),
}

impl HandshakeMessage {
    pub fn handshake_type(&self) -> HandshakeType {
        match self {
            HandshakeMessage::ClientHello(_) => HandshakeType::ClientHello,
            HandshakeMessage::ServerHello(_) => HandshakeType::ServerHello,
            HandshakeMessage::Certificate(_) => HandshakeType::Certificate,
            HandshakeMessage::ServerKeyExchange(_) => HandshakeType::ServerKeyExchange,
            HandshakeMessage::ClientKeyExchange(_) => HandshakeType::ClientKeyExchange,
            HandshakeMessage::ServerHelloDone(_) => HandshakeType::ServerHelloDone,
        }
    }
}

// Payload byte of the one ChangeCipherSpec message.
pub const CHANGE_CIPHER_SPEC: u8 = 0x01;

// Application-layer message carried in a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Handshake(HandshakeMessage),
    ChangeCipherSpec,
}

// Identity of a message kind, used to key the message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Handshake(HandshakeType),
    ChangeCipherSpec,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Handshake(t) => write!(f, "{t}"),
            MessageKind::ChangeCipherSpec => f.write_str("ChangeCipherSpec"),
        }
    }
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Handshake(m) => MessageKind::Handshake(m.handshake_type()),
            Message::ChangeCipherSpec => MessageKind::ChangeCipherSpec,
        }
    }
}

impl From<HandshakeMessage> for Message {
    fn from(m: HandshakeMessage) -> Self {
        Message::Handshake(m)
    }
}
