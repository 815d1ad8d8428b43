use std::collections::HashMap;

use crate::{
    handshake::HandshakeError,
    protocol::{
        ClientHello, ClientKeyExchange, HandshakeMessage, HandshakeType, Message, MessageKind, ServerHello,
        ServerKeyExchange,
    },
    trace::Direction,
};

/*
    Every message a machine has sent or received, keyed by (direction, kind).
    Later transitions rebuild signed payloads and the PRF seed from here,
    so nothing is dropped once recorded. Repeats of a kind keep arrival order.
*/
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: HashMap<(Direction, MessageKind), Vec<Message>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, direction: Direction, msg: &Message) {
        self.entries.entry((direction, msg.kind())).or_default().push(msg.clone());
    }

    pub fn first(&self, direction: Direction, kind: MessageKind) -> Option<&Message> {
        self.entries.get(&(direction, kind)).and_then(|v| v.first())
    }

    pub fn count(&self, direction: Direction, kind: MessageKind) -> usize {
        self.entries.get(&(direction, kind)).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handshake(&self, direction: Direction, ty: HandshakeType) -> Result<&HandshakeMessage, HandshakeError> {
        let kind = MessageKind::Handshake(ty);
        match self.first(direction, kind) {
            Some(Message::Handshake(m)) => Ok(m),
            _ => Err(HandshakeError::MissingMessage(kind)),
        }
    }

    pub fn client_hello(&self, direction: Direction) -> Result<&ClientHello, HandshakeError> {
        match self.handshake(direction, HandshakeType::ClientHello)? {
            HandshakeMessage::ClientHello(m) => Ok(m),
            _ => Err(HandshakeError::MissingMessage(MessageKind::Handshake(HandshakeType::ClientHello))),
        }
    }

    pub fn server_hello(&self, direction: Direction) -> Result<&ServerHello, HandshakeError> {
        match self.handshake(direction, HandshakeType::ServerHello)? {
            HandshakeMessage::ServerHello(m) => Ok(m),
            _ => Err(HandshakeError::MissingMessage(MessageKind::Handshake(HandshakeType::ServerHello))),
        }
    }

    pub fn server_key_exchange(&self, direction: Direction) -> Result<&ServerKeyExchange, HandshakeError> {
        match self.handshake(direction, HandshakeType::ServerKeyExchange)? {
            HandshakeMessage::ServerKeyExchange(m) => Ok(m),
            _ => Err(HandshakeError::MissingMessage(MessageKind::Handshake(HandshakeType::ServerKeyExchange))),
        }
    }

    pub fn client_key_exchange(&self, direction: Direction) -> Result<&ClientKeyExchange, HandshakeError> {
        match self.handshake(direction, HandshakeType::ClientKeyExchange)? {
            HandshakeMessage::ClientKeyExchange(m) => Ok(m),
            _ => Err(HandshakeError::MissingMessage(MessageKind::Handshake(HandshakeType::ClientKeyExchange))),
        }
    }
}

// client_random || server_random || params, the bytes the server signs.
pub fn signed_key_exchange_payload(
    client_hello: &ClientHello,
    server_hello: &ServerHello,
    ske: &ServerKeyExchange,
) -> Result<Vec<u8>, HandshakeError> {
    let params = ske.signed_params()?;
    let mut out = Vec::with_capacity(64 + params.len());
    out.extend_from_slice(&client_hello.random.0);
    out.extend_from_slice(&server_hello.random.0);
    out.extend_from_slice(&params);
    Ok(out)
}
