use async_trait::async_trait;

use crate::{
    framing::ProtocolVersion,
    handshake::{EstablishedSession, HandshakeError},
    protocol::Message,
};

// Output actions a handshake machine can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeAction {
    // Send these messages to the peer, in order.
    Send(Vec<Message>),

    // Nothing to send; wait for the next inbound message.
    Wait,

    // Handshake complete; session established.
    Established(EstablishedSession),

    // Send the final messages and consider the handshake established.
    SendAndEstablished { msgs: Vec<Message>, session: EstablishedSession },
}

// Handshake state machine.
// Transport-agnostic: consumes decoded messages and emits actions.
#[async_trait]
pub trait HandshakeMachine: Send {
    // Initial flight. Empty for the side that waits for the peer.
    async fn start(&mut self) -> Result<Vec<Message>, HandshakeError>;

    // Feed the next inbound message.
    async fn on_message(&mut self, msg: Message) -> Result<HandshakeAction, HandshakeError>;

    // Version to stamp on outgoing records.
    fn record_version(&self) -> ProtocolVersion;
}
