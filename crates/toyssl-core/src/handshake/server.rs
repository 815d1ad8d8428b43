use std::sync::Arc;

use async_trait::async_trait;
use rand::{rngs::OsRng, RngCore};

use crate::{
    crypto::{md5sha1, CryptoError, DhSession},
    framing::ProtocolVersion,
    handshake::{
        signed_key_exchange_payload, EstablishedSession, HandshakeAction, HandshakeError, HandshakeMachine,
        KeyAgreement, MessageLog, ServerConfig,
    },
    protocol::{
        Certificate, ClientHello, CompressionMethod, HandshakeMessage, Message, Random, ServerHello, ServerHelloDone,
        ServerKeyExchange,
    },
    trace::{Direction, Explanation, TraceSink},
};

pub const SESSION_ID_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Init,
    AwaitingClientKeyExchange,
    AwaitingChangeCipherSpec,
    Done,
}

impl ServerState {
    pub fn name(&self) -> &'static str {
        match self {
            ServerState::Init => "Init",
            ServerState::AwaitingClientKeyExchange => "AwaitingClientKeyExchange",
            ServerState::AwaitingChangeCipherSpec => "AwaitingChangeCipherSpec",
            ServerState::Done => "Done",
        }
    }
}

// Server side of the DHE_RSA handshake.
pub struct ServerHandshake {
    state: ServerState,
    config: ServerConfig,
    trace: Arc<dyn TraceSink>,
    log: MessageLog,
    version: ProtocolVersion,
    // Ephemeral DH half, alive from the first flight until ChangeCipherSpec.
    dh: Option<DhSession>,
}

impl ServerHandshake {
    pub fn new(config: ServerConfig, trace: Arc<dyn TraceSink>) -> Self {
        Self { state: ServerState::Init, version: config.version, config, trace, log: MessageLog::new(), dh: None }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    // ServerHello, Certificate, ServerKeyExchange, ServerHelloDone.
    fn answer_hello(&mut self, ch: &ClientHello) -> Result<HandshakeAction, HandshakeError> {
        let cipher_suite = self
            .config
            .cipher_suites
            .iter()
            .copied()
            .find(|s| ch.cipher_suites.contains(s))
            .ok_or(HandshakeError::NoCommonCipherSuite)?;
        if !ch.compression_methods.contains(&CompressionMethod::Null) {
            return Err(HandshakeError::NoNullCompression);
        }
        let version = if ch.version.code() < self.config.version.code() { ch.version } else { self.config.version };

        let mut session_id = vec![0u8; SESSION_ID_LEN];
        OsRng.fill_bytes(&mut session_id);

        let hello = ServerHello {
            version,
            random: Random::generate(),
            session_id,
            cipher_suite,
            compression_method: CompressionMethod::Null,
            extensions: None,
        };

        let params = &self.config.dh_params;
        let dh = params.new_session();
        let mut ske = ServerKeyExchange::new_dhe(&params.p, &params.g, dh.public_value());
        let payload = signed_key_exchange_payload(ch, &hello, &ske)?;
        ske.signature = self.config.private_key.sign_md5sha1(&payload)?;

        let mut step = Explanation::new("Sign ServerKeyExchange");
        step.push("Signed payload", &payload)
            .push("MD5 || SHA1", md5sha1(&payload))
            .push("Signature", &ske.signature);
        self.trace.explain(&step);

        tracing::debug!(%version, suite = %cipher_suite, dh_bits = params.bit_len(), "answering ClientHello");

        let flight: Vec<Message> = vec![
            HandshakeMessage::ServerHello(hello).into(),
            HandshakeMessage::Certificate(Certificate { chain: self.config.certificate_chain.clone() }).into(),
            HandshakeMessage::ServerKeyExchange(ske).into(),
            HandshakeMessage::ServerHelloDone(ServerHelloDone).into(),
        ];
        for m in &flight {
            self.log.record(Direction::Tx, m);
        }

        self.version = version;
        self.dh = Some(dh);
        self.state = ServerState::AwaitingClientKeyExchange;
        Ok(HandshakeAction::Send(flight))
    }

    fn establish(&mut self) -> Result<HandshakeAction, HandshakeError> {
        let client_public = self.log.client_key_exchange(Direction::Rx)?.public_value();
        let mut dh = self.dh.take().ok_or(CryptoError::MissingPrivateExponent)?;
        let shared = dh.establish(&client_public)?;

        let client_random = self.log.client_hello(Direction::Rx)?.random;
        let sh = self.log.server_hello(Direction::Tx)?;
        let session = EstablishedSession::derive(sh.version, sh.cipher_suite, &shared, client_random, sh.random)?;

        let agreement = KeyAgreement {
            params: dh.params(),
            own_public: dh.public_value(),
            peer_public: &client_public,
            shared: &shared,
            session: &session,
        };
        self.trace.explain(&agreement.explain("Server key agreement"));
        tracing::info!(suite = %session.cipher_suite, version = %session.version, "server handshake established");

        self.state = ServerState::Done;
        Ok(HandshakeAction::Established(session))
    }
}

#[async_trait]
impl HandshakeMachine for ServerHandshake {
    async fn start(&mut self) -> Result<Vec<Message>, HandshakeError> {
        match self.state {
            ServerState::Init => Ok(Vec::new()),
            _ => Err(HandshakeError::AlreadyComplete),
        }
    }

    async fn on_message(&mut self, msg: Message) -> Result<HandshakeAction, HandshakeError> {
        self.log.record(Direction::Rx, &msg);

        match (self.state, msg) {
            (ServerState::Init, Message::Handshake(HandshakeMessage::ClientHello(ch))) => self.answer_hello(&ch),
            (ServerState::AwaitingClientKeyExchange, Message::Handshake(HandshakeMessage::ClientKeyExchange(cke))) => {
                self.config.dh_params.check_public(&cke.public_value())?;
                self.state = ServerState::AwaitingChangeCipherSpec;
                Ok(HandshakeAction::Wait)
            }
            (ServerState::AwaitingChangeCipherSpec, Message::ChangeCipherSpec) => self.establish(),
            (ServerState::Done, _) => Err(HandshakeError::AlreadyComplete),
            (state, other) => Err(HandshakeError::UnexpectedMessage { state: state.name(), got: other.kind() }),
        }
    }

    fn record_version(&self) -> ProtocolVersion {
        self.version
    }
}
