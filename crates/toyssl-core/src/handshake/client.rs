use std::sync::Arc;

use async_trait::async_trait;
use num_bigint::BigUint;

use crate::{
    crypto::{md5sha1, CertificateDecoder, DhParams, PublicKey, RsaPublicKey},
    framing::ProtocolVersion,
    handshake::{
        signed_key_exchange_payload, ClientConfig, EstablishedSession, HandshakeAction, HandshakeError,
        HandshakeMachine, KeyAgreement, MessageLog,
    },
    protocol::{ClientHello, ClientKeyExchange, HandshakeMessage, Message, Random},
    trace::{Direction, Explanation, TraceSink},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    Init,
    SentClientHello,
    ReceivedServerHello,
    ReceivedCertificate { server_key: RsaPublicKey },
    ReceivedServerKeyExchange { params: DhParams, server_public: BigUint },
    Done,
}

impl ClientState {
    pub fn name(&self) -> &'static str {
        match self {
            ClientState::Init => "Init",
            ClientState::SentClientHello => "SentClientHello",
            ClientState::ReceivedServerHello => "ReceivedServerHello",
            ClientState::ReceivedCertificate { .. } => "ReceivedCertificate",
            ClientState::ReceivedServerKeyExchange { .. } => "ReceivedServerKeyExchange",
            ClientState::Done => "Done",
        }
    }
}

/// Client side of the DHE_RSA handshake.
///
/// Sends the hello, checks the server's choices, verifies the signed DH
/// parameters against the certificate key and answers ServerHelloDone with
/// its own public value followed by ChangeCipherSpec.
pub struct ClientHandshake {
    state: ClientState,
    config: ClientConfig,
    certs: Arc<dyn CertificateDecoder>,
    trace: Arc<dyn TraceSink>,
    log: MessageLog,
    version: ProtocolVersion,
}

impl ClientHandshake {
    pub fn new(config: ClientConfig, certs: Arc<dyn CertificateDecoder>, trace: Arc<dyn TraceSink>) -> Self {
        Self { state: ClientState::Init, version: config.version, config, certs, trace, log: MessageLog::new() }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }
}

#[async_trait]
impl HandshakeMachine for ClientHandshake {
    async fn start(&mut self) -> Result<Vec<Message>, HandshakeError> {
        match self.state {
            ClientState::Init => {
                let hello = ClientHello {
                    version: self.config.version,
                    random: Random::generate(),
                    session_id: Vec::new(),
                    cipher_suites: self.config.cipher_suites.clone(),
                    compression_methods: self.config.compression_methods.clone(),
                    extensions: self.config.extensions.clone(),
                };
                tracing::debug!(version = %hello.version, suites = hello.cipher_suites.len(), "sending ClientHello");

                let msg = Message::from(HandshakeMessage::ClientHello(hello));
                self.log.record(Direction::Tx, &msg);
                self.state = ClientState::SentClientHello;
                Ok(vec![msg])
            }
            _ => Err(HandshakeError::AlreadyComplete),
        }
    }

    async fn on_message(&mut self, msg: Message) -> Result<HandshakeAction, HandshakeError> {
        self.log.record(Direction::Rx, &msg);

        match (&self.state, msg) {
            (ClientState::SentClientHello, Message::Handshake(HandshakeMessage::ServerHello(sh))) => {
                if sh.version.code() > self.config.version.code() {
                    return Err(HandshakeError::VersionTooHigh(sh.version));
                }
                if !self.config.cipher_suites.contains(&sh.cipher_suite) {
                    return Err(HandshakeError::UnofferedCipherSuite(sh.cipher_suite));
                }
                if !self.config.compression_methods.contains(&sh.compression_method) {
                    return Err(HandshakeError::UnofferedCompression(sh.compression_method));
                }
                tracing::debug!(version = %sh.version, suite = %sh.cipher_suite, "server hello accepted");

                self.version = sh.version;
                self.state = ClientState::ReceivedServerHello;
                Ok(HandshakeAction::Wait)
            }
            (ClientState::ReceivedServerHello, Message::Handshake(HandshakeMessage::Certificate(cert))) => {
                let leaf = cert.leaf().ok_or(HandshakeError::EmptyCertificateChain)?;
                let server_key = match self.certs.public_key(leaf)? {
                    PublicKey::Rsa(key) => key,
                    other => return Err(HandshakeError::WrongKeyType(other.kind())),
                };
                tracing::debug!(chain = cert.chain.len(), modulus_bits = server_key.n.bits(), "server certificate decoded");

                self.state = ClientState::ReceivedCertificate { server_key };
                Ok(HandshakeAction::Wait)
            }
            (ClientState::ReceivedCertificate { server_key }, Message::Handshake(HandshakeMessage::ServerKeyExchange(ske))) => {
                let payload = signed_key_exchange_payload(
                    self.log.client_hello(Direction::Tx)?,
                    self.log.server_hello(Direction::Rx)?,
                    &ske,
                )?;
                let verified = server_key.verify_md5sha1(&payload, &ske.signature);

                let mut step = Explanation::new("Verify ServerKeyExchange signature");
                step.push("Signed payload", &payload)
                    .push("MD5 || SHA1", md5sha1(&payload))
                    .push("Signature", &ske.signature);
                self.trace.explain(&step);

                verified.map_err(HandshakeError::BadSignature)?;
                tracing::debug!("ServerKeyExchange signature verified");

                let params = DhParams::new(ske.p(), ske.g())?;
                let server_public = ske.public_value();
                params.check_public(&server_public)?;

                self.state = ClientState::ReceivedServerKeyExchange { params, server_public };
                Ok(HandshakeAction::Wait)
            }
            (ClientState::ReceivedServerKeyExchange { params, server_public }, Message::Handshake(HandshakeMessage::ServerHelloDone(_))) => {
                let mut dh = params.new_session();
                let shared = dh.establish(server_public)?;

                let client_random = self.log.client_hello(Direction::Tx)?.random;
                let sh = self.log.server_hello(Direction::Rx)?;
                let session = EstablishedSession::derive(sh.version, sh.cipher_suite, &shared, client_random, sh.random)?;

                let agreement = KeyAgreement {
                    params,
                    own_public: dh.public_value(),
                    peer_public: server_public,
                    shared: &shared,
                    session: &session,
                };
                self.trace.explain(&agreement.explain("Client key agreement"));

                let cke = Message::from(HandshakeMessage::ClientKeyExchange(ClientKeyExchange::new_dhe(dh.public_value())));
                let msgs = vec![cke, Message::ChangeCipherSpec];
                for m in &msgs {
                    self.log.record(Direction::Tx, m);
                }
                tracing::info!(suite = %session.cipher_suite, version = %session.version, "client handshake established");

                self.state = ClientState::Done;
                Ok(HandshakeAction::SendAndEstablished { msgs, session })
            }
            (ClientState::Init, _) => Err(HandshakeError::NotStarted),
            (ClientState::Done, _) => Err(HandshakeError::AlreadyComplete),
            (state, other) => Err(HandshakeError::UnexpectedMessage { state: state.name(), got: other.kind() }),
        }
    }

    fn record_version(&self) -> ProtocolVersion {
        self.version
    }
}
