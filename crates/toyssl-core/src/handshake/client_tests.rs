use std::sync::Arc;

use num_bigint::BigUint;

use crate::{
    crypto::{test_keys, CryptoError, PublicKey},
    framing::ProtocolVersion,
    handshake::{
        test_certs::{pair, server_config, Pair, StaticDecoder},
        ClientConfig, ClientHandshake, ClientState, HandshakeAction, HandshakeError, HandshakeMachine,
    },
    protocol::{CipherSuite, HandshakeMessage, HandshakeType, Message, MessageKind},
    trace::{NullTrace, RecordingTrace},
};

// Client started, server flight captured but not yet delivered.
async fn server_flight(p: &mut Pair) -> Vec<HandshakeMessage> {
    let hello = p.client.start().await.unwrap();
    match p.server.on_message(hello[0].clone()).await.unwrap() {
        HandshakeAction::Send(msgs) => msgs
            .into_iter()
            .map(|m| match m {
                Message::Handshake(h) => h,
                Message::ChangeCipherSpec => panic!("no CCS in the server flight"),
            })
            .collect(),
        other => panic!("unexpected {other:?}"),
    }
}

async fn feed(client: &mut ClientHandshake, msg: HandshakeMessage) -> Result<HandshakeAction, HandshakeError> {
    client.on_message(Message::Handshake(msg)).await
}

#[tokio::test]
async fn start_only_once() {
    let mut p = pair(ClientConfig::default(), server_config());
    let hello = p.client.start().await.unwrap();
    assert_eq!(hello.len(), 1);
    assert_eq!(hello[0].kind(), MessageKind::Handshake(HandshakeType::ClientHello));
    assert_eq!(p.client.state(), &ClientState::SentClientHello);
    assert_eq!(p.client.start().await.unwrap_err(), HandshakeError::AlreadyComplete);
}

#[tokio::test]
async fn client_hello_carries_the_configured_offer() {
    let mut p = pair(ClientConfig::default(), server_config());
    let hello = match p.client.start().await.unwrap().remove(0) {
        Message::Handshake(HandshakeMessage::ClientHello(ch)) => ch,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(hello.version, ProtocolVersion::Ssl3_0);
    assert!(hello.session_id.is_empty());
    assert_eq!(
        hello.cipher_suites,
        vec![CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA, CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA256]
    );
    assert_eq!(hello.extensions.as_ref().map(Vec::len), Some(2));
    let bytes = hex::encode(HandshakeMessage::ClientHello(hello).serialize().unwrap());
    assert_eq!(&bytes[..12], "0100003a0300");
}

#[tokio::test]
async fn messages_before_start_are_refused() {
    let mut p = pair(ClientConfig::default(), server_config());
    let err = p.client.on_message(Message::ChangeCipherSpec).await.unwrap_err();
    assert_eq!(err, HandshakeError::NotStarted);
}

#[tokio::test]
async fn out_of_order_message_is_fatal() {
    let mut p = pair(ClientConfig::default(), server_config());
    let flight = server_flight(&mut p).await;

    let err = feed(&mut p.client, flight[3].clone()).await.unwrap_err();
    assert_eq!(
        err,
        HandshakeError::UnexpectedMessage {
            state: "SentClientHello",
            got: MessageKind::Handshake(HandshakeType::ServerHelloDone),
        }
    );
}

#[tokio::test]
async fn tampered_signature_aborts() {
    let mut p = pair(ClientConfig::default(), server_config());
    let mut flight = server_flight(&mut p).await;
    if let HandshakeMessage::ServerKeyExchange(ske) = &mut flight[2] {
        let last = ske.signature.len() - 1;
        ske.signature[last] ^= 0x01;
    }

    assert_eq!(feed(&mut p.client, flight[0].clone()).await.unwrap(), HandshakeAction::Wait);
    assert_eq!(feed(&mut p.client, flight[1].clone()).await.unwrap(), HandshakeAction::Wait);
    let err = feed(&mut p.client, flight[2].clone()).await.unwrap_err();
    assert!(matches!(err, HandshakeError::BadSignature(_)), "{err:?}");
    assert_eq!(p.client.state().name(), "ReceivedCertificate");
}

#[tokio::test]
async fn swapped_dh_parameters_fail_verification() {
    let mut p = pair(ClientConfig::default(), server_config());
    let mut flight = server_flight(&mut p).await;
    if let HandshakeMessage::ServerKeyExchange(ske) = &mut flight[2] {
        ske.g = vec![0x05];
    }

    feed(&mut p.client, flight[0].clone()).await.unwrap();
    feed(&mut p.client, flight[1].clone()).await.unwrap();
    let err = feed(&mut p.client, flight[2].clone()).await.unwrap_err();
    assert_eq!(err, HandshakeError::BadSignature(CryptoError::BadSignature));
}

#[tokio::test]
async fn signature_is_checked_against_the_certificate_key() {
    let trace = Arc::new(RecordingTrace::new());
    let wrong_key = Arc::new(StaticDecoder(PublicKey::Rsa(test_keys::rsa_512().public_key())));
    let mut p = pair(ClientConfig::default(), server_config());
    p.client = ClientHandshake::new(ClientConfig::default(), wrong_key, trace.clone());

    let flight = server_flight(&mut p).await;
    feed(&mut p.client, flight[0].clone()).await.unwrap();
    feed(&mut p.client, flight[1].clone()).await.unwrap();
    let err = feed(&mut p.client, flight[2].clone()).await.unwrap_err();
    assert!(matches!(err, HandshakeError::BadSignature(_)), "{err:?}");

    // The failed check is still explained.
    let step = trace.explanation("Verify ServerKeyExchange signature").unwrap();
    assert_eq!(step.get("MD5 || SHA1").map(<[u8]>::len), Some(36));
}

#[tokio::test]
async fn server_must_pick_an_offered_suite() {
    let mut p = pair(ClientConfig::default(), server_config());
    let mut flight = server_flight(&mut p).await;
    if let HandshakeMessage::ServerHello(sh) = &mut flight[0] {
        sh.cipher_suite = CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA;
    }
    let err = feed(&mut p.client, flight[0].clone()).await.unwrap_err();
    assert_eq!(err, HandshakeError::UnofferedCipherSuite(CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA));
}

#[tokio::test]
async fn server_must_not_raise_the_version() {
    let mut p = pair(ClientConfig::default(), server_config());
    let mut flight = server_flight(&mut p).await;
    if let HandshakeMessage::ServerHello(sh) = &mut flight[0] {
        sh.version = ProtocolVersion::Tls1_1;
    }
    let err = feed(&mut p.client, flight[0].clone()).await.unwrap_err();
    assert_eq!(err, HandshakeError::VersionTooHigh(ProtocolVersion::Tls1_1));
}

#[tokio::test]
async fn non_rsa_certificate_is_refused() {
    let ecc = PublicKey::Ecc { curve: "prime256v1".into(), x: BigUint::from(1u32), y: BigUint::from(2u32) };
    let mut p = pair(ClientConfig::default(), server_config());
    p.client = ClientHandshake::new(ClientConfig::default(), Arc::new(StaticDecoder(ecc)), Arc::new(NullTrace));

    let flight = server_flight(&mut p).await;
    feed(&mut p.client, flight[0].clone()).await.unwrap();
    let err = feed(&mut p.client, flight[1].clone()).await.unwrap_err();
    assert_eq!(err, HandshakeError::WrongKeyType("ecc"));
}

#[tokio::test]
async fn empty_chain_is_refused() {
    let mut p = pair(ClientConfig::default(), server_config());
    let mut flight = server_flight(&mut p).await;
    if let HandshakeMessage::Certificate(cert) = &mut flight[1] {
        cert.chain.clear();
    }
    feed(&mut p.client, flight[0].clone()).await.unwrap();
    let err = feed(&mut p.client, flight[1].clone()).await.unwrap_err();
    assert_eq!(err, HandshakeError::EmptyCertificateChain);
}

#[tokio::test]
async fn finishing_flight_is_key_exchange_then_change_cipher_spec() {
    let mut p = pair(ClientConfig::default(), server_config());
    let flight = server_flight(&mut p).await;

    let mut last = HandshakeAction::Wait;
    for msg in flight {
        last = feed(&mut p.client, msg).await.unwrap();
    }
    let msgs = match last {
        HandshakeAction::SendAndEstablished { msgs, .. } => msgs,
        other => panic!("unexpected {other:?}"),
    };
    let kinds: Vec<MessageKind> = msgs.iter().map(Message::kind).collect();
    assert_eq!(
        kinds,
        vec![MessageKind::Handshake(HandshakeType::ClientKeyExchange), MessageKind::ChangeCipherSpec]
    );
    assert_eq!(
        p.client.on_message(Message::ChangeCipherSpec).await.unwrap_err(),
        HandshakeError::AlreadyComplete
    );
}
