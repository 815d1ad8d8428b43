use crate::{
    framing::{ContentType, ProtocolVersion, MAX_RECORD_PAYLOAD, RECORD_HEADER_LEN},
    protocol::{CipherSuite, HandshakeType, RANDOM_LEN},
    crypto::{MASTER_SECRET_LEN, MD5SHA1_LEN},
    ToysslError,
};

#[test]
fn protocol_constants_are_stable() {
    assert_eq!(ContentType::ChangeCipherSpec.code(), 20);
    assert_eq!(ContentType::Handshake.code(), 22);
    assert_eq!(ProtocolVersion::Ssl3_0.code(), 0x0300);
    assert_eq!(ProtocolVersion::Tls1_0.code(), 0x0301);
    assert_eq!(HandshakeType::ClientHello.code(), 1);
    assert_eq!(HandshakeType::ServerHelloDone.code(), 14);
    assert_eq!(HandshakeType::ClientKeyExchange.code(), 16);
    assert_eq!(CipherSuite::TLS_DHE_RSA_WITH_AES_128_CBC_SHA.code(), 0x0033);
}

#[test]
fn size_assumptions_hold() {
    assert_eq!(RECORD_HEADER_LEN, 5);
    assert_eq!(MAX_RECORD_PAYLOAD, 65535);
    assert_eq!(RANDOM_LEN, 32);
    assert_eq!(MASTER_SECRET_LEN, 48);
    assert_eq!(MD5SHA1_LEN, 36);
}

#[test]
fn errors_lift_into_the_crate_error() {
    let err: ToysslError = crate::protocol::ProtocolError::EmptyRecord.into();
    assert_eq!(err.to_string(), "protocol error: empty handshake record");

    let err: ToysslError = crate::handshake::HandshakeError::NoCommonCipherSuite.into();
    assert!(matches!(err, ToysslError::Handshake(_)));
}
