use crate::{
    protocol::{EcPointFormat, Extension, HashAlgorithm, NamedGroup, ProtocolError, SignatureAlgorithm, SignatureAndHash},
    wire::WireBuffer,
};

fn encode(ext: &Extension) -> Vec<u8> {
    let mut buf = WireBuffer::new();
    ext.write_to(&mut buf).unwrap();
    buf.into_bytes().unwrap()
}

fn decode(bytes: &[u8]) -> Result<Extension, ProtocolError> {
    Extension::read_from(&mut WireBuffer::from_bytes(bytes))
}

#[test]
fn signature_algorithms_are_hash_then_signature() {
    let ext = Extension::SignatureAlgorithms(vec![
        SignatureAndHash::new(SignatureAlgorithm::Rsa, HashAlgorithm::Sha1),
        SignatureAndHash::new(SignatureAlgorithm::Ecdsa, HashAlgorithm::Sha256),
    ]);
    let bytes = encode(&ext);
    assert_eq!(bytes, hex::decode("000d0006000402010403").unwrap());
    assert_eq!(decode(&bytes).unwrap(), ext);
}

#[test]
fn supported_groups_and_point_formats() {
    let groups = Extension::SupportedGroups(vec![NamedGroup::Secp256r1, NamedGroup::X25519]);
    assert_eq!(encode(&groups), hex::decode("000a000600040017001d").unwrap());
    assert_eq!(decode(&encode(&groups)).unwrap(), groups);

    let formats = Extension::EcPointFormats(vec![EcPointFormat::Uncompressed]);
    assert_eq!(encode(&formats), hex::decode("000b00020100").unwrap());
    assert_eq!(decode(&encode(&formats)).unwrap(), formats);
}

#[test]
fn unknown_types_keep_raw_payload() {
    let bytes = hex::decode("abcd0003010203").unwrap();
    let ext = decode(&bytes).unwrap();
    assert_eq!(ext, Extension::Unknown { ext_type: 0xabcd, data: vec![1, 2, 3] });
    assert_eq!(ext.label(), "Extension(0xabcd)");
    assert_eq!(encode(&ext), bytes);

    let heartbeat = decode(&hex::decode("000f000101").unwrap()).unwrap();
    assert_eq!(heartbeat.label(), "Heartbeat");
}

#[test]
fn unknown_code_inside_known_extension_is_rejected() {
    let err = decode(&hex::decode("000d000400020907").unwrap()).unwrap_err();
    assert_eq!(err, ProtocolError::UnknownCode { field: "hash algorithm", code: 9 });
}

#[test]
fn structured_payload_must_be_consumed() {
    let err = decode(&hex::decode("000b0003010000").unwrap()).unwrap_err();
    assert_eq!(err, ProtocolError::TrailingBytes { field: "extension", remaining: 1 });
}
