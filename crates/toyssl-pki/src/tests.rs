use std::path::PathBuf;

use num_bigint::BigUint;
use toyssl_core::crypto::{CertificateDecoder, CryptoError, PublicKey};

use crate::{
    load_certificate_chain, load_dh_params, load_private_key, parse_certificate_chain_pem, parse_dh_params_pem,
    parse_private_key_pem, PkiError, X509Decoder,
};

const SERVER_CRT: &[u8] = include_bytes!("../testdata/server.crt");
const EC_CRT: &[u8] = include_bytes!("../testdata/ec.crt");
const EC_KEY: &[u8] = include_bytes!("../testdata/ec.key");
const SERVER_KEY_PKCS8: &[u8] = include_bytes!("../testdata/server.key");
const SERVER_KEY_PKCS1: &[u8] = include_bytes!("../testdata/server_pkcs1.key");
const DH_PARAMS: &[u8] = include_bytes!("../testdata/dhp.pem");

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

fn hex_of(n: &BigUint) -> String {
    hex::encode(n.to_bytes_be())
}

#[test]
fn rsa_certificate_yields_its_modulus() {
    let chain = parse_certificate_chain_pem(SERVER_CRT).unwrap();
    assert_eq!(chain.len(), 1);

    match X509Decoder::new().public_key(&chain[0]).unwrap() {
        PublicKey::Rsa(key) => {
            assert!(hex_of(&key.n).starts_with("bc9027fe5aeba64a"));
            assert_eq!(key.e, BigUint::from(65537u32));
            assert_eq!(key.modulus_len(), 128);
        }
        other => panic!("expected an RSA key, got {}", other.kind()),
    }
}

#[test]
fn ec_certificate_yields_curve_and_point() {
    let chain = parse_certificate_chain_pem(EC_CRT).unwrap();
    match X509Decoder::new().public_key(&chain[0]).unwrap() {
        PublicKey::Ecc { curve, x, y } => {
            assert_eq!(curve, "prime256v1");
            assert_eq!(hex_of(&x), "248de19d51d5cfb4a62026f6a4f5145df2690fbc4c80785fde76deac6220ef88");
            assert_eq!(hex_of(&y), "ceab5df2bcc75b6dcf63634e22dbfe70791aee154fde56c7f967b93134cd1d23");
        }
        other => panic!("expected an EC key, got {}", other.kind()),
    }
}

#[test]
fn chain_keeps_file_order() {
    let mut both = SERVER_CRT.to_vec();
    both.extend_from_slice(EC_CRT);
    let chain = parse_certificate_chain_pem(&both).unwrap();
    assert_eq!(chain.len(), 2);

    let decoder = X509Decoder::new();
    assert_eq!(decoder.public_key(&chain[0]).unwrap().kind(), "rsa");
    assert_eq!(decoder.public_key(&chain[1]).unwrap().kind(), "ecc");
}

#[test]
fn garbage_certificate_is_a_crypto_error() {
    let err = X509Decoder::new().public_key(&[0x30, 0x03, 0x02, 0x01]).unwrap_err();
    assert!(matches!(err, CryptoError::Certificate(_)), "{err:?}");
}

#[test]
fn pkcs8_and_pkcs1_hold_the_same_key() {
    let wrapped = parse_private_key_pem(SERVER_KEY_PKCS8).unwrap();
    let bare = parse_private_key_pem(SERVER_KEY_PKCS1).unwrap();
    assert_eq!(wrapped, bare);
    assert!(hex_of(&wrapped.n).starts_with("bc9027fe"));
    assert!(hex_of(&wrapped.d).starts_with("b957f117"));
}

#[test]
fn loaded_key_signs_for_the_certificate() {
    let key = load_private_key(testdata("server.key")).unwrap();
    let chain = load_certificate_chain(testdata("server.crt")).unwrap();
    let PublicKey::Rsa(public) = X509Decoder::new().public_key(&chain[0]).unwrap() else {
        panic!("expected an RSA certificate");
    };

    let signature = key.sign_md5sha1(b"server key exchange").unwrap();
    public.verify_md5sha1(b"server key exchange", &signature).unwrap();
    assert_eq!(public.verify_md5sha1(b"tampered", &signature).unwrap_err(), CryptoError::BadSignature);
}

#[test]
fn small_key_loads() {
    let key = load_private_key(testdata("small.key")).unwrap();
    assert_eq!(key.modulus_len(), 64);
    assert!(hex_of(&key.n).starts_with("c0baacb61a737e17b71d33"));
}

#[test]
fn dh_parameters_with_private_value_length() {
    let params = parse_dh_params_pem(DH_PARAMS).unwrap();
    assert!(hex_of(&params.p).starts_with("d4280ba8a8ec2c7c"));
    assert_eq!(params.g, BigUint::from(2u32));
    assert_eq!(params.bit_len(), 512);
    assert_eq!(load_dh_params(testdata("dhp.pem")).unwrap(), params);
}

// SEQUENCE { INTEGER 23, INTEGER 5, INTEGER length }
fn small_dh_der(length: u8) -> Vec<u8> {
    vec![0x30, 0x09, 0x02, 0x01, 0x17, 0x02, 0x01, 0x05, 0x02, 0x01, length]
}

#[test]
fn private_value_length_must_fit_the_prime() {
    let params = crate::der::keys::dh_params(&small_dh_der(4)).unwrap();
    assert_eq!(params.p, BigUint::from(23u32));
    assert_eq!(params.bit_len(), 5);
    assert!(crate::der::keys::dh_params(&small_dh_der(5)).is_ok());

    for bad in [0u8, 6, 0x7f] {
        let err = crate::der::keys::dh_params(&small_dh_der(bad)).unwrap_err();
        assert!(matches!(err, PkiError::Structure(_)), "length {bad}: {err:?}");
    }
}

#[test]
fn ec_key_is_not_an_rsa_key() {
    let err = parse_private_key_pem(EC_KEY).unwrap_err();
    assert!(matches!(err, PkiError::MissingBlock { .. }), "{err:?}");
}

#[test]
fn missing_block_names_the_file() {
    let err = load_dh_params(testdata("server.crt")).unwrap_err();
    match err {
        PkiError::MissingBlock { path, labels } => {
            assert!(path.ends_with("server.crt"), "{path}");
            assert_eq!(labels, "DH PARAMETERS");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unreadable_file_is_io() {
    let err = load_certificate_chain(testdata("absent.crt")).unwrap_err();
    assert!(matches!(err, PkiError::Io { .. }), "{err:?}");
}
