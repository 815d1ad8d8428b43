use num_bigint::BigUint;
use toyssl_core::crypto::{PublicKey, RsaPublicKey};
use x509_parser::{
    parse_x509_certificate,
    public_key::PublicKey as SubjectKey,
    x509::SubjectPublicKeyInfo,
};

use crate::PkiError;

const UNCOMPRESSED_POINT: u8 = 0x04;

pub(crate) fn subject_public_key(der: &[u8]) -> Result<PublicKey, PkiError> {
    let (_, cert) = parse_x509_certificate(der).map_err(|e| PkiError::X509(e.to_string()))?;
    let spki = cert.public_key();

    match spki.parsed().map_err(|e| PkiError::X509(e.to_string()))? {
        SubjectKey::RSA(rsa) => Ok(PublicKey::Rsa(RsaPublicKey {
            n: BigUint::from_bytes_be(rsa.modulus),
            e: BigUint::from_bytes_be(rsa.exponent),
        })),
        SubjectKey::EC(point) => {
            let (x, y) = split_point(point.data())?;
            Ok(PublicKey::Ecc { curve: curve_name(spki), x, y })
        }
        _ => Err(PkiError::UnsupportedAlgorithm(spki.algorithm.algorithm.to_id_string())),
    }
}

// 0x04 || X || Y, both coordinates the same width.
fn split_point(data: &[u8]) -> Result<(BigUint, BigUint), PkiError> {
    match data.split_first() {
        Some((&UNCOMPRESSED_POINT, coords)) if !coords.is_empty() && coords.len() % 2 == 0 => {
            let (x, y) = coords.split_at(coords.len() / 2);
            Ok((BigUint::from_bytes_be(x), BigUint::from_bytes_be(y)))
        }
        _ => Err(PkiError::Structure("EC point is not uncompressed")),
    }
}

fn curve_name(spki: &SubjectPublicKeyInfo<'_>) -> String {
    let oid = match spki.algorithm.parameters.as_ref().and_then(|p| p.as_oid().ok()) {
        Some(oid) => oid.to_id_string(),
        None => return "unknown".into(),
    };
    match oid.as_str() {
        "1.2.840.10045.3.1.7" => "prime256v1".into(),
        "1.3.132.0.34" => "secp384r1".into(),
        "1.3.132.0.35" => "secp521r1".into(),
        _ => oid,
    }
}
