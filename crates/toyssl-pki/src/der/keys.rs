use der_parser::ber::BerObjectContent;
use num_bigint::BigUint;
use toyssl_core::crypto::{DhParams, RsaPrivateKey};

use crate::{
    der::{integer, parse_one, sequence},
    PkiError,
};

const RSA_ENCRYPTION_OID: &str = "1.2.840.113549.1.1.1";

/*
    PrivateKeyInfo ::= SEQUENCE {
        version             INTEGER,
        privateKeyAlgorithm AlgorithmIdentifier,
        privateKey          OCTET STRING -- RSAPrivateKey
    }
*/
pub(crate) fn rsa_from_pkcs8(der: &[u8]) -> Result<RsaPrivateKey, PkiError> {
    let obj = parse_one(der)?;
    let items = sequence(&obj, "PrivateKeyInfo is not a SEQUENCE")?;
    let [_version, algorithm, private_key, ..] = items else {
        return Err(PkiError::Structure("PrivateKeyInfo needs three fields"));
    };

    let alg = sequence(algorithm, "AlgorithmIdentifier is not a SEQUENCE")?;
    let oid = match alg.first().map(|o| &o.content) {
        Some(BerObjectContent::OID(oid)) => oid.to_id_string(),
        _ => return Err(PkiError::Structure("AlgorithmIdentifier lacks an OID")),
    };
    if oid != RSA_ENCRYPTION_OID {
        return Err(PkiError::UnsupportedAlgorithm(oid));
    }

    match &private_key.content {
        BerObjectContent::OctetString(inner) => rsa_from_pkcs1(inner),
        _ => Err(PkiError::Structure("privateKey is not an OCTET STRING")),
    }
}

/*
    RSAPrivateKey ::= SEQUENCE {
        version, modulus, publicExponent, privateExponent,
        prime1, prime2, exponent1, exponent2, coefficient
    }
    Only n, e and d are used.
*/
pub(crate) fn rsa_from_pkcs1(der: &[u8]) -> Result<RsaPrivateKey, PkiError> {
    let obj = parse_one(der)?;
    let items = sequence(&obj, "RSAPrivateKey is not a SEQUENCE")?;
    let [_version, n, e, d, ..] = items else {
        return Err(PkiError::Structure("RSAPrivateKey is truncated"));
    };
    Ok(RsaPrivateKey {
        n: integer(n, "modulus is not an INTEGER")?,
        e: integer(e, "publicExponent is not an INTEGER")?,
        d: integer(d, "privateExponent is not an INTEGER")?,
    })
}

// DHParameter ::= SEQUENCE { prime INTEGER, base INTEGER, privateValueLength INTEGER OPTIONAL }
pub(crate) fn dh_params(der: &[u8]) -> Result<DhParams, PkiError> {
    let obj = parse_one(der)?;
    let items = sequence(&obj, "DHParameter is not a SEQUENCE")?;
    let (p, g, length) = match items {
        [p, g] => (p, g, None),
        [p, g, length] => (p, g, Some(length)),
        _ => return Err(PkiError::Structure("DHParameter needs two or three fields")),
    };
    let params = DhParams::new(integer(p, "prime is not an INTEGER")?, integer(g, "base is not an INTEGER")?)?;

    // Exponents are always drawn from [0, p); the hint is only sanity checked.
    if let Some(length) = length {
        let bits = integer(length, "privateValueLength is not an INTEGER")?;
        if bits == BigUint::from(0u32) || bits > BigUint::from(params.bit_len()) {
            return Err(PkiError::Structure("privateValueLength outside 1..=bits(p)"));
        }
    }
    Ok(params)
}
