pub(crate) mod keys;
pub(crate) mod pem;
pub(crate) mod x509;

use der_parser::ber::{BerObject, BerObjectContent};
use num_bigint::BigUint;

use crate::PkiError;

// Parses exactly one DER object; trailing bytes are an error.
pub(crate) fn parse_one(der: &[u8]) -> Result<BerObject<'_>, PkiError> {
    let (rest, obj) = der_parser::parse_der(der).map_err(|e| PkiError::Der(e.to_string()))?;
    if !rest.is_empty() {
        return Err(PkiError::Structure("trailing bytes after DER object"));
    }
    Ok(obj)
}

pub(crate) fn sequence<'o, 'a>(obj: &'o BerObject<'a>, what: &'static str) -> Result<&'o [BerObject<'a>], PkiError> {
    match &obj.content {
        BerObjectContent::Sequence(items) => Ok(items),
        _ => Err(PkiError::Structure(what)),
    }
}

// Unsigned value of an INTEGER; a leading sign byte is harmless.
pub(crate) fn integer(obj: &BerObject<'_>, what: &'static str) -> Result<BigUint, PkiError> {
    match &obj.content {
        BerObjectContent::Integer(bytes) => Ok(BigUint::from_bytes_be(bytes)),
        _ => Err(PkiError::Structure(what)),
    }
}
