use md5::{Digest, Md5};
use num_bigint::BigUint;
use sha1::Sha1;

use crate::crypto::{byte_len, CryptoError, RsaPrivateKey, RsaPublicKey};

pub const MD5SHA1_LEN: usize = 36;

/// `MD5(data) || SHA1(data)`, the digest signed by pre-TLS-1.2 RSA signatures.
pub fn md5sha1(data: &[u8]) -> [u8; MD5SHA1_LEN] {
    let mut out = [0u8; MD5SHA1_LEN];
    out[..16].copy_from_slice(&Md5::digest(data));
    out[16..].copy_from_slice(&Sha1::digest(data));
    out
}

/// Block type 1 padding: `00 01 FF..FF 00 data`, at least one `FF`.
pub fn pad_pkcs1(data: &[u8], target_len: usize) -> Result<Vec<u8>, CryptoError> {
    let ff_count = target_len.checked_sub(data.len() + 3).filter(|k| *k > 0);
    let Some(ff_count) = ff_count else {
        return Err(CryptoError::MessageTooLong { len: data.len(), target: target_len });
    };

    let mut out = Vec::with_capacity(target_len);
    out.extend_from_slice(&[0x00, 0x01]);
    out.resize(2 + ff_count, 0xff);
    out.push(0x00);
    out.extend_from_slice(data);
    Ok(out)
}

/// Strips block type 1 padding.
///
/// Bails out at the first malformed byte. The early exits leak where the
/// padding broke through timing; this is only fit for teaching.
pub fn unpad_pkcs1(padded: &[u8]) -> Result<&[u8], CryptoError> {
    match padded {
        [0x00, 0x01, rest @ ..] => {
            let ff = rest.iter().take_while(|b| **b == 0xff).count();
            match rest.get(ff) {
                Some(&0x00) => Ok(&rest[ff + 1..]),
                _ => Err(CryptoError::BadPadding("padding does not end with 0x00")),
            }
        }
        [0x00, ..] => Err(CryptoError::BadPadding("block type is not 0x01")),
        _ => Err(CryptoError::BadPadding("padding does not start with 0x00")),
    }
}

// Big-endian, left-padded with zeros to exactly `len` bytes.
fn to_fixed_be(value: &BigUint, len: usize) -> Vec<u8> {
    let raw = value.to_bytes_be();
    let mut out = vec![0u8; len.saturating_sub(raw.len())];
    out.extend_from_slice(&raw);
    out
}

impl RsaPublicKey {
    pub fn modulus_len(&self) -> usize {
        byte_len(&self.n)
    }

    /// Raw public operation `s^e mod n`, returned at modulus length.
    pub fn encrypt_raw(&self, signature: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let s = BigUint::from_bytes_be(signature);
        if s >= self.n {
            return Err(CryptoError::SignatureOutOfRange);
        }
        Ok(to_fixed_be(&s.modpow(&self.e, &self.n), self.modulus_len()))
    }

    pub fn verify_md5sha1(&self, data: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let decrypted = self.encrypt_raw(signature)?;
        let digest = unpad_pkcs1(&decrypted)?;
        if digest != md5sha1(data) {
            return Err(CryptoError::BadSignature);
        }
        Ok(())
    }
}

impl RsaPrivateKey {
    pub fn modulus_len(&self) -> usize {
        byte_len(&self.n)
    }

    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey { n: self.n.clone(), e: self.e.clone() }
    }

    /// PKCS#1 v1.5 signature over `MD5(data) || SHA1(data)`, no DigestInfo.
    pub fn sign_md5sha1(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let k = self.modulus_len();
        let padded = pad_pkcs1(&md5sha1(data), k)?;
        let m = BigUint::from_bytes_be(&padded);
        Ok(to_fixed_be(&m.modpow(&self.d, &self.n), k))
    }
}
