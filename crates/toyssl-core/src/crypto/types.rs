use num_bigint::BigUint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
}

// Public key descriptor extracted from a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Ecc { curve: String, x: BigUint, y: BigUint },
}

impl PublicKey {
    pub fn kind(&self) -> &'static str {
        match self {
            PublicKey::Rsa(_) => "rsa",
            PublicKey::Ecc { .. } => "ecc",
        }
    }
}

// Size in bytes of the big-endian encoding of a modulus.
pub(crate) fn byte_len(n: &BigUint) -> usize {
    ((n.bits() + 7) / 8) as usize
}
