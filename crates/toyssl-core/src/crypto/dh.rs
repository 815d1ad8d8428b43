use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{rngs::OsRng, RngCore};

use crate::crypto::{byte_len, CryptoError};

// Finite-field Diffie-Hellman group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhParams {
    pub p: BigUint,
    pub g: BigUint,
}

impl DhParams {
    pub fn new(p: BigUint, g: BigUint) -> Result<Self, CryptoError> {
        if p <= BigUint::from(2u32) {
            return Err(CryptoError::InvalidParameters("modulus too small"));
        }
        if g <= BigUint::one() || g >= p {
            return Err(CryptoError::InvalidParameters("generator out of range (1, p)"));
        }
        Ok(Self { p, g })
    }

    pub fn bit_len(&self) -> u64 {
        self.p.bits()
    }

    /// Uniform exponent in `[0, p)`.
    ///
    /// Draws from the smallest whole-byte range covering `p - 1` and rejects
    /// anything at or above the largest multiple of `p` in that range, so the
    /// final reduction carries no modulo bias.
    pub fn random_exponent<R: RngCore + ?Sized>(&self, rng: &mut R) -> BigUint {
        let bytecnt = byte_len(&(&self.p - 1u32)).max(1);
        let space = BigUint::one() << (8 * bytecnt);
        let cutoff = (&space / &self.p) * &self.p;

        let mut buf = vec![0u8; bytecnt];
        loop {
            rng.fill_bytes(&mut buf);
            let candidate = BigUint::from_bytes_be(&buf);
            if candidate < cutoff {
                return candidate % &self.p;
            }
        }
    }

    /// Fresh session for the side that generates its own exponent.
    pub fn new_session(&self) -> DhSession {
        self.new_session_with(&mut OsRng)
    }

    pub fn new_session_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> DhSession {
        let private = self.random_exponent(rng);
        self.session_from_private(private)
    }

    pub fn session_from_private(&self, private: BigUint) -> DhSession {
        let public = self.g.modpow(&private, &self.p);
        DhSession { params: self.clone(), private: Some(private), public }
    }

    /// Session describing only the peer's public value.
    pub fn peer_session(&self, public: BigUint) -> Result<DhSession, CryptoError> {
        self.check_public(&public)?;
        Ok(DhSession { params: self.clone(), private: None, public })
    }

    pub fn check_public(&self, y: &BigUint) -> Result<(), CryptoError> {
        if y.is_zero() || *y >= self.p {
            return Err(CryptoError::InvalidPublicValue);
        }
        Ok(())
    }
}

// One side of a DH exchange. The private exponent is consumed by `establish`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhSession {
    params: DhParams,
    private: Option<BigUint>,
    public: BigUint,
}

impl DhSession {
    pub fn params(&self) -> &DhParams {
        &self.params
    }

    pub fn public_value(&self) -> &BigUint {
        &self.public
    }

    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }

    /// Shared secret `peer^r mod p` as minimal big-endian bytes.
    pub fn establish(&mut self, peer: &BigUint) -> Result<Vec<u8>, CryptoError> {
        self.params.check_public(peer)?;
        let r = self.private.take().ok_or(CryptoError::MissingPrivateExponent)?;
        let shared = peer.modpow(&r, &self.params.p);
        Ok(shared.to_bytes_be())
    }
}
