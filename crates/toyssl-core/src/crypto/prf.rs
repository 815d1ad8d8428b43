use hmac::{digest::KeyInit, Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::Sha256;

use crate::{crypto::CryptoError, framing::ProtocolVersion, protocol::Random};

pub const MASTER_SECRET_LEN: usize = 48;
pub const MASTER_SECRET_LABEL: &[u8] = b"master secret";

pub type MasterSecret = [u8; MASTER_SECRET_LEN];

// Which PRF construction a negotiated version uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrfMode {
    // P_MD5(S1) xor P_SHA1(S2), SSLv3 through TLS 1.1.
    Md5Sha1,
    // P_SHA256 over the whole secret, TLS 1.2.
    Sha256,
}

impl PrfMode {
    pub fn for_version(version: ProtocolVersion) -> Self {
        match version {
            ProtocolVersion::Tls1_2 => PrfMode::Sha256,
            ProtocolVersion::Ssl3_0 | ProtocolVersion::Tls1_0 | ProtocolVersion::Tls1_1 => PrfMode::Md5Sha1,
        }
    }
}

/*
    P_hash(secret, seed):
        A(0) = seed
        A(i) = HMAC(secret, A(i-1))
        out  = HMAC(secret, A(1) || seed) || HMAC(secret, A(2) || seed) || ...
    truncated to out_len.
*/
pub fn p_hash<M>(secret: &[u8], seed: &[u8], out_len: usize) -> Result<Vec<u8>, CryptoError>
where
    M: Mac + KeyInit + Clone,
{
    let keyed = <M as KeyInit>::new_from_slice(secret).map_err(|_| CryptoError::KeyDerivation("HMAC rejected the secret"))?;

    let mut out = Vec::with_capacity(out_len);
    let mut a = seed.to_vec();
    while out.len() < out_len {
        let mut mac = keyed.clone();
        mac.update(&a);
        a = mac.finalize().into_bytes().to_vec();

        let mut mac = keyed.clone();
        mac.update(&a);
        mac.update(seed);
        out.extend_from_slice(&mac.finalize().into_bytes());
    }
    out.truncate(out_len);
    Ok(out)
}

/// Splits a secret for the dual-hash PRF; the first half gets the extra
/// byte when the length is odd.
pub fn split_secret(secret: &[u8]) -> (&[u8], &[u8]) {
    secret.split_at((secret.len() + 1) / 2)
}

pub fn prf(mode: PrfMode, secret: &[u8], label: &[u8], seed: &[u8], out_len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut full_seed = Vec::with_capacity(label.len() + seed.len());
    full_seed.extend_from_slice(label);
    full_seed.extend_from_slice(seed);

    match mode {
        PrfMode::Sha256 => p_hash::<Hmac<Sha256>>(secret, &full_seed, out_len),
        PrfMode::Md5Sha1 => {
            let (s1, s2) = split_secret(secret);
            let mut out = p_hash::<Hmac<Md5>>(s1, &full_seed, out_len)?;
            let sha = p_hash::<Hmac<Sha1>>(s2, &full_seed, out_len)?;
            out.iter_mut().zip(sha).for_each(|(a, b)| *a ^= b);
            Ok(out)
        }
    }
}

/// master_secret = PRF(pre_master_secret, "master secret", client_random || server_random)[0..48]
pub fn derive_master_secret(
    mode: PrfMode,
    pre_master_secret: &[u8],
    client_random: &Random,
    server_random: &Random,
) -> Result<MasterSecret, CryptoError> {
    let mut seed = Vec::with_capacity(64);
    seed.extend_from_slice(&client_random.0);
    seed.extend_from_slice(&server_random.0);

    let out = prf(mode, pre_master_secret, MASTER_SECRET_LABEL, &seed, MASTER_SECRET_LEN)?;
    let mut master = [0u8; MASTER_SECRET_LEN];
    master.copy_from_slice(&out);
    Ok(master)
}
