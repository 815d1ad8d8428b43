use once_cell::sync::Lazy;

use crate::protocol::CipherSuite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyExchangeAlgorithm {
    Null,
    Rsa,
    Dh,
    Ecdh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthAlgorithm {
    Anonymous,
    Rsa,
    Dss,
    Ecdsa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkCipher {
    Null,
    Rc4,
    TripleDes,
    Aes,
    Camellia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherMode {
    Null,
    Stream,
    Cbc,
    Gcm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgorithm {
    Null,
    Md5,
    Sha1,
    Sha256,
    Sha384,
}

// Decomposed view of one cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSuiteInfo {
    pub suite: CipherSuite,
    pub kex: KeyExchangeAlgorithm,
    pub auth: AuthAlgorithm,
    // Ephemeral key exchange, i.e. forward secrecy.
    pub pfs: bool,
    pub cipher: BulkCipher,
    pub key_bits: u16,
    pub mode: CipherMode,
    pub mac: MacAlgorithm,
}

// Keyword filter over the directory; unset fields match anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuiteFilter {
    pub kex: Option<KeyExchangeAlgorithm>,
    pub auth: Option<AuthAlgorithm>,
    pub pfs: Option<bool>,
    pub cipher: Option<BulkCipher>,
    pub key_bits: Option<u16>,
    pub mode: Option<CipherMode>,
}

impl SuiteFilter {
    pub fn matches(&self, info: &CipherSuiteInfo) -> bool {
        self.kex.map_or(true, |v| v == info.kex)
            && self.auth.map_or(true, |v| v == info.auth)
            && self.pfs.map_or(true, |v| v == info.pfs)
            && self.cipher.map_or(true, |v| v == info.cipher)
            && self.key_bits.map_or(true, |v| v == info.key_bits)
            && self.mode.map_or(true, |v| v == info.mode)
    }
}

fn split_kex(kex: &str) -> Option<(KeyExchangeAlgorithm, AuthAlgorithm, bool)> {
    Some(match kex {
        "NULL" => (KeyExchangeAlgorithm::Null, AuthAlgorithm::Anonymous, false),
        "RSA" => (KeyExchangeAlgorithm::Rsa, AuthAlgorithm::Rsa, false),
        "DHE_RSA" => (KeyExchangeAlgorithm::Dh, AuthAlgorithm::Rsa, true),
        "DHE_DSS" => (KeyExchangeAlgorithm::Dh, AuthAlgorithm::Dss, true),
        "ECDHE_RSA" => (KeyExchangeAlgorithm::Ecdh, AuthAlgorithm::Rsa, true),
        "ECDHE_ECDSA" => (KeyExchangeAlgorithm::Ecdh, AuthAlgorithm::Ecdsa, true),
        _ => return None,
    })
}

fn split_cipher(spec: &str) -> Option<(BulkCipher, u16, CipherMode, MacAlgorithm)> {
    let (cipher_part, mac) = spec.rsplit_once('_')?;
    let mac = match mac {
        "NULL" => MacAlgorithm::Null,
        "MD5" => MacAlgorithm::Md5,
        "SHA" => MacAlgorithm::Sha1,
        "SHA256" => MacAlgorithm::Sha256,
        "SHA384" => MacAlgorithm::Sha384,
        _ => return None,
    };

    let parts: Vec<&str> = cipher_part.split('_').collect();
    let info = match parts.as_slice() {
        ["NULL"] => (BulkCipher::Null, 0, CipherMode::Null),
        ["RC4", bits] => (BulkCipher::Rc4, bits.parse().ok()?, CipherMode::Stream),
        ["3DES", "EDE", "CBC"] => (BulkCipher::TripleDes, 168, CipherMode::Cbc),
        [name, bits, mode] => {
            let cipher = match *name {
                "AES" => BulkCipher::Aes,
                "CAMELLIA" => BulkCipher::Camellia,
                _ => return None,
            };
            let mode = match *mode {
                "CBC" => CipherMode::Cbc,
                "GCM" => CipherMode::Gcm,
                _ => return None,
            };
            (cipher, bits.parse().ok()?, mode)
        }
        _ => return None,
    };
    Some((info.0, info.1, info.2, mac))
}

fn describe(suite: CipherSuite) -> Option<CipherSuiteInfo> {
    let rest = suite.name().strip_prefix("TLS_")?;
    let (kex, cipher) = rest.split_once("_WITH_")?;
    let (kex, auth, pfs) = split_kex(kex)?;
    let (cipher, key_bits, mode, mac) = split_cipher(cipher)?;
    Some(CipherSuiteInfo { suite, kex, auth, pfs, cipher, key_bits, mode, mac })
}

// Every real suite; signalling values such as the renegotiation SCSV are left out.
static DIRECTORY: Lazy<Vec<CipherSuiteInfo>> =
    Lazy::new(|| CipherSuite::ALL.iter().copied().filter_map(describe).collect());

pub struct CipherSuiteDirectory;

impl CipherSuiteDirectory {
    pub fn all() -> &'static [CipherSuiteInfo] {
        &DIRECTORY
    }

    pub fn lookup(suite: CipherSuite) -> Option<&'static CipherSuiteInfo> {
        DIRECTORY.iter().find(|i| i.suite == suite)
    }

    pub fn filter(filter: &SuiteFilter) -> Vec<CipherSuite> {
        DIRECTORY.iter().filter(|i| filter.matches(i)).map(|i| i.suite).collect()
    }
}
