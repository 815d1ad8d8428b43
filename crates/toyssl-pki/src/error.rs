use toyssl_core::crypto::CryptoError;

#[derive(Debug, thiserror::Error)]
pub enum PkiError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PEM decode failed: {0}")]
    Pem(String),

    #[error("no {labels} block in {path}")]
    MissingBlock { path: String, labels: String },

    #[error("DER decode failed: {0}")]
    Der(String),

    #[error("unexpected ASN.1 structure: {0}")]
    Structure(&'static str),

    #[error("unsupported key algorithm {0}")]
    UnsupportedAlgorithm(String),

    #[error("X.509 decode failed: {0}")]
    X509(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl PkiError {
    // Names the file a missing block was looked for in.
    pub(crate) fn in_file(self, path: &std::path::Path) -> Self {
        match self {
            PkiError::MissingBlock { labels, .. } => PkiError::MissingBlock { path: path.display().to_string(), labels },
            other => other,
        }
    }
}
