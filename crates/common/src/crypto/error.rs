/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// A private operation was attempted on a public-only key
    #[error("operation requires private key material: {0}")]
    Usage(&'static str),

    /// The container is missing, unreadable or not a supported key encoding
    #[error("invalid key container: {0}")]
    Format(String),

    /// Wrong passphrase, or the encrypted payload is corrupt
    #[error("failed to decrypt private key: wrong passphrase or corrupted container")]
    Decryption,

    #[error("failed to encode key container: {0}")]
    Encode(String),

    #[error("system entropy unavailable: {0}")]
    EntropyUnavailable(#[from] getrandom::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeyError {
    pub(crate) fn format(msg: impl std::fmt::Display) -> Self {
        KeyError::Format(msg.to_string())
    }
}
