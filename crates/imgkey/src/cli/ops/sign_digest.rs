use std::fs;
use std::path::PathBuf;

use clap::Args;

use common::crypto::KeyError;
use imgkey::{unlock, PassphraseError};

#[derive(Args, Debug, Clone)]
pub struct SignDigest {
    /// Private key container to sign with
    #[arg(short, long)]
    pub key: PathBuf,

    /// Pre-computed image digest, hex encoded
    #[arg(short, long)]
    pub digest: String,

    /// Write the raw 64-byte signature to this file instead of printing hex
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read the passphrase from a file if the key is encrypted
    #[arg(long)]
    pub passphrase_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum SignDigestError {
    #[error("invalid digest: {0}")]
    InvalidDigest(#[from] hex::FromHexError),

    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("failed to load key: {0}")]
    Load(#[from] PassphraseError),

    #[error("failed to write signature to {0}: {1}")]
    Output(String, std::io::Error),
}

/// Decode a hex digest, with or without a "0x" prefix
fn parse_digest(digest: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digest = digest.trim();
    hex::decode(digest.strip_prefix("0x").unwrap_or(digest))
}

impl crate::cli::op::Op for SignDigest {
    type Error = SignDigestError;
    type Output = String;

    fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let digest = parse_digest(&self.digest)?;
        let key = unlock(&self.key, self.passphrase_file.as_deref())?;
        let signature = key.sign_digest(&digest)?;
        tracing::debug!(digest_len = digest.len(), "signed digest");

        match &self.output {
            Some(path) => {
                fs::write(path, signature)
                    .map_err(|e| SignDigestError::Output(path.display().to_string(), e))?;
                Ok(format!("wrote signature to {}", path.display()))
            }
            None => Ok(hex::encode(signature)),
        }
    }
}
