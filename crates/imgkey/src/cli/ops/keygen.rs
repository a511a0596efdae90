use std::path::PathBuf;

use clap::Args;

use common::crypto::{KeyError, KeyMaterial};
use imgkey::passphrase::{get_passphrase, PassphraseError};

#[derive(Args, Debug, Clone)]
pub struct Keygen {
    /// Where to write the new private key container
    #[arg(short, long)]
    pub key: PathBuf,

    /// Encrypt the private key with a passphrase (prompted twice)
    #[arg(short = 'p', long)]
    pub password: bool,

    /// Read the passphrase from a file instead of prompting (implies --password)
    #[arg(long)]
    pub passphrase_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("passphrase error: {0}")]
    Passphrase(#[from] PassphraseError),
}

impl crate::cli::op::Op for Keygen {
    type Error = KeygenError;
    type Output = String;

    fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let passphrase = if self.password || self.passphrase_file.is_some() {
            Some(get_passphrase(
                self.passphrase_file.as_deref(),
                "Enter passphrase: ",
                true,
            )?)
        } else {
            None
        };

        let key = KeyMaterial::generate()?;
        key.export_private_with(
            &self.key,
            passphrase.as_ref().map(|p| p.as_bytes()),
            &ctx.config.encryption,
        )?;

        Ok(format!(
            "wrote {} private key to {}\npublic key: {}",
            key.shortname(),
            self.key.display(),
            key.public_key().to_hex()
        ))
    }
}
