use std::io;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use common::crypto::{KeyError, PublicFormat};
use imgkey::{unlock, PassphraseError};

/// Public key encodings selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// SubjectPublicKeyInfo PEM
    Pem,
    /// The 32-byte public point
    Raw,
    /// SHA-256 of the 32-byte public point
    RawHash,
    /// C array declaration
    C,
    /// C array declaration of the key hash
    CHash,
    /// Rust static slice declaration
    Rust,
}

impl From<Encoding> for PublicFormat {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Pem => PublicFormat::Pem,
            Encoding::Raw => PublicFormat::Raw,
            Encoding::RawHash => PublicFormat::RawHash,
            Encoding::C => PublicFormat::C,
            Encoding::CHash => PublicFormat::CHash,
            Encoding::Rust => PublicFormat::Rust,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct Getpub {
    /// Key container to read (private or public)
    #[arg(short, long)]
    pub key: PathBuf,

    /// Output encoding
    #[arg(short, long, value_enum, default_value_t = Encoding::C)]
    pub encoding: Encoding,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read the passphrase from a file if the key is encrypted
    #[arg(long)]
    pub passphrase_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetpubError {
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("failed to load key: {0}")]
    Load(#[from] PassphraseError),
}

impl crate::cli::op::Op for Getpub {
    type Error = GetpubError;
    type Output = String;

    fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let key = unlock(&self.key, self.passphrase_file.as_deref())?;
        let format = PublicFormat::from(self.encoding);

        match &self.output {
            Some(path) => {
                key.export_public_as(format, path)?;
                Ok(format!("wrote public key to {}", path.display()))
            }
            None => {
                key.emit(format, &mut io::stdout().lock())?;
                // The artifact is the output
                Ok(String::new())
            }
        }
    }
}
