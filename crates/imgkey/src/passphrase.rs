//! Passphrase input and unlocking of encrypted key containers

use std::fs;
use std::path::Path;

use common::crypto::{load, KeyError, KeyMaterial, Loaded};
use zeroize::Zeroizing;

pub type Passphrase = Zeroizing<String>;

#[derive(Debug, thiserror::Error)]
pub enum PassphraseError {
    #[error("passphrase is empty")]
    Empty,

    #[error("passphrases do not match")]
    Mismatch,

    #[error("failed to read passphrase file {0}: {1}")]
    File(String, std::io::Error),

    #[error("failed to read passphrase: {0}")]
    Prompt(#[from] std::io::Error),

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Read a passphrase from `passphrase_file`, or prompt on the terminal
pub fn get_passphrase(
    passphrase_file: Option<&Path>,
    prompt: &str,
    confirm: bool,
) -> Result<Passphrase, PassphraseError> {
    match passphrase_file {
        Some(file) => read_passphrase_from_file(file),
        None => prompt_passphrase(prompt, confirm),
    }
}

/// Read a passphrase from the first line of a file
///
/// Only the line terminator is stripped; surrounding spaces are part of the passphrase.
pub fn read_passphrase_from_file(path: &Path) -> Result<Passphrase, PassphraseError> {
    let content = Zeroizing::new(
        fs::read_to_string(path)
            .map_err(|e| PassphraseError::File(path.display().to_string(), e))?,
    );
    let line = content.lines().next().unwrap_or_default();
    non_empty(Zeroizing::new(line.to_string()))
}

pub fn prompt_passphrase(prompt: &str, confirm: bool) -> Result<Passphrase, PassphraseError> {
    let passphrase = non_empty(Zeroizing::new(rpassword::prompt_password(prompt)?))?;

    if confirm {
        let confirmation = Zeroizing::new(rpassword::prompt_password("Confirm passphrase: ")?);
        if *passphrase != *confirmation {
            return Err(PassphraseError::Mismatch);
        }
    }

    Ok(passphrase)
}

fn non_empty(passphrase: Passphrase) -> Result<Passphrase, PassphraseError> {
    if passphrase.is_empty() {
        return Err(PassphraseError::Empty);
    }
    Ok(passphrase)
}

/// Load a key container, asking for a passphrase only if it turns out to be encrypted
pub fn unlock(
    path: &Path,
    passphrase_file: Option<&Path>,
) -> Result<KeyMaterial, PassphraseError> {
    match load(path, None)? {
        Loaded::Key(key) => Ok(key),
        Loaded::Locked => {
            tracing::debug!(path = %path.display(), "key container is encrypted");
            let passphrase = get_passphrase(passphrase_file, "Enter passphrase: ", false)?;
            load(path, Some(passphrase.as_bytes()))?
                .into_key()
                .ok_or(PassphraseError::Key(KeyError::Decryption))
        }
    }
}
