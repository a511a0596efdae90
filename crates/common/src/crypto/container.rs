//! PEM key containers
//!
//! Private keys are stored as PKCS#8, either plain (`PRIVATE KEY`) or wrapped in a
//! PBES2 `EncryptedPrivateKeyInfo` (`ENCRYPTED PRIVATE KEY`). Public keys are stored
//! as an X.509 `SubjectPublicKeyInfo` (`PUBLIC KEY`). These are the encodings OpenSSL
//! and most signing tools exchange, so containers move freely between them.
//!
//! The PEM label is the only thing that decides what a container holds.

use std::fs;
use std::io::Write;
use std::path::Path;

use ed25519_dalek::{SigningKey, VerifyingKey};
use pkcs5::pbes2;
use pkcs8::{
    DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey,
    EncryptedPrivateKeyInfo, ObjectIdentifier, PrivateKeyInfo, SecretDocument,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::emit::PublicFormat;
use super::error::KeyError;
use super::keys::KeyMaterial;

pub const PRIVATE_KEY_TAG: &str = "PRIVATE KEY";
pub const ENCRYPTED_PRIVATE_KEY_TAG: &str = "ENCRYPTED PRIVATE KEY";
pub const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";

/// id-Ed25519 (RFC 8410)
const ED25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 600_000;
pub const MIN_PBKDF2_ITERATIONS: u32 = 1_000;
/// PBKDF2 salt length in bytes
pub const SALT_SIZE: usize = 16;
/// AES-256-CBC initialization vector length in bytes
pub const IV_SIZE: usize = 16;

/// Password-based encryption settings for private containers
///
/// Containers are written with PBES2: PBKDF2-HMAC-SHA256 derives an AES-256-CBC key
/// from the passphrase. The salt and IV are random per export and are recorded in
/// the container together with the iteration count, so loading needs nothing but
/// the passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionParams {
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,
}

fn default_pbkdf2_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

impl Default for EncryptionParams {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: default_pbkdf2_iterations(),
        }
    }
}

impl EncryptionParams {
    pub fn with_iterations(pbkdf2_iterations: u32) -> Self {
        Self { pbkdf2_iterations }
    }

    pub fn validate(&self) -> Result<(), KeyError> {
        if self.pbkdf2_iterations < MIN_PBKDF2_ITERATIONS {
            return Err(KeyError::Encode(format!(
                "pbkdf2_iterations must be at least {}, got {}",
                MIN_PBKDF2_ITERATIONS, self.pbkdf2_iterations
            )));
        }
        Ok(())
    }

    fn encrypt(
        &self,
        info: &PrivateKeyInfo<'_>,
        passphrase: &[u8],
    ) -> Result<SecretDocument, KeyError> {
        self.validate()?;

        let mut salt = [0u8; SALT_SIZE];
        let mut iv = [0u8; IV_SIZE];
        getrandom::getrandom(&mut salt)?;
        getrandom::getrandom(&mut iv)?;

        let scheme = pbes2::Parameters::pbkdf2_sha256_aes256cbc(self.pbkdf2_iterations, &salt, &iv)
            .map_err(|e| KeyError::Encode(format!("invalid PBES2 parameters: {}", e)))?;

        info.encrypt_with_params(scheme, passphrase)
            .map_err(|e| KeyError::Encode(format!("failed to encrypt private key: {}", e)))
    }
}

/// Outcome of loading a container
///
/// An encrypted private container loaded without a passphrase is not an error: it
/// comes back as `Locked` so the caller can prompt and try again.
#[derive(Debug, Clone)]
pub enum Loaded {
    Key(KeyMaterial),
    Locked,
}

impl Loaded {
    pub fn into_key(self) -> Option<KeyMaterial> {
        match self {
            Loaded::Key(key) => Some(key),
            Loaded::Locked => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Loaded::Locked)
    }
}

/// Load a key container from disk
///
/// The PEM label decides whether the result is a full or a public-only key. A
/// passphrase given for an unencrypted container is ignored.
///
/// # Errors
///
/// - `KeyError::Format` if the file is missing, unreadable, malformed or carries an
///   unsupported label
/// - `KeyError::Decryption` if the passphrase is wrong or the ciphertext is corrupt
pub fn load(path: impl AsRef<Path>, passphrase: Option<&[u8]>) -> Result<Loaded, KeyError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| KeyError::Format(format!("failed to read {}: {}", path.display(), e)))?;

    let loaded = KeyMaterial::from_pem_str(&text, passphrase)?;
    match &loaded {
        Loaded::Key(key) => tracing::debug!(
            path = %path.display(),
            full = key.is_full(),
            "loaded key container"
        ),
        Loaded::Locked => tracing::debug!(
            path = %path.display(),
            "key container is encrypted and no passphrase was given"
        ),
    }
    Ok(loaded)
}

impl KeyMaterial {
    /// Parse a PEM container held in memory
    ///
    /// Same rules as [`load`].
    pub fn from_pem_str(text: &str, passphrase: Option<&[u8]>) -> Result<Loaded, KeyError> {
        let pem = pem::parse(text)
            .map_err(|e| KeyError::Format(format!("failed to parse PEM: {}", e)))?;

        match pem.tag() {
            ENCRYPTED_PRIVATE_KEY_TAG => {
                // The outer structure is checked before anyone is asked for a passphrase
                let info = EncryptedPrivateKeyInfo::try_from(pem.contents()).map_err(|e| {
                    KeyError::Format(format!("invalid encrypted private key: {}", e))
                })?;
                let Some(passphrase) = passphrase else {
                    return Ok(Loaded::Locked);
                };
                let der = info.decrypt(passphrase).map_err(|_| KeyError::Decryption)?;
                // A wrong passphrase occasionally survives the CBC padding check and only
                // shows up as garbage DER.
                let inner =
                    PrivateKeyInfo::try_from(der.as_bytes()).map_err(|_| KeyError::Decryption)?;
                if inner.algorithm.oid != ED25519_OID {
                    return Err(KeyError::Format(format!(
                        "unsupported private key algorithm: {}",
                        inner.algorithm.oid
                    )));
                }
                let key = SigningKey::from_pkcs8_der(der.as_bytes())
                    .map_err(|_| KeyError::Decryption)?;
                Ok(Loaded::Key(KeyMaterial::Full(key.into())))
            }
            PRIVATE_KEY_TAG => {
                let key = SigningKey::from_pkcs8_der(pem.contents())
                    .map_err(|e| KeyError::Format(format!("invalid private key: {}", e)))?;
                Ok(Loaded::Key(KeyMaterial::Full(key.into())))
            }
            PUBLIC_KEY_TAG => {
                let key = VerifyingKey::from_public_key_der(pem.contents())
                    .map_err(|e| KeyError::Format(format!("invalid public key: {}", e)))?;
                Ok(Loaded::Key(KeyMaterial::PublicOnly(key.into())))
            }
            other => Err(KeyError::Format(format!(
                "unsupported PEM label: {}",
                other
            ))),
        }
    }

    /// Encode the private key as PEM, encrypted when a passphrase is given
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Usage` on a public-only key.
    pub fn private_pem(
        &self,
        passphrase: Option<&[u8]>,
        params: &EncryptionParams,
    ) -> Result<Zeroizing<String>, KeyError> {
        let secret = self.require_private("export_private")?;
        let der = secret
            .signing_key()
            .to_pkcs8_der()
            .map_err(|e| KeyError::Encode(format!("failed to encode private key: {}", e)))?;

        let pem = match passphrase {
            Some(passphrase) => {
                let info = PrivateKeyInfo::try_from(der.as_bytes())
                    .map_err(|e| KeyError::Encode(format!("invalid PKCS#8 document: {}", e)))?;
                let encrypted = params.encrypt(&info, passphrase)?;
                pem::Pem::new(ENCRYPTED_PRIVATE_KEY_TAG, encrypted.as_bytes())
            }
            None => pem::Pem::new(PRIVATE_KEY_TAG, der.as_bytes()),
        };
        Ok(Zeroizing::new(encode_pem(&pem)))
    }

    /// Encode the public key as an SPKI PEM
    pub fn public_pem(&self) -> Result<String, KeyError> {
        let der = self
            .public_key()
            .verifying_key()
            .to_public_key_der()
            .map_err(|e| KeyError::Encode(format!("failed to encode public key: {}", e)))?;
        Ok(encode_pem(&pem::Pem::new(PUBLIC_KEY_TAG, der.as_bytes())))
    }

    /// Write the private key to `path` with the default encryption settings
    pub fn export_private(
        &self,
        path: impl AsRef<Path>,
        passphrase: Option<&[u8]>,
    ) -> Result<(), KeyError> {
        self.export_private_with(path, passphrase, &EncryptionParams::default())
    }

    /// Write the private key to `path`, replacing whatever is there
    ///
    /// Without a passphrase the key is written in the clear; the file is still created
    /// owner-readable only on Unix.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Usage` on a public-only key. Nothing is written in that case.
    pub fn export_private_with(
        &self,
        path: impl AsRef<Path>,
        passphrase: Option<&[u8]>,
        params: &EncryptionParams,
    ) -> Result<(), KeyError> {
        let path = path.as_ref();
        let pem = self.private_pem(passphrase, params)?;
        write_atomic(path, pem.as_bytes(), Visibility::Private)?;
        tracing::debug!(
            path = %path.display(),
            encrypted = passphrase.is_some(),
            "exported private key"
        );
        Ok(())
    }

    /// Write the public key to `path`, replacing whatever is there
    pub fn export_public(&self, path: impl AsRef<Path>) -> Result<(), KeyError> {
        self.export_public_as(PublicFormat::Pem, path)
    }

    /// Write the public key to `path` in any [`PublicFormat`], replacing whatever is there
    pub fn export_public_as(
        &self,
        format: PublicFormat,
        path: impl AsRef<Path>,
    ) -> Result<(), KeyError> {
        let path = path.as_ref();
        let mut contents = Vec::new();
        self.emit(format, &mut contents)?;
        write_atomic(path, &contents, Visibility::Public)?;
        tracing::debug!(path = %path.display(), ?format, "exported public key");
        Ok(())
    }
}

fn encode_pem(pem: &pem::Pem) -> String {
    pem::encode_config(
        pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Private,
    Public,
}

/// Write `contents` to a temporary file next to `path` and rename it into place.
///
/// A failure at any point leaves `path` as it was.
fn write_atomic(path: &Path, contents: &[u8], visibility: Visibility) -> Result<(), KeyError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Temp files are created 0600 on Unix
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if visibility == Visibility::Public {
            fs::set_permissions(file.path(), fs::Permissions::from_mode(0o644))?;
        }
    }
    #[cfg(not(unix))]
    let _ = visibility;

    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
