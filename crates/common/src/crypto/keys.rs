use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

use super::error::KeyError;

/// Size of Ed25519 private seed in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Size of Ed25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Size of Ed25519 signature in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// Lowercase algorithm name, used as the prefix of emitted C symbols
pub const KEY_SHORTNAME: &str = "ed25519";
/// Signature type as recorded by the image signing pipeline
pub const SIG_TYPE: &str = "ED25519";

/// Ed25519 public key
///
/// A thin wrapper around `ed25519_dalek::VerifyingKey`. This is the only part of a key
/// that ever leaves the tool in a form the firmware consumes: the 32-byte compressed
/// Edwards point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        PublicKey(key)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|_| {
            KeyError::Format(format!(
                "invalid public key size, expected {}, got {}",
                PUBLIC_KEY_SIZE,
                bytes.len()
            ))
        })?;
        Self::from_bytes(&bytes)
    }
}

impl PublicKey {
    /// Parse a public key from its compressed point encoding
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Format` if the bytes are not a valid curve point.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_SIZE]) -> Result<Self, KeyError> {
        VerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|e| KeyError::Format(format!("invalid public key: {}", e)))
    }

    /// Parse a public key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut buff = [0; PUBLIC_KEY_SIZE];
        hex::decode_to_slice(hex, &mut buff)
            .map_err(|_| KeyError::format("public key hex decode error"))?;
        Self::from_bytes(&buff)
    }

    /// Convert public key to raw bytes
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0.to_bytes()
    }

    /// Convert public key to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }

    /// Verify an Ed25519 signature over a message or digest.
    ///
    /// Uses strict verification, which rejects small-order keys and
    /// non-canonical signatures.
    pub fn verify(
        &self,
        msg: &[u8],
        signature: &[u8; SIGNATURE_SIZE],
    ) -> Result<(), ed25519_dalek::SignatureError> {
        let signature = Signature::from_bytes(signature);
        self.0.verify_strict(msg, &signature)
    }
}

/// Ed25519 secret key
///
/// Wraps `ed25519_dalek::SigningKey`, which zeroizes its seed on drop. The `Debug`
/// output never includes the seed.
#[derive(Clone)]
pub struct SecretKey(SigningKey);

impl From<[u8; PRIVATE_KEY_SIZE]> for SecretKey {
    fn from(secret: [u8; PRIVATE_KEY_SIZE]) -> Self {
        Self(SigningKey::from_bytes(&secret))
    }
}

impl From<SigningKey> for SecretKey {
    fn from(key: SigningKey) -> Self {
        Self(key)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("public", &self.public().to_hex())
            .field("seed", &"[REDACTED]")
            .finish()
    }
}

impl SecretKey {
    /// Generate a new random secret key from the operating system CSPRNG
    ///
    /// # Errors
    ///
    /// Returns `KeyError::EntropyUnavailable` if the randomness source fails.
    pub fn generate() -> Result<Self, KeyError> {
        let mut bytes = zeroize::Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        getrandom::getrandom(&mut bytes[..])?;
        Ok(Self::from(*bytes))
    }

    /// Derive the public key from this secret key
    pub fn public(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }

    /// Convert secret key to its 32-byte seed
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.0.to_bytes()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.0
    }

    /// Sign a message with this secret key using Ed25519.
    ///
    /// Signing is deterministic (RFC 8032): the same key and message always
    /// produce the same signature.
    pub fn sign(&self, msg: &[u8]) -> [u8; SIGNATURE_SIZE] {
        self.0.sign(msg).to_bytes()
    }
}

/// Signing key material in one of its two capability shapes
///
/// A `Full` key holds the private seed and can sign and export private data. A
/// `PublicOnly` key holds nothing but the public point; every operation that needs the
/// seed fails on it with [`KeyError::Usage`]. The only way between the two shapes is
/// [`KeyMaterial::public_view`], which derives a new value and leaves the original
/// untouched.
#[derive(Debug, Clone)]
pub enum KeyMaterial {
    Full(SecretKey),
    PublicOnly(PublicKey),
}

impl From<SecretKey> for KeyMaterial {
    fn from(key: SecretKey) -> Self {
        KeyMaterial::Full(key)
    }
}

impl From<PublicKey> for KeyMaterial {
    fn from(key: PublicKey) -> Self {
        KeyMaterial::PublicOnly(key)
    }
}

impl KeyMaterial {
    /// Generate a fresh full keypair
    pub fn generate() -> Result<Self, KeyError> {
        let key = SecretKey::generate()?;
        tracing::info!(public_key = %key.public().to_hex(), "generated ed25519 keypair");
        Ok(KeyMaterial::Full(key))
    }

    /// Derive the public-only projection of this key
    pub fn public_view(&self) -> KeyMaterial {
        KeyMaterial::PublicOnly(self.public_key())
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            KeyMaterial::Full(secret) => secret.public(),
            KeyMaterial::PublicOnly(public) => *public,
        }
    }

    /// The raw 32-byte public point
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public_key().to_bytes()
    }

    pub fn is_full(&self) -> bool {
        matches!(self, KeyMaterial::Full(_))
    }

    /// Access the private half, or fail with `KeyError::Usage` naming `operation`.
    ///
    /// Every operation that touches private key material goes through here.
    pub(crate) fn require_private(&self, operation: &'static str) -> Result<&SecretKey, KeyError> {
        match self {
            KeyMaterial::Full(secret) => Ok(secret),
            KeyMaterial::PublicOnly(_) => Err(KeyError::Usage(operation)),
        }
    }

    /// Sign a pre-computed digest.
    ///
    /// The digest bytes are signed as given; they are never hashed again here, so the
    /// caller picks the pre-hash algorithm independently of the signature scheme.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Usage` on a public-only key.
    pub fn sign_digest(&self, digest: &[u8]) -> Result<[u8; SIGNATURE_SIZE], KeyError> {
        let secret = self.require_private("sign_digest")?;
        Ok(secret.sign(digest))
    }

    /// Check `signature` over `digest` against this key's public projection.
    pub fn verify_digest(
        &self,
        digest: &[u8],
        signature: &[u8; SIGNATURE_SIZE],
    ) -> Result<(), ed25519_dalek::SignatureError> {
        self.public_key().verify(digest, signature)
    }

    pub fn shortname(&self) -> &'static str {
        KEY_SHORTNAME
    }

    pub fn sig_type(&self) -> &'static str {
        SIG_TYPE
    }

    pub fn sig_tlv(&self) -> &'static str {
        SIG_TYPE
    }

    pub fn sig_len(&self) -> usize {
        SIGNATURE_SIZE
    }
}
