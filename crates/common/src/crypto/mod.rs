//! Cryptographic primitives for imgkey
//!
//! This module provides the key layer of the image signing toolchain:
//!
//! - **Key material**: Ed25519 keys as either a full keypair or a public-only key
//! - **Containers**: PEM persistence (PKCS#8, optionally PBES2 encrypted, and SPKI)
//! - **Export**: public key PEM, raw bytes, SHA-256 digests and C/Rust array literals
//! - **Signing**: deterministic Ed25519 signatures over pre-computed digests
//!
//! # Capabilities
//!
//! A [`KeyMaterial`] is either `Full` or `PublicOnly`. Public data (export,
//! verification) is available on both. Private data (signing, private export) is only
//! available on `Full`; asking a public-only key for it fails with
//! [`KeyError::Usage`] instead of producing empty or fabricated output.
//!
//! # Loading
//!
//! [`load`] returns a three-way [`Loaded`]: a full key, a public-only key, or
//! `Locked` when the container is encrypted and no passphrase was supplied. `Locked`
//! is the cue for an interactive caller to prompt and load again.

mod container;
mod emit;
mod error;
mod keys;

pub use container::{
    load, EncryptionParams, Loaded, DEFAULT_PBKDF2_ITERATIONS, ENCRYPTED_PRIVATE_KEY_TAG,
    MIN_PBKDF2_ITERATIONS, PRIVATE_KEY_TAG, PUBLIC_KEY_TAG,
};
pub use emit::{PublicFormat, SourceSyntax, AUTOGEN_MESSAGE, PUBLIC_KEY_HASH_SIZE};
pub use error::KeyError;
pub use keys::{
    KeyMaterial, PublicKey, SecretKey, KEY_SHORTNAME, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE,
    SIGNATURE_SIZE, SIG_TYPE,
};
