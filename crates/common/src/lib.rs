/**
 * Cryptographic types and operations.
 *  - Full and public-only Ed25519 key material
 *  - PEM container persistence, optionally
 *    passphrase encrypted
 *  - Public key export for firmware builds
 */
pub mod crypto;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::crypto::{
        load, EncryptionParams, KeyError, KeyMaterial, Loaded, PublicFormat, PublicKey,
        SecretKey,
    };
    pub use crate::version::build_info;
}
