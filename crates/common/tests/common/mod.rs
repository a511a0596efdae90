//! Shared test utilities for key integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use common::crypto::{EncryptionParams, KeyMaterial, MIN_PBKDF2_ITERATIONS};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

/// Cheap PBKDF2 settings so encrypted round trips stay quick
pub const FAST: EncryptionParams = EncryptionParams {
    pbkdf2_iterations: MIN_PBKDF2_ITERATIONS,
};

pub struct TestDir(TempDir);

impl TestDir {
    pub fn new() -> Self {
        Self(TempDir::new().unwrap())
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.0.path().join(name)
    }
}

pub fn sha256(msg: &[u8]) -> [u8; 32] {
    Sha256::digest(msg).into()
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Export `key` as a public container and load it back
pub fn reload_public(dir: &TestDir, key: &KeyMaterial) -> KeyMaterial {
    let path = dir.path("reload-pub.pem");
    key.export_public(&path).unwrap();
    common::crypto::load(&path, None).unwrap().into_key().unwrap()
}
