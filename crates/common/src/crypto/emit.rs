//! Public key export for firmware builds
//!
//! Everything here is a function of the 32 public bytes, so it works the same on
//! full and public-only keys. Source emitters declare byte arrays under fixed
//! symbol names that bootloader build systems include verbatim:
//!
//! | emitter                   | symbols                                              |
//! |---------------------------|------------------------------------------------------|
//! | `emit_c_declaration`      | `ed25519_pub_key`, `ed25519_pub_key_len`             |
//! | `emit_c_hash_declaration` | `ed25519_pub_key_hash`, `ed25519_pub_key_hash_len`   |
//! | `emit_rust_declaration`   | `ED25519_PUB_KEY`                                    |

use std::io::Write;

use sha2::{Digest, Sha256};

use super::error::KeyError;
use super::keys::{KeyMaterial, KEY_SHORTNAME};

/// Size of the SHA-256 public key digest in bytes
pub const PUBLIC_KEY_HASH_SIZE: usize = 32;

pub const AUTOGEN_MESSAGE: &str = "/* Autogenerated by imgkey, do not edit. */";

const BYTES_PER_LINE: usize = 8;
const INDENT: &str = "    ";

/// Target language of an emitted array declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSyntax {
    C,
    Rust,
}

impl SourceSyntax {
    fn header(&self, symbol: &str) -> String {
        match self {
            SourceSyntax::C => format!("const unsigned char {}[] = {{", symbol),
            SourceSyntax::Rust => format!("static {}: &[u8] = &[", symbol),
        }
    }

    fn trailer(&self) -> &'static str {
        match self {
            SourceSyntax::C => "};",
            SourceSyntax::Rust => "];",
        }
    }

    fn length_declaration(&self, symbol: &str, len: usize) -> Option<String> {
        match self {
            SourceSyntax::C => Some(format!("const unsigned int {}_len = {};", symbol, len)),
            SourceSyntax::Rust => None,
        }
    }

    /// Render `bytes` as an array named `symbol`
    pub fn render(&self, symbol: &str, bytes: &[u8]) -> String {
        let mut out = String::new();
        out.push_str(AUTOGEN_MESSAGE);
        out.push('\n');
        out.push_str(&self.header(symbol));
        for (count, byte) in bytes.iter().enumerate() {
            if count % BYTES_PER_LINE == 0 {
                out.push('\n');
                out.push_str(INDENT);
            } else {
                out.push(' ');
            }
            out.push_str(&format!("0x{:02x},", byte));
        }
        out.push('\n');
        out.push_str(self.trailer());
        out.push('\n');
        if let Some(len) = self.length_declaration(symbol, bytes.len()) {
            out.push_str(&len);
            out.push('\n');
        }
        out
    }
}

/// What an array declaration carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Payload {
    PublicKey,
    PublicKeyHash,
}

/// Every source declaration the exporter knows how to write
const DECLARATIONS: &[(PublicFormat, SourceSyntax, Payload)] = &[
    (PublicFormat::C, SourceSyntax::C, Payload::PublicKey),
    (PublicFormat::CHash, SourceSyntax::C, Payload::PublicKeyHash),
    (PublicFormat::Rust, SourceSyntax::Rust, Payload::PublicKey),
];

impl Payload {
    fn symbol(&self, syntax: SourceSyntax) -> String {
        let base = match self {
            Payload::PublicKey => format!("{}_pub_key", KEY_SHORTNAME),
            Payload::PublicKeyHash => format!("{}_pub_key_hash", KEY_SHORTNAME),
        };
        match syntax {
            SourceSyntax::C => base,
            SourceSyntax::Rust => base.to_uppercase(),
        }
    }
}

/// Output encodings for a public key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicFormat {
    /// SubjectPublicKeyInfo PEM
    Pem,
    /// The 32-byte point, no framing
    Raw,
    /// SHA-256 of the raw point, no framing
    RawHash,
    /// C array of the raw point plus its length
    C,
    /// C array of the point's SHA-256 plus its length
    CHash,
    /// Rust static slice of the raw point
    Rust,
}

impl KeyMaterial {
    /// SHA-256 digest of the raw public key bytes
    pub fn public_key_hash(&self) -> [u8; PUBLIC_KEY_HASH_SIZE] {
        Sha256::digest(self.public_bytes()).into()
    }

    /// Write the public key to `sink` in the given format
    pub fn emit(&self, format: PublicFormat, sink: &mut impl Write) -> Result<(), KeyError> {
        match format {
            PublicFormat::Pem => sink.write_all(self.public_pem()?.as_bytes())?,
            PublicFormat::Raw => sink.write_all(&self.public_bytes())?,
            PublicFormat::RawHash => sink.write_all(&self.public_key_hash())?,
            PublicFormat::C | PublicFormat::CHash | PublicFormat::Rust => {
                sink.write_all(self.source_declaration(format).as_bytes())?
            }
        }
        sink.flush()?;
        Ok(())
    }

    fn source_declaration(&self, format: PublicFormat) -> String {
        DECLARATIONS
            .iter()
            .filter(|(f, _, _)| *f == format)
            .map(|(_, syntax, payload)| {
                let bytes = match payload {
                    Payload::PublicKey => self.public_bytes(),
                    Payload::PublicKeyHash => self.public_key_hash(),
                };
                syntax.render(&payload.symbol(*syntax), &bytes)
            })
            .collect()
    }

    pub fn emit_public_container(&self, sink: &mut impl Write) -> Result<(), KeyError> {
        self.emit(PublicFormat::Pem, sink)
    }

    pub fn emit_raw_public(&self, sink: &mut impl Write) -> Result<(), KeyError> {
        self.emit(PublicFormat::Raw, sink)
    }

    pub fn emit_raw_public_hash(&self, sink: &mut impl Write) -> Result<(), KeyError> {
        self.emit(PublicFormat::RawHash, sink)
    }

    pub fn emit_c_declaration(&self, sink: &mut impl Write) -> Result<(), KeyError> {
        self.emit(PublicFormat::C, sink)
    }

    pub fn emit_c_hash_declaration(&self, sink: &mut impl Write) -> Result<(), KeyError> {
        self.emit(PublicFormat::CHash, sink)
    }

    pub fn emit_rust_declaration(&self, sink: &mut impl Write) -> Result<(), KeyError> {
        self.emit(PublicFormat::Rust, sink)
    }
}
