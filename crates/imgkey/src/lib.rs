// Configuration, logging and passphrase handling shared by the CLI ops
pub mod config;
pub mod logging;
pub mod passphrase;

pub use config::{Config, ConfigError};
pub use passphrase::{unlock, PassphraseError};
