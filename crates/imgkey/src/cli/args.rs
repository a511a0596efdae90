pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "imgkey")]
#[command(about = "Ed25519 key management for bootloader image signing")]
#[command(version)]
pub struct Args {
    /// Path to a config file (defaults to <config dir>/imgkey/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics on stderr (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    #[command(subcommand)]
    pub command: crate::Command,
}
