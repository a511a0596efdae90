// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Getpub, Keygen, SignDigest, Version};
use imgkey::logging::{init_logging, DEFAULT_LOG_LEVEL};
use imgkey::Config;

command_enum! {
    (Keygen, Keygen),
    (Getpub, Getpub),
    (SignDigest, SignDigest),
    (Version, Version),
}

fn main() {
    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Explicit flag > config file > warn
    let log_level = args
        .log_level
        .or_else(|| config.log_level().ok().flatten())
        .unwrap_or(DEFAULT_LOG_LEVEL);
    init_logging(log_level);
    tracing::debug!(?config, "configuration");

    let ctx = cli::op::OpContext::new(config);

    match args.command.execute(&ctx) {
        Ok(output) => {
            let output = output.to_string();
            if !output.is_empty() {
                println!("{}", output);
            }
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
