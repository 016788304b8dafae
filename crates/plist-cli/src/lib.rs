//! # helios-plist-cli - Property List Command Line Tool
//!
//! Library half of the `plist` binary: argument parsing, logging setup and
//! the subcommands, kept out of `main.rs` so they can be tested in-process.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `check <files>...` | Decode each file and print its diagnostics |
//! | `fmt <input>` | Rewrite a document in canonical form |
//! | `to-json <input>` | Convert a property list to JSON |
//! | `from-json <input>` | Convert JSON to a property list |
//!
//! `check` exits with status 1 when any file is malformed. Warnings alone do
//! not change the exit status.
//!
//! ## Architecture
//!
//! - [`config`] - Command line and environment configuration
//! - [`commands`] - Subcommand implementations

pub mod commands;
pub mod config;

pub use commands::{Outcome, run};
pub use config::{CliConfig, Command};

/// Initializes the tracing subscriber for logging.
///
/// Log lines go to standard error so they never mix with converted output.
/// `RUST_LOG` overrides `level` when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("helios_plist={level},helios_plist_cli={level}"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
