//! `plist` - check and convert XML property lists.

use clap::Parser;
use helios_plist_cli::{CliConfig, init_logging, run};
use std::process::ExitCode;
use tracing::debug;

fn main() -> anyhow::Result<ExitCode> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    debug!(
        indent = %config.indent,
        max_depth = config.max_depth,
        doctype = !config.no_doctype,
        "Starting plist"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = run(&config, &mut out)?;

    Ok(ExitCode::from(outcome.exit_code()))
}
