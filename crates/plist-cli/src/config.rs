//! Command line configuration for the `plist` tool.
//!
//! Global settings can come from flags or from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PLIST_LOG_LEVEL` | warn | Log level |
//! | `PLIST_INDENT` | tabs | Output indentation (`tabs`, `none`, or a space count) |
//! | `PLIST_MAX_DEPTH` | 256 | Maximum nesting depth accepted when decoding |
//!
//! # Example
//!
//! ```rust
//! use clap::Parser;
//! use helios_plist_cli::{CliConfig, Command};
//!
//! let config = CliConfig::parse_from(["plist", "--indent", "2", "fmt", "atlas.plist"]);
//! assert!(matches!(config.command, Command::Fmt { .. }));
//! assert!(config.validate().is_ok());
//! ```

use clap::{Parser, Subcommand};
use helios_plist::options::DEFAULT_MAX_DEPTH;
use helios_plist::{DecodeOptions, EncodeOptions, Indent};
use std::path::PathBuf;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Configuration for the `plist` command line tool.
#[derive(Debug, Clone, Parser)]
#[command(name = "plist")]
#[command(about = "Check and convert XML property lists")]
#[command(version)]
pub struct CliConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "PLIST_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Output indentation: `tabs`, `none`, or a number of spaces.
    #[arg(long, env = "PLIST_INDENT", default_value = "tabs", global = true)]
    pub indent: Indent,

    /// Maximum container nesting accepted when decoding.
    #[arg(long, env = "PLIST_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH, global = true)]
    pub max_depth: usize,

    /// Omit the `<!DOCTYPE>` declaration from written documents.
    #[arg(long, global = true)]
    pub no_doctype: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands. An input path of `-` reads standard input.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Decode documents and report every diagnostic.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Decode a document and write it back in canonical form.
    Fmt {
        input: PathBuf,

        /// Output file (standard output when omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a property list to JSON.
    ToJson {
        input: PathBuf,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a JSON document to a property list.
    FromJson {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl CliConfig {
    /// Validates the configuration and returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Log level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        if self.max_depth == 0 {
            errors.push("Max depth cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_depth: self.max_depth,
            ..Default::default()
        }
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            indent: self.indent,
            doctype: !self.no_doctype,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(std::iter::once("plist").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["check", "a.plist"]);
        assert_eq!(config.indent, Indent::Tabs);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!config.no_doctype);
        assert!(config.validate().is_ok());
        assert_eq!(config.decode_options(), DecodeOptions::default());
        assert_eq!(config.encode_options(), EncodeOptions::default());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let config = parse(&["fmt", "a.plist", "--indent", "none", "--no-doctype"]);
        assert_eq!(
            config.encode_options(),
            EncodeOptions {
                indent: Indent::None,
                doctype: false,
            }
        );
    }

    #[test]
    fn test_check_requires_files() {
        let result = CliConfig::try_parse_from(["plist", "check"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_indent_rejected() {
        let result = CliConfig::try_parse_from(["plist", "--indent", "wide", "fmt", "a.plist"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_invalid_max_depth() {
        let config = parse(&["--max-depth", "0", "check", "a.plist"]);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().iter().any(|e| e.contains("Max depth")));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = parse(&["--log-level", "loud", "check", "a.plist"]);
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Log level"));
    }
}
