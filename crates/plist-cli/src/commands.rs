//! Subcommand implementations.
//!
//! Each command writes its primary output to the given writer so the binary
//! can pass standard output while tests capture into a buffer.

use crate::config::{CliConfig, Command};
use anyhow::{Context, bail};
use helios_plist::json;
use helios_plist::{Decoded, Decoder, Diagnostic, Encoder};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Overall result of a command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything decoded without diagnostics.
    Clean,
    /// Output was produced, but some input needed defaulting or dropping.
    Warnings,
    /// At least one input could not be read as a property list.
    Failed,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Clean | Outcome::Warnings => 0,
            Outcome::Failed => 1,
        }
    }

    fn of(decoded: &Decoded) -> Self {
        if decoded.has_errors() {
            Outcome::Failed
        } else if decoded.is_clean() {
            Outcome::Clean
        } else {
            Outcome::Warnings
        }
    }

    fn worst(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Outcome::Failed, _) | (_, Outcome::Failed) => Outcome::Failed,
            (Outcome::Warnings, _) | (_, Outcome::Warnings) => Outcome::Warnings,
            _ => Outcome::Clean,
        }
    }
}

/// Runs the configured subcommand.
pub fn run(config: &CliConfig, out: &mut dyn Write) -> anyhow::Result<Outcome> {
    let decoder = Decoder::new(config.decode_options());
    let encoder = Encoder::new(config.encode_options());

    match &config.command {
        Command::Check { files } => {
            let mut outcome = Outcome::Clean;
            for file in files {
                outcome = outcome.worst(check(&decoder, file, out)?);
            }
            Ok(outcome)
        }
        Command::Fmt { input, output } => {
            let decoded = decode_input(&decoder, input)?;
            let xml = encoder.encode_to_vec(&decoded.value);
            write_output(output.as_deref(), &xml, out)?;
            Ok(Outcome::of(&decoded))
        }
        Command::ToJson {
            input,
            pretty,
            output,
        } => {
            let decoded = decode_input(&decoder, input)?;
            let mut text = if *pretty {
                json::to_json_string_pretty(&decoded.value)?
            } else {
                json::to_json_string(&decoded.value)?
            };
            text.push('\n');
            write_output(output.as_deref(), text.as_bytes(), out)?;
            Ok(Outcome::of(&decoded))
        }
        Command::FromJson { input, output } => {
            let bytes = read_input(input)?;
            let value = json::from_json_slice(&bytes)
                .with_context(|| format!("{}: invalid JSON", input.display()))?;
            let xml = encoder.encode_to_vec(&value);
            write_output(output.as_deref(), &xml, out)?;
            Ok(Outcome::Clean)
        }
    }
}

/// Decodes one file and prints its diagnostics, compiler style.
fn check(decoder: &Decoder, path: &Path, out: &mut dyn Write) -> anyhow::Result<Outcome> {
    let decoded = decoder.decode(&read_input(path)?);
    for diagnostic in &decoded.diagnostics {
        writeln!(out, "{}", format_diagnostic(path, diagnostic))?;
    }

    let outcome = Outcome::of(&decoded);
    match outcome {
        Outcome::Failed => writeln!(out, "{}: failed", path.display())?,
        _ => writeln!(
            out,
            "{}: ok ({}, {} warning(s))",
            path.display(),
            decoded.value.kind().name(),
            decoded.diagnostics.len()
        )?,
    }
    Ok(outcome)
}

fn format_diagnostic(path: &Path, diagnostic: &Diagnostic) -> String {
    match diagnostic.position() {
        Some(pos) => format!(
            "{}:{}:{}: {}: {}",
            path.display(),
            pos.line,
            pos.column,
            diagnostic.severity(),
            diagnostic
        ),
        None => format!("{}: {}: {}", path.display(), diagnostic.severity(), diagnostic),
    }
}

/// Decodes an input that has to be usable as a whole, failing on malformed documents.
fn decode_input(decoder: &Decoder, path: &Path) -> anyhow::Result<Decoded> {
    let decoded = decoder.decode(&read_input(path)?);
    if let Some(fatal) = decoded.diagnostics.iter().find(|d| d.is_fatal()) {
        bail!("{}: {}", path.display(), fatal);
    }
    debug!(
        path = %path.display(),
        warnings = decoded.diagnostics.len(),
        "Decoded input"
    );
    Ok(decoded)
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if path.as_os_str() == "-" {
        std::io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("failed to read standard input")?;
    } else {
        bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    }
    Ok(bytes)
}

fn write_output(output: Option<&Path>, bytes: &[u8], out: &mut dyn Write) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "Wrote output");
        }
        None => out.write_all(bytes)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict><key>frames</key><array><string>a.png</string><string>b.png</string></array><key>scale</key><real>0.5</real></dict></plist>"#;

    fn config(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(std::iter::once("plist").chain(args.iter().copied()))
    }

    fn run_to_string(args: &[&str]) -> (anyhow::Result<Outcome>, String) {
        let mut out = Vec::new();
        let result = run(&config(args), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_check_clean() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "sheet.plist", SHEET);

        let (result, output) = run_to_string(&["check", &path]);
        assert_eq!(result.unwrap(), Outcome::Clean);
        assert!(output.contains("ok (dict, 0 warning(s))"));
    }

    #[test]
    fn test_check_reports_warnings_and_failures() {
        let dir = TempDir::new().unwrap();
        let warn = write_file(&dir, "warn.plist", "<plist><array><bogus/></array></plist>");
        let bad = write_file(&dir, "bad.plist", "<plist><dict>");

        let (result, output) = run_to_string(&["check", &warn, &bad]);
        let outcome = result.unwrap();
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(outcome.exit_code(), 1);
        assert!(output.contains("warning: invalid tag <bogus>"));
        assert!(output.contains("error: malformed document"));
        assert!(output.contains("bad.plist: failed"));
    }

    #[test]
    fn test_check_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.plist");
        let (result, _) = run_to_string(&["check", missing.to_str().unwrap()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_fmt_to_file() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "sheet.plist", SHEET);
        let output = dir.path().join("out.plist");

        let (result, stdout) = run_to_string(&[
            "--indent",
            "2",
            "fmt",
            &input,
            "-o",
            output.to_str().unwrap(),
        ]);
        assert_eq!(result.unwrap(), Outcome::Clean);
        assert!(stdout.is_empty());

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("<!DOCTYPE plist"));
        assert!(written.contains("\n    <key>scale</key>\n    <real>0.5</real>\n"));
    }

    #[test]
    fn test_fmt_rejects_malformed() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "bad.plist", "<plist><dict>");
        let (result, stdout) = run_to_string(&["fmt", &input]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("malformed document"));
        assert!(stdout.is_empty());
    }

    #[test]
    fn test_to_json() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "sheet.plist", SHEET);
        let (result, stdout) = run_to_string(&["to-json", &input]);
        assert_eq!(result.unwrap(), Outcome::Clean);
        assert_eq!(stdout, "{\"frames\":[\"a.png\",\"b.png\"],\"scale\":0.5}\n");
    }

    #[test]
    fn test_from_json_round_trips_through_check() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "sheet.json", r#"{"name": "hero", "size": [32, 48]}"#);
        let output = dir.path().join("sheet.plist");

        let (result, _) = run_to_string(&["from-json", &input, "-o", output.to_str().unwrap()]);
        assert_eq!(result.unwrap(), Outcome::Clean);

        let decoded = helios_plist::from_xml_path(&output).unwrap();
        assert!(decoded.is_clean());
        assert_eq!(decoded.value["name"].as_str(), Some("hero"));
        assert_eq!(decoded.value["size"][1].as_integer(), Some(48));
    }

    #[test]
    fn test_from_json_invalid() {
        let dir = TempDir::new().unwrap();
        let input = write_file(&dir, "bad.json", "{nope");
        let (result, _) = run_to_string(&["from-json", &input]);
        assert!(result.unwrap_err().to_string().contains("invalid JSON"));
    }
}
