//! Structured reports of anomalies found while decoding.
//!
//! Decoding always produces a value. Anything that went wrong on the way is
//! described by a [`Diagnostic`]; only [`Diagnostic::DocumentMalformed`]
//! invalidates the whole document; every other kind is contained in the
//! smallest subtree it affects.

use std::fmt;
use thiserror::Error;

/// Location of a node in the source text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Decoding carried on; part of the value may be defaulted or missing.
    Warning,
    /// The document could not be read at all.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A non-fatal report produced while decoding a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The input is not well-formed XML; the decoded value is `Null`.
    #[error("malformed document at {position}: {message}")]
    DocumentMalformed { message: String, position: Position },

    /// The root `version` attribute is not `1.0`; decoding continued.
    #[error("unknown plist version {version:?}, parsing might fail unexpectedly")]
    VersionMismatch { version: String },

    /// An element outside the property list vocabulary; its subtree is `Null`.
    #[error("invalid tag <{tag}> at {position} (text: {text:?})")]
    UnknownTag {
        tag: String,
        text: String,
        position: Position,
    },

    /// Text inside a typed leaf could not be converted; the leaf was defaulted.
    #[error("cannot read {text:?} as <{tag}> at {position}: {reason}")]
    ValueCoercionFailure {
        tag: String,
        text: String,
        reason: String,
        position: Position,
    },

    /// A second value was stored under a key without an intervening `<key>`.
    #[error("value at {position} reuses key {key:?} without a preceding <key>")]
    KeyReused { key: String, position: Position },

    /// Nesting went deeper than the configured limit; the subtree is `Null`.
    #[error("nesting deeper than {limit} levels at {position}")]
    DepthExceeded { limit: usize, position: Position },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::DocumentMalformed { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Returns `true` when the whole document was discarded.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Source position the diagnostic refers to, when it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Diagnostic::DocumentMalformed { position, .. }
            | Diagnostic::UnknownTag { position, .. }
            | Diagnostic::ValueCoercionFailure { position, .. }
            | Diagnostic::KeyReused { position, .. }
            | Diagnostic::DepthExceeded { position, .. } => Some(*position),
            Diagnostic::VersionMismatch { .. } => None,
        }
    }
}
