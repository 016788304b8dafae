//! Error types for property list reading and writing.
//!
//! Content problems in a document never surface here: the decoder reports
//! them as [`Diagnostic`](crate::Diagnostic)s alongside a best-effort value.
//! [`PlistError`] only covers the I/O shell around the codec (streams, files)
//! and the optional JSON bridge.

use thiserror::Error;

/// Hard failures of the surrounding I/O and conversion layers.
#[derive(Error, Debug)]
pub enum PlistError {
    /// IO error while reading or writing a document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization error
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for property list operations
pub type Result<T> = std::result::Result<T, PlistError>;
