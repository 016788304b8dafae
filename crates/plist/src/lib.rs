//! # Helios Property List Codec
//!
//! Reads and writes XML property lists (the `plist` format used for
//! configuration and sprite sheet metadata) as a dynamically typed [`Value`]
//! tree.
//!
//! ## Features
//!
//! - **Closed value model**: [`Value`] is an enum with one variant per element
//!   kind, so decoding and encoding are each a single exhaustive `match`.
//! - **Lenient decoding**: malformed input never panics or returns an error.
//!   [`decode`] always yields a value together with structured
//!   [`Diagnostic`]s describing what was defaulted or dropped.
//! - **Total encoding**: [`encode`] renders any value as a well-formed
//!   document.
//! - **JSON bridge** (feature `json`, on by default): lossy conversions to and
//!   from `serde_json::Value`.
//!
//! ## Examples
//!
//! ```rust
//! use helios_plist::{Value, decode, encode};
//!
//! let value = Value::from_iter([
//!     ("a", Value::from(1)),
//!     ("b", Value::from_iter([Value::from("x"), Value::from(true)])),
//! ]);
//!
//! let xml = encode(&value);
//! assert!(xml.contains("<key>a</key>"));
//!
//! let decoded = decode(xml.as_bytes());
//! assert!(decoded.is_clean());
//! assert_eq!(decoded.value, value);
//! ```

pub mod date;
pub mod diagnostic;
pub mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod options;
pub mod value;
pub mod xml;

// Re-export common types and functions
pub use date::Date;
pub use diagnostic::{Diagnostic, Position, Severity};
pub use error::{PlistError, Result};
pub use options::{DecodeOptions, EncodeOptions, Indent};
pub use value::{Dictionary, Kind, Value};

// Re-export XML functions at top level for convenience
pub use xml::{
    Decoded, Decoder, Encoder, from_xml_path, from_xml_reader, from_xml_slice, from_xml_str,
    to_xml_path, to_xml_string, to_xml_vec, to_xml_writer,
};

/// Decodes a property list document with default options.
///
/// Never fails: a malformed document yields [`Value::Null`] and a fatal
/// diagnostic.
pub fn decode(bytes: &[u8]) -> Decoded {
    from_xml_slice(bytes)
}

/// Encodes a value as a property list document with default options.
pub fn encode(value: &Value) -> String {
    to_xml_string(value)
}
