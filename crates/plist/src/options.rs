//! Configuration for the decoder and encoder.
//!
//! Both option sets have defaults matching common property list tooling, so
//! most callers go through [`decode`](crate::decode) and
//! [`encode`](crate::encode) and never construct these directly.
//!
//! ```rust
//! use helios_plist::{DecodeOptions, EncodeOptions, Indent};
//!
//! let decode = DecodeOptions {
//!     max_depth: 64,
//!     ..Default::default()
//! };
//! let encode = EncodeOptions {
//!     indent: Indent::Spaces(2),
//!     ..Default::default()
//! };
//! assert!(decode.warn_on_key_reuse);
//! assert!(encode.doctype);
//! ```

use std::fmt;
use std::str::FromStr;

/// Default nesting limit for decoding.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Decoder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum container nesting below `<plist>`. Deeper subtrees decode to
    /// `Null` with a depth diagnostic.
    pub max_depth: usize,

    /// Report a diagnostic when several values follow a single `<key>`.
    pub warn_on_key_reuse: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            warn_on_key_reuse: true,
        }
    }
}

/// Indentation used when writing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    /// One tab per level.
    #[default]
    Tabs,
    /// The given number of spaces per level.
    Spaces(usize),
    /// Everything on one line.
    None,
}

impl Indent {
    /// The `(char, width)` pair used by the XML writer, or `None` for compact output.
    pub(crate) fn writer_settings(self) -> Option<(u8, usize)> {
        match self {
            Indent::Tabs => Some((b'\t', 1)),
            Indent::Spaces(0) | Indent::None => None,
            Indent::Spaces(n) => Some((b' ', n)),
        }
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indent::Tabs => f.write_str("tabs"),
            Indent::Spaces(n) => write!(f, "{n}"),
            Indent::None => f.write_str("none"),
        }
    }
}

/// Parses `tabs`, `none`, or a space count.
impl FromStr for Indent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tab" | "tabs" => Ok(Indent::Tabs),
            "none" | "compact" => Ok(Indent::None),
            other => other
                .parse::<usize>()
                .map(Indent::Spaces)
                .map_err(|_| format!("invalid indent {s:?}: expected tabs, none, or a number")),
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub indent: Indent,

    /// Write the Apple property list `<!DOCTYPE>` after the XML declaration.
    pub doctype: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent: Indent::Tabs,
            doctype: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let decode = DecodeOptions::default();
        assert_eq!(decode.max_depth, DEFAULT_MAX_DEPTH);
        assert!(decode.warn_on_key_reuse);

        let encode = EncodeOptions::default();
        assert_eq!(encode.indent, Indent::Tabs);
        assert!(encode.doctype);
    }

    #[test]
    fn test_indent_from_str() {
        assert_eq!("tabs".parse::<Indent>(), Ok(Indent::Tabs));
        assert_eq!("None".parse::<Indent>(), Ok(Indent::None));
        assert_eq!("4".parse::<Indent>(), Ok(Indent::Spaces(4)));
        assert!("wide".parse::<Indent>().is_err());
    }

    #[test]
    fn test_indent_writer_settings() {
        assert_eq!(Indent::Tabs.writer_settings(), Some((b'\t', 1)));
        assert_eq!(Indent::Spaces(2).writer_settings(), Some((b' ', 2)));
        assert_eq!(Indent::Spaces(0).writer_settings(), None);
        assert_eq!(Indent::None.writer_settings(), None);
    }
}
