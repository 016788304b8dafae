//! Property list decoding.
//!
//! The document is first materialized as a `roxmltree` DOM, then walked
//! recursively from the first element below `<plist>`. Decoding never fails:
//! problems are collected as [`Diagnostic`]s and the affected subtree is
//! replaced by a default (`0`, `0.0`, an invalid date, empty data) or by
//! [`Value::Null`].

use crate::date::Date;
use crate::diagnostic::{Diagnostic, Position};
use crate::error::Result;
use crate::options::DecodeOptions;
use crate::value::{Dictionary, Value};
use crate::xml::utils::{self, PLIST_ELEMENT, PLIST_VERSION, Tag};
use roxmltree::{Document, Node, ParsingOptions};
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, trace, warn};

/// The outcome of decoding a document: always a value, plus what went wrong.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decoded {
    /// The decoded tree; `Null` when the document was malformed or empty.
    pub value: Value,
    /// Diagnostics in the order they were encountered.
    pub diagnostics: Vec<Diagnostic>,
}

impl Decoded {
    /// Returns `true` if any diagnostic invalidated the whole document.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }

    /// Returns `true` if decoding produced no diagnostics at all.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Splits the result into the value and its diagnostics.
    pub fn into_parts(self) -> (Value, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

/// Decodes property list documents with a fixed set of [`DecodeOptions`].
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    /// Creates a decoder with the given options.
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// The options this decoder was built with.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes raw document bytes.
    ///
    /// UTF-8 (with or without a byte order mark) and UTF-16 with a byte order
    /// mark are accepted. Undecodable bytes make the document malformed.
    pub fn decode(&self, bytes: &[u8]) -> Decoded {
        match bytes_to_text(bytes) {
            Ok(text) => self.decode_str(&text),
            Err(diagnostic) => malformed(diagnostic),
        }
    }

    /// Decodes a document that is already text.
    pub fn decode_str(&self, text: &str) -> Decoded {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut parsing = ParsingOptions::default();
        parsing.allow_dtd = true;

        let doc = match Document::parse_with_options(text, parsing) {
            Ok(doc) => doc,
            Err(e) => {
                let pos = e.pos();
                return malformed(Diagnostic::DocumentMalformed {
                    message: e.to_string(),
                    position: Position::new(pos.row, pos.col),
                });
            }
        };

        let mut walker = TreeWalker {
            doc: &doc,
            options: &self.options,
            diagnostics: Vec::new(),
        };
        let value = walker.parse_document();
        debug!(
            kind = value.kind().name(),
            diagnostics = walker.diagnostics.len(),
            "Decoded property list"
        );

        Decoded {
            value,
            diagnostics: walker.diagnostics,
        }
    }

    /// Reads the whole stream, then decodes it.
    pub fn decode_reader<R: Read>(&self, mut reader: R) -> Result<Decoded> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(self.decode(&bytes))
    }

    /// Reads and decodes the file at `path`.
    pub fn decode_path<P: AsRef<Path>>(&self, path: P) -> Result<Decoded> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading property list");
        let bytes = std::fs::read(path)?;
        Ok(self.decode(&bytes))
    }
}

/// Decodes document bytes with default options.
///
/// # Examples
///
/// ```rust
/// use helios_plist::{Value, from_xml_slice};
///
/// let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
/// <plist version="1.0"><dict><key>scale</key><real>0.5</real></dict></plist>"#;
/// let decoded = from_xml_slice(xml);
/// assert!(decoded.is_clean());
/// assert_eq!(decoded.value["scale"], Value::Real(0.5));
/// ```
pub fn from_xml_slice(bytes: &[u8]) -> Decoded {
    Decoder::default().decode(bytes)
}

/// Decodes document text with default options.
pub fn from_xml_str(text: &str) -> Decoded {
    Decoder::default().decode_str(text)
}

/// Decodes a document read from `reader` with default options.
pub fn from_xml_reader<R: Read>(reader: R) -> Result<Decoded> {
    Decoder::default().decode_reader(reader)
}

/// Decodes the file at `path` with default options.
pub fn from_xml_path<P: AsRef<Path>>(path: P) -> Result<Decoded> {
    Decoder::default().decode_path(path)
}

fn malformed(diagnostic: Diagnostic) -> Decoded {
    error!(%diagnostic, "Could not parse property list");
    Decoded {
        value: Value::Null,
        diagnostics: vec![diagnostic],
    }
}

/// Turns raw bytes into text, honouring a UTF-8 or UTF-16 byte order mark.
fn bytes_to_text(bytes: &[u8]) -> std::result::Result<Cow<'_, str>, Diagnostic> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => utf16_to_text(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => utf16_to_text(rest, u16::from_be_bytes),
        _ => std::str::from_utf8(bytes).map(Cow::Borrowed).map_err(|e| {
            let valid = &bytes[..e.valid_up_to()];
            let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
            let line_start = valid
                .iter()
                .rposition(|b| *b == b'\n')
                .map_or(0, |i| i + 1);
            let column = String::from_utf8_lossy(&valid[line_start..]).chars().count() + 1;
            Diagnostic::DocumentMalformed {
                message: format!("invalid UTF-8: {e}"),
                position: Position::new(saturate(line), saturate(column)),
            }
        }),
    }
}

fn utf16_to_text(
    bytes: &[u8],
    to_unit: fn([u8; 2]) -> u16,
) -> std::result::Result<Cow<'static, str>, Diagnostic> {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();

    let dangling = bytes.len() % 2 != 0;
    match String::from_utf16(&units) {
        Ok(text) if !dangling => Ok(Cow::Owned(text)),
        Ok(_) => Err(Diagnostic::DocumentMalformed {
            message: "invalid UTF-16: odd number of bytes".to_string(),
            position: Position::new(1, 1),
        }),
        Err(e) => Err(Diagnostic::DocumentMalformed {
            message: format!("invalid UTF-16: {e}"),
            position: Position::new(1, 1),
        }),
    }
}

fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Concatenated text of every text and CDATA node below `node`.
fn element_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Recursive walk over a parsed document, accumulating diagnostics.
struct TreeWalker<'a, 'input> {
    doc: &'a Document<'input>,
    options: &'a DecodeOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, 'input> TreeWalker<'a, 'input> {
    fn parse_document(&mut self) -> Value {
        let root = self.doc.root_element();
        if root.tag_name().name() != PLIST_ELEMENT {
            debug!(root = root.tag_name().name(), "Root element is not <plist>");
        }

        if let Some(version) = root.attribute("version") {
            if version != PLIST_VERSION {
                self.report(Diagnostic::VersionMismatch {
                    version: version.to_string(),
                });
            }
        }

        match root.children().find(|n| n.is_element()) {
            Some(first) => self.parse_element(first, 1),
            None => {
                self.report(Diagnostic::UnknownTag {
                    tag: String::new(),
                    text: element_text(root),
                    position: self.position(root),
                });
                Value::Null
            }
        }
    }

    fn parse_element(&mut self, node: Node<'a, 'input>, depth: usize) -> Value {
        if depth > self.options.max_depth {
            self.report(Diagnostic::DepthExceeded {
                limit: self.options.max_depth,
                position: self.position(node),
            });
            return Value::Null;
        }

        let name = node.tag_name().name();
        match Tag::from_name(name) {
            Some(Tag::Dict) => Value::Dict(self.parse_dict(node, depth)),
            Some(Tag::Array) => Value::Array(self.parse_array(node, depth)),
            Some(Tag::String) => Value::String(element_text(node)),
            Some(Tag::Data) => {
                let text = element_text(node);
                let (bytes, problem) = utils::decode_base64(&text);
                if let Some(reason) = problem {
                    self.coercion_failure(node, Tag::Data, text, reason);
                }
                Value::Data(bytes)
            }
            Some(Tag::Integer) => {
                let text = element_text(node);
                match utils::parse_integer(&text) {
                    Ok(n) => Value::Integer(n),
                    Err(reason) => {
                        self.coercion_failure(node, Tag::Integer, text, reason);
                        Value::Integer(0)
                    }
                }
            }
            Some(Tag::Real) => {
                let text = element_text(node);
                match utils::parse_real(&text) {
                    Ok(n) => Value::Real(n),
                    Err(reason) => {
                        self.coercion_failure(node, Tag::Real, text, reason);
                        Value::Real(0.0)
                    }
                }
            }
            Some(Tag::True) => Value::Bool(true),
            Some(Tag::False) => Value::Bool(false),
            Some(Tag::Date) => {
                let text = element_text(node);
                match Date::parse(&text) {
                    Some(date) => Value::Date(date),
                    None => {
                        self.coercion_failure(
                            node,
                            Tag::Date,
                            text,
                            "not an ISO-8601 date".to_string(),
                        );
                        Value::Date(Date::Invalid)
                    }
                }
            }
            // A <key> is only meaningful directly inside a <dict>.
            Some(Tag::Key) | None => {
                self.report(Diagnostic::UnknownTag {
                    tag: name.to_string(),
                    text: element_text(node),
                    position: self.position(node),
                });
                Value::Null
            }
        }
    }

    fn parse_dict(&mut self, node: Node<'a, 'input>, depth: usize) -> Dictionary {
        let mut dict = Dictionary::new();
        // The key slot is not cleared after a value is stored.
        let mut current_key = String::new();
        let mut key_consumed = false;

        for child in node.children().filter(|n| n.is_element()) {
            if child.tag_name().name() == Tag::Key.as_str() {
                current_key = element_text(child);
                key_consumed = false;
                continue;
            }

            if current_key.is_empty() {
                trace!(
                    tag = child.tag_name().name(),
                    position = %self.position(child),
                    "Dropping dict value without a key"
                );
                continue;
            }

            if key_consumed && self.options.warn_on_key_reuse {
                self.report(Diagnostic::KeyReused {
                    key: current_key.clone(),
                    position: self.position(child),
                });
            }

            let value = self.parse_element(child, depth + 1);
            dict.insert(current_key.clone(), value);
            key_consumed = true;
        }

        dict
    }

    fn parse_array(&mut self, node: Node<'a, 'input>, depth: usize) -> Vec<Value> {
        node.children()
            .filter(|n| n.is_element())
            .map(|child| self.parse_element(child, depth + 1))
            .collect()
    }

    fn coercion_failure(&mut self, node: Node<'a, 'input>, tag: Tag, text: String, reason: String) {
        self.report(Diagnostic::ValueCoercionFailure {
            tag: tag.as_str().to_string(),
            text,
            reason,
            position: self.position(node),
        });
    }

    fn position(&self, node: Node<'a, 'input>) -> Position {
        let pos = self.doc.text_pos_at(node.range().start);
        Position::new(pos.row, pos.col)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "Property list warning");
        self.diagnostics.push(diagnostic);
    }
}
