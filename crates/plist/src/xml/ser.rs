//! Property list encoding.
//!
//! Values are written straight to quick-xml events: the XML declaration, the
//! Apple `<!DOCTYPE>`, then `<plist version="1.0">` wrapping the root value.
//! Encoding is total; every [`Value`] has a well-formed rendering.

use crate::error::Result;
use crate::options::EncodeOptions;
use crate::value::Value;
use crate::xml::utils::{self, PLIST_DOCTYPE, PLIST_ELEMENT, PLIST_VERSION, Tag};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Encodes values with a fixed set of [`EncodeOptions`].
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    options: EncodeOptions,
}

impl Encoder {
    /// Creates an encoder with the given options.
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    /// The options this encoder was built with.
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes `value` as a complete document.
    pub fn encode(&self, value: &Value) -> String {
        String::from_utf8_lossy(&self.encode_to_vec(value)).into_owned()
    }

    /// Encodes `value` as UTF-8 document bytes.
    pub fn encode_to_vec(&self, value: &Value) -> Vec<u8> {
        let mut buffer = Vec::new();
        match self.write_document(value, &mut buffer) {
            Ok(()) => buffer,
            Err(e) => unreachable!("writing to a Vec<u8> cannot fail: {e}"),
        }
    }

    /// Encodes `value` into `writer`. Only I/O errors from `writer` can fail.
    pub fn encode_to_writer<W: Write>(&self, value: &Value, writer: W) -> Result<()> {
        self.write_document(value, writer)?;
        Ok(())
    }

    /// Encodes `value` into the file at `path`, replacing its contents.
    pub fn encode_to_path<P: AsRef<Path>>(&self, value: &Value, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Writing property list");
        let mut file = io::BufWriter::new(std::fs::File::create(path)?);
        self.write_document(value, &mut file)?;
        file.flush()?;
        Ok(())
    }

    fn write_document<W: Write>(&self, value: &Value, writer: W) -> io::Result<()> {
        let mut writer = PlistWriter::new(writer, &self.options);
        writer.write_document(value)
    }
}

/// Encode a value to a property list string with default options.
///
/// # Examples
///
/// ```rust
/// use helios_plist::{Value, to_xml_string};
///
/// let value = Value::from_iter([("name", Value::from("atlas"))]);
/// let xml = to_xml_string(&value);
/// assert!(xml.contains("<key>name</key>"));
/// assert!(xml.contains("<string>atlas</string>"));
/// ```
pub fn to_xml_string(value: &Value) -> String {
    Encoder::default().encode(value)
}

/// Encode a value to property list bytes with default options.
pub fn to_xml_vec(value: &Value) -> Vec<u8> {
    Encoder::default().encode_to_vec(value)
}

/// Encode a value into a writer with default options.
pub fn to_xml_writer<W: Write>(value: &Value, writer: W) -> Result<()> {
    Encoder::default().encode_to_writer(value, writer)
}

/// Encode a value into the file at `path` with default options.
pub fn to_xml_path<P: AsRef<Path>>(value: &Value, path: P) -> Result<()> {
    Encoder::default().encode_to_path(value, path)
}

/// Emits quick-xml events for a value tree.
struct PlistWriter<W: Write> {
    writer: Writer<W>,
    doctype: bool,
}

impl<W: Write> PlistWriter<W> {
    fn new(inner: W, options: &EncodeOptions) -> Self {
        let writer = match options.indent.writer_settings() {
            Some((indent_char, indent_size)) => {
                Writer::new_with_indent(inner, indent_char, indent_size)
            }
            None => Writer::new(inner),
        };
        Self {
            writer,
            doctype: options.doctype,
        }
    }

    fn write_document(&mut self, value: &Value) -> io::Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if self.doctype {
            self.writer
                .write_event(Event::DocType(BytesText::from_escaped(PLIST_DOCTYPE)))?;
        }

        let mut root = BytesStart::new(PLIST_ELEMENT);
        root.push_attribute(("version", PLIST_VERSION));

        if value.is_null() {
            self.writer.write_event(Event::Empty(root))?;
        } else {
            self.writer.write_event(Event::Start(root))?;
            self.write_value(value)?;
            self.writer
                .write_event(Event::End(BytesEnd::new(PLIST_ELEMENT)))?;
        }

        self.writer.get_mut().write_all(b"\n")
    }

    fn write_value(&mut self, value: &Value) -> io::Result<()> {
        match value {
            Value::Dict(dict) => {
                let mut entries = dict.iter().filter(|(_, v)| !v.is_null()).peekable();
                if entries.peek().is_none() {
                    return self.write_empty(Tag::Dict);
                }
                self.write_start(Tag::Dict)?;
                for (key, child) in entries {
                    self.write_text_element(Tag::Key, key)?;
                    self.write_value(child)?;
                }
                self.write_end(Tag::Dict)
            }
            Value::Array(items) => {
                let mut items = items.iter().filter(|v| !v.is_null()).peekable();
                if items.peek().is_none() {
                    return self.write_empty(Tag::Array);
                }
                self.write_start(Tag::Array)?;
                for item in items {
                    self.write_value(item)?;
                }
                self.write_end(Tag::Array)
            }
            Value::Bool(true) => self.write_empty(Tag::True),
            Value::Bool(false) => self.write_empty(Tag::False),
            Value::Date(date) if date.is_valid() => {
                self.write_text_element(Tag::Date, &date.to_iso8601())
            }
            Value::Date(_) => self.write_empty(Tag::Date),
            Value::Data(bytes) => self.write_text_element(Tag::Data, &utils::encode_base64(bytes)),
            Value::String(s) => self.write_text_element(Tag::String, s),
            Value::Integer(n) => self.write_text_element(Tag::Integer, &n.to_string()),
            Value::Real(n) => self.write_text_element(Tag::Real, &utils::format_real(*n)),
            // Null entries are skipped by their containers; a Null root is an empty <plist/>.
            Value::Null => Ok(()),
        }
    }

    fn write_start(&mut self, tag: Tag) -> io::Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(tag.as_str())))
    }

    fn write_end(&mut self, tag: Tag) -> io::Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(tag.as_str())))
    }

    fn write_empty(&mut self, tag: Tag) -> io::Result<()> {
        self.writer
            .write_event(Event::Empty(BytesStart::new(tag.as_str())))
    }

    /// Writes `<tag>text</tag>` on a single line, escaping `text`.
    fn write_text_element(&mut self, tag: Tag, text: &str) -> io::Result<()> {
        self.write_start(tag)?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(utils::escape_text(text))))?;
        self.write_end(tag)
    }
}
