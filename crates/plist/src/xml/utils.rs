//! Tag vocabulary and leaf text conversions shared by the reader and writer.

use base64::Engine as _;
use std::borrow::Cow;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose};

/// Root element name.
pub const PLIST_ELEMENT: &str = "plist";

/// The only `version` attribute value this codec knows.
pub const PLIST_VERSION: &str = "1.0";

/// Body of the Apple property list `<!DOCTYPE ...>` declaration.
pub const PLIST_DOCTYPE: &str = r#"plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd""#;

/// Element names of the property list grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Dict,
    Key,
    Array,
    String,
    Data,
    Integer,
    Real,
    True,
    False,
    Date,
}

impl Tag {
    pub fn from_name(name: &str) -> Option<Tag> {
        Some(match name {
            "dict" => Tag::Dict,
            "key" => Tag::Key,
            "array" => Tag::Array,
            "string" => Tag::String,
            "data" => Tag::Data,
            "integer" => Tag::Integer,
            "real" => Tag::Real,
            "true" => Tag::True,
            "false" => Tag::False,
            "date" => Tag::Date,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Dict => "dict",
            Tag::Key => "key",
            Tag::Array => "array",
            Tag::String => "string",
            Tag::Data => "data",
            Tag::Integer => "integer",
            Tag::Real => "real",
            Tag::True => "true",
            Tag::False => "false",
            Tag::Date => "date",
        }
    }
}

/// Reads `<integer>` text: decimal, or hexadecimal with a `0x` prefix.
pub fn parse_integer(text: &str) -> Result<i64, String> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        // from_str_radix would accept a second sign after the prefix.
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid hexadecimal digits {hex:?}"));
        }
        let magnitude = i128::from(u64::from_str_radix(hex, 16).map_err(|e| e.to_string())?);
        let signed = if negative { -magnitude } else { magnitude };
        return i64::try_from(signed).map_err(|_| "number too large to fit in target type".into());
    }

    text.parse::<i64>().map_err(|e| e.to_string())
}

/// Reads `<real>` text. Accepts `nan`, `inf` and `infinity` with an optional sign.
pub fn parse_real(text: &str) -> Result<f64, String> {
    text.trim().parse::<f64>().map_err(|e| e.to_string())
}

/// Writes a float without locale influence, switching to exponent notation
/// for very large or very small magnitudes.
pub fn format_real(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "+infinity" } else { "-infinity" }.to_string();
    }

    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        format!("{n:e}")
    } else {
        format!("{n}")
    }
}

/// Characters allowed in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escapes element text so it reads back unchanged.
///
/// Markup characters become entities and `\r` becomes `&#xD;`, which XML
/// end-of-line handling leaves alone. Characters XML 1.0 cannot carry at all
/// are replaced with U+FFFD.
pub fn escape_text(text: &str) -> String {
    let cleaned: Cow<'_, str> = if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
                .collect(),
        )
    };
    quick_xml::escape::escape(cleaned.as_ref()).replace('\r', "&#xD;")
}

/// Tolerates missing padding and stray bits in the final symbol.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn is_base64_symbol(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/'
}

/// Decodes `<data>` text best-effort.
///
/// Whitespace and padding are ignored, any other character outside the
/// standard alphabet is discarded, and a dangling final symbol is dropped.
/// The second element describes what had to be discarded, if anything.
pub fn decode_base64(text: &str) -> (Vec<u8>, Option<String>) {
    let mut symbols: String = text.chars().filter(|c| is_base64_symbol(*c)).collect();
    let discarded = text
        .chars()
        .filter(|c| !is_base64_symbol(*c) && !c.is_whitespace() && *c != '=')
        .count();

    let mut problems = Vec::new();
    if discarded > 0 {
        problems.push(format!("discarded {discarded} invalid base64 characters"));
    }
    if symbols.len() % 4 == 1 {
        symbols.pop();
        problems.push("dropped a dangling base64 symbol".to_string());
    }

    let problem = (!problems.is_empty()).then(|| problems.join("; "));
    match LENIENT_BASE64.decode(&symbols) {
        Ok(bytes) => (bytes, problem),
        Err(e) => (Vec::new(), Some(e.to_string())),
    }
}

/// Standard padded base64, as written inside `<data>` and in JSON output.
pub(crate) fn encode_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_round_trip() {
        for tag in [
            Tag::Dict,
            Tag::Key,
            Tag::Array,
            Tag::String,
            Tag::Data,
            Tag::Integer,
            Tag::Real,
            Tag::True,
            Tag::False,
            Tag::Date,
        ] {
            assert_eq!(Tag::from_name(tag.as_str()), Some(tag));
        }
        assert_eq!(Tag::from_name("frobnicate"), None);
        assert_eq!(Tag::from_name(""), None);
        assert_eq!(Tag::from_name("Dict"), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Ok(42));
        assert_eq!(parse_integer("  -17\n"), Ok(-17));
        assert_eq!(parse_integer("+8"), Ok(8));
        assert_eq!(parse_integer("0x1F"), Ok(31));
        assert_eq!(parse_integer("-0x10"), Ok(-16));
        assert_eq!(parse_integer("-0x8000000000000000"), Ok(i64::MIN));
        assert!(parse_integer("0x8000000000000000").is_err());
        assert!(parse_integer("0x").is_err());
        assert_eq!(parse_integer("9223372036854775807"), Ok(i64::MAX));
        assert!(parse_integer("9223372036854775808").is_err());
        assert!(parse_integer("twelve").is_err());
        assert!(parse_integer("").is_err());
    }

    #[test]
    fn test_parse_integer_rejects_sign_after_hex_prefix() {
        assert!(parse_integer("0x-10").is_err());
        assert!(parse_integer("0x+5").is_err());
        assert!(parse_integer("-0x-80000000000000000000000000000000").is_err());
        assert!(parse_integer("-0x80000000000000000000000000000000").is_err());
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text("a<b & c>d"), "a&lt;b &amp; c&gt;d");
        assert_eq!(escape_text("one\r\ntwo\rthree"), "one&#xD;\ntwo&#xD;three");
        assert_eq!(escape_text("tab\there"), "tab\there");
        assert_eq!(escape_text("a\u{1}b\u{FFFF}"), "a\u{FFFD}b\u{FFFD}");
        assert_eq!(escape_text("\u{1F3A8}"), "\u{1F3A8}");
    }

    #[test]
    fn test_parse_real() {
        assert_eq!(parse_real("1.5"), Ok(1.5));
        assert_eq!(parse_real(" -0.25 "), Ok(-0.25));
        assert_eq!(parse_real("1e3"), Ok(1000.0));
        assert_eq!(parse_real("+infinity"), Ok(f64::INFINITY));
        assert_eq!(parse_real("-infinity"), Ok(f64::NEG_INFINITY));
        assert!(parse_real("nan").unwrap().is_nan());
        assert!(parse_real("1,5").is_err());
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(1.5), "1.5");
        assert_eq!(format_real(-2.0), "-2");
        assert_eq!(format_real(0.0), "0");
        assert_eq!(format_real(0.1), "0.1");
        assert_eq!(format_real(1e300), "1e300");
        assert_eq!(format_real(2.5e-7), "2.5e-7");
        assert_eq!(format_real(f64::NAN), "nan");
        assert_eq!(format_real(f64::INFINITY), "+infinity");
        assert_eq!(format_real(f64::NEG_INFINITY), "-infinity");
    }

    #[test]
    fn test_format_real_is_parseable() {
        for n in [0.1, 123.456, -9.75e20, 3.0e-9, f64::MAX, f64::MIN_POSITIVE] {
            assert_eq!(parse_real(&format_real(n)), Ok(n));
        }
    }

    #[test]
    fn test_base64() {
        assert_eq!(encode_base64(&[0x00, 0xFF, 0x10]), "AP8Q");
        assert_eq!(decode_base64("AP8Q"), (vec![0x00, 0xFF, 0x10], None));
        assert_eq!(decode_base64("\n\tAP8Q\n"), (vec![0x00, 0xFF, 0x10], None));
        assert_eq!(decode_base64("aGk="), (b"hi".to_vec(), None));
        assert_eq!(decode_base64("aGk"), (b"hi".to_vec(), None));
        assert_eq!(decode_base64(""), (Vec::new(), None));
    }

    #[test]
    fn test_base64_lenient() {
        let (bytes, problem) = decode_base64("aG*k=");
        assert_eq!(bytes, b"hi");
        assert!(problem.unwrap().contains("discarded 1"));

        let (bytes, problem) = decode_base64("aGkhX");
        assert_eq!(bytes, b"hi!");
        assert!(problem.unwrap().contains("dangling"));
    }
}
