//! XML property list reading and writing.
//!
//! ## Wire format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
//! <plist version="1.0">
//!   <dict>
//!     <key>frames</key>
//!     <array>
//!       <string>hero.png</string>
//!     </array>
//!     <key>scale</key>
//!     <real>0.5</real>
//!   </dict>
//! </plist>
//! ```
//!
//! ## Element mapping
//!
//! | Element | Value |
//! |---------|-------|
//! | `<dict>` | [`Value::Dict`](crate::Value::Dict), `<key>` followed by one value element |
//! | `<array>` | [`Value::Array`](crate::Value::Array) |
//! | `<string>` | [`Value::String`](crate::Value::String) |
//! | `<data>` | [`Value::Data`](crate::Value::Data), base64 text |
//! | `<integer>` | [`Value::Integer`](crate::Value::Integer), decimal text |
//! | `<real>` | [`Value::Real`](crate::Value::Real), decimal text |
//! | `<true/>`, `<false/>` | [`Value::Bool`](crate::Value::Bool) |
//! | `<date>` | [`Value::Date`](crate::Value::Date), ISO-8601 text |
//!
//! ## Decoding
//!
//! - **Parsing**: the whole document is parsed into a `roxmltree` DOM first; a
//!   document that is not well-formed decodes to `Null` with one fatal
//!   diagnostic.
//! - **Leaves**: unreadable numbers, dates and base64 fall back to a default
//!   value and a coercion diagnostic.
//! - **Dictionaries**: a value is stored under the most recent `<key>`. Values
//!   before the first key are dropped.
//!
//! ## Encoding
//!
//! Encoding writes quick-xml events directly. `Null` has no element of its
//! own: it is omitted from dictionaries and arrays, and a `Null` root becomes
//! an empty `<plist version="1.0"/>`.
//!
//! String and key text is escaped so it decodes unchanged: `\r` is written as
//! `&#xD;`. Characters XML 1.0 cannot represent (most C0 controls, U+FFFE and
//! U+FFFF) are replaced with U+FFFD, so the output is always well-formed.

pub mod de;
pub mod ser;
pub(crate) mod utils;

// Re-export serialization functions
pub use ser::{Encoder, to_xml_path, to_xml_string, to_xml_vec, to_xml_writer};

// Re-export deserialization functions
pub use de::{Decoded, Decoder, from_xml_path, from_xml_reader, from_xml_slice, from_xml_str};

pub use utils::{PLIST_DOCTYPE, PLIST_VERSION};
