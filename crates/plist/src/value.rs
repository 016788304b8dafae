//! The dynamically typed tree exchanged with callers.
//!
//! A [`Value`] owns its children outright: dictionaries and arrays hold their
//! entries by value, so a tree is strictly hierarchical and cannot contain
//! cycles or shared nodes.

use crate::date::Date;
use crate::xml::utils::encode_base64;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::ops::Index;

/// Dictionary contents, iterated in insertion order.
pub type Dictionary = IndexMap<String, Value>;

/// A property list value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// `<dict>`: string keys in insertion order.
    Dict(Dictionary),
    /// `<array>`: ordered, possibly heterogeneous.
    Array(Vec<Value>),
    /// `<string>`
    String(String),
    /// `<data>`: raw bytes, base64 on the wire.
    Data(Vec<u8>),
    /// `<integer>`
    Integer(i64),
    /// `<real>`
    Real(f64),
    /// `<true/>` / `<false/>`
    Bool(bool),
    /// `<date>`
    Date(Date),
    /// Absent value: an unrecognized tag, an empty document, or a subtree that
    /// could not be decoded.
    #[default]
    Null,
}

/// The variant of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Dict,
    Array,
    String,
    Data,
    Integer,
    Real,
    Bool,
    Date,
    Null,
}

impl Kind {
    /// Human-readable name, used in diagnostics and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Dict => "dict",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Data => "data",
            Kind::Integer => "integer",
            Kind::Real => "real",
            Kind::Bool => "bool",
            Kind::Date => "date",
            Kind::Null => "null",
        }
    }
}

static NULL: Value = Value::Null;

impl Value {
    /// Returns the variant of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Dict(_) => Kind::Dict,
            Value::Array(_) => Kind::Array,
            Value::String(_) => Kind::String,
            Value::Data(_) => Kind::Data,
            Value::Integer(_) => Kind::Integer,
            Value::Real(_) => Kind::Real,
            Value::Bool(_) => Kind::Bool,
            Value::Date(_) => Kind::Date,
            Value::Null => Kind::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Value::Data(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(n) => Some(*n),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&Date> {
        match self {
            Value::Date(date) => Some(date),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a dictionary.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict().and_then(|dict| dict.get(key))
    }

    /// Looks up `key` mutably when this value is a dictionary.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.as_dict_mut().and_then(|dict| dict.get_mut(key))
    }
}

/// Indexing a non-dictionary or a missing key yields [`Value::Null`].
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

/// Indexing a non-array or out of bounds yields [`Value::Null`].
impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.as_array()
            .and_then(|items| items.get(index))
            .unwrap_or(&NULL)
    }
}

impl From<Dictionary> for Value {
    fn from(dict: Dictionary) -> Self {
        Value::Dict(dict)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Data(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Data(bytes.to_vec())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Real(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Real(f64::from(n))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Integer(i64::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_date {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(date: $ty) -> Self {
                    Value::Date(Date::from(date))
                }
            }
        )*
    };
}

impl_from_date!(
    chrono::NaiveDate,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::FixedOffset>,
    chrono::DateTime<chrono::Utc>
);

impl From<Date> for Value {
    fn from(date: Date) -> Self {
        Value::Date(date)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Dict(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Dict(dict) => {
                let mut map = serializer.serialize_map(Some(dict.len()))?;
                for (key, value) in dict {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Data(bytes) => serializer.serialize_str(&encode_base64(bytes)),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Real(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Real(_) => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Date(date) => date.serialize(serializer),
            Value::Null => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Value {
        Value::from_iter([
            ("name", Value::from("atlas")),
            ("count", Value::from(3)),
            (
                "frames",
                Value::from_iter([Value::from("a.png"), Value::from("b.png")]),
            ),
        ])
    }

    #[test]
    fn test_kind() {
        assert_eq!(sample().kind(), Kind::Dict);
        assert_eq!(Value::from(1.5).kind(), Kind::Real);
        assert_eq!(Value::from(vec![1u8, 2]).kind(), Kind::Data);
        assert_eq!(Value::default().kind(), Kind::Null);
        assert_eq!(Kind::Bool.name(), "bool");
    }

    #[test]
    fn test_dict_keeps_insertion_order() {
        let value = sample();
        let keys: Vec<&str> = value
            .as_dict()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["name", "count", "frames"]);
    }

    #[test]
    fn test_index_missing_is_null() {
        let value = sample();
        assert_eq!(value["name"].as_str(), Some("atlas"));
        assert_eq!(value["frames"][1].as_str(), Some("b.png"));
        assert!(value["missing"].is_null());
        assert!(value["frames"][9].is_null());
        assert!(Value::from(true)["anything"].is_null());
    }

    #[test]
    fn test_as_real_widens_integer() {
        assert_eq!(Value::from(4).as_real(), Some(4.0));
        assert_eq!(Value::from("4").as_real(), None);
    }

    #[test]
    fn test_get_mut() {
        let mut value = sample();
        *value.get_mut("count").unwrap() = Value::from(4);
        assert_eq!(value["count"].as_integer(), Some(4));
    }

    #[test]
    fn test_from_date_types() {
        let day = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(Value::from(day), Value::Date(Date::Day(day)));
    }
}
