//! Conversions between property list values and JSON.
//!
//! JSON has no binary or date type, so the mapping is lossy in that direction:
//!
//! | Property list | JSON |
//! |---------------|------|
//! | `Data` | base64 string |
//! | `Date` | ISO-8601 string, `null` when invalid |
//! | non-finite `Real` | `null` |
//! | `Null` | `null` |
//!
//! Going from JSON, integral numbers that fit an `i64` become `Integer`,
//! every other number becomes `Real`, and object key order is preserved.

use crate::error::Result;
use crate::value::{Dictionary, Value};
use crate::xml::utils::encode_base64;
use serde_json::{Map, Number, Value as JsonValue};

/// Convert a property list value to a `serde_json::Value`.
///
/// # Examples
///
/// ```rust
/// use helios_plist::Value;
/// use helios_plist::json::to_json_value;
///
/// let value = Value::from_iter([("data", Value::from(vec![0x00u8, 0xFF, 0x10]))]);
/// assert_eq!(to_json_value(&value), serde_json::json!({"data": "AP8Q"}));
/// ```
pub fn to_json_value(value: &Value) -> JsonValue {
    match value {
        Value::Dict(dict) => JsonValue::Object(
            dict.iter()
                .map(|(key, child)| (key.clone(), to_json_value(child)))
                .collect::<Map<String, JsonValue>>(),
        ),
        Value::Array(items) => JsonValue::Array(items.iter().map(to_json_value).collect()),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Data(bytes) => JsonValue::String(encode_base64(bytes)),
        Value::Integer(n) => JsonValue::Number(Number::from(*n)),
        Value::Real(n) => Number::from_f64(*n).map_or(JsonValue::Null, JsonValue::Number),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Date(date) if date.is_valid() => JsonValue::String(date.to_iso8601()),
        Value::Date(_) | Value::Null => JsonValue::Null,
    }
}

/// Convert a `serde_json::Value` to a property list value.
pub fn from_json_value(json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Null, Value::Real),
        },
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => Value::Array(items.into_iter().map(from_json_value).collect()),
        JsonValue::Object(map) => Value::Dict(
            map.into_iter()
                .map(|(key, child)| (key, from_json_value(child)))
                .collect::<Dictionary>(),
        ),
    }
}

/// Serialize a property list value to a JSON string.
pub fn to_json_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serialize a property list value to a pretty-printed JSON string.
pub fn to_json_string_pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Parse a JSON string into a property list value.
///
/// # Examples
///
/// ```rust
/// use helios_plist::Value;
/// use helios_plist::json::from_json_str;
///
/// let value = from_json_str(r#"{"width": 512, "scale": 0.5}"#)?;
/// assert_eq!(value["width"], Value::Integer(512));
/// assert_eq!(value["scale"], Value::Real(0.5));
/// # Ok::<(), helios_plist::PlistError>(())
/// ```
pub fn from_json_str(s: &str) -> Result<Value> {
    Ok(from_json_value(serde_json::from_str(s)?))
}

/// Parse JSON bytes into a property list value.
pub fn from_json_slice(v: &[u8]) -> Result<Value> {
    Ok(from_json_value(serde_json::from_slice(v)?))
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        from_json_value(json)
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        to_json_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::Date;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_to_json_value() {
        let value = Value::from_iter([
            ("name", Value::from("hero")),
            ("size", Value::from_iter([Value::from(64), Value::from(32)])),
            ("scale", Value::from(0.5)),
            ("rotated", Value::from(false)),
            (
                "created",
                Value::from(NaiveDate::from_ymd_opt(2015, 6, 1).unwrap()),
            ),
            ("broken", Value::Date(Date::Invalid)),
            ("nothing", Value::Null),
        ]);
        assert_eq!(
            to_json_value(&value),
            json!({
                "name": "hero",
                "size": [64, 32],
                "scale": 0.5,
                "rotated": false,
                "created": "2015-06-01",
                "broken": null,
                "nothing": null
            })
        );
    }

    #[test]
    fn test_non_finite_real_is_null() {
        assert_eq!(to_json_value(&Value::from(f64::NAN)), JsonValue::Null);
        assert_eq!(to_json_value(&Value::from(f64::INFINITY)), JsonValue::Null);
    }

    #[test]
    fn test_from_json_keeps_key_order() {
        let value = from_json_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<&str> = value
            .as_dict()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(from_json_value(json!(7)), Value::Integer(7));
        assert_eq!(from_json_value(json!(-7)), Value::Integer(-7));
        assert_eq!(from_json_value(json!(7.25)), Value::Real(7.25));
        assert_eq!(
            from_json_value(json!(u64::MAX)),
            Value::Real(u64::MAX as f64)
        );
    }

    #[test]
    fn test_serialize_matches_to_json_value() -> Result<()> {
        let value = Value::from_iter([
            ("blob", Value::from(vec![1u8, 2, 3])),
            ("list", Value::from_iter([Value::from(true), Value::Null])),
        ]);
        let via_serde: JsonValue = serde_json::from_str(&to_json_string(&value)?)?;
        assert_eq!(via_serde, to_json_value(&value));
        Ok(())
    }

    #[test]
    fn test_invalid_json() {
        assert!(from_json_str("{").is_err());
    }
}
