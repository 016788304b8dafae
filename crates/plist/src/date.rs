//! Calendar values carried by `<date>` elements.
//!
//! Property lists in the wild carry dates in three ISO-8601 shapes: a bare
//! calendar date, a date-time without a zone, and a date-time with a UTC
//! designator or numeric offset. [`Date`] keeps the shape it was read with so
//! that writing it back reproduces the same form.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use serde::{Serialize, Serializer};
use std::fmt;

/// Naive date-time layouts accepted after RFC 3339 parsing has been tried.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A `<date>` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Date {
    /// Calendar date only (`2024-03-01`).
    Day(NaiveDate),
    /// Date and time with no zone information (`2024-03-01T10:15:00`).
    Local(NaiveDateTime),
    /// Date and time with `Z` or a numeric offset (`2024-03-01T10:15:00Z`).
    Offset(DateTime<FixedOffset>),
    /// Text that could not be read as ISO-8601.
    Invalid,
}

impl Date {
    /// Parses ISO-8601 text, returning `None` when no accepted layout matches.
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Option<Date> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(Date::Day(day));
        }

        if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
            return Some(Date::Offset(zoned));
        }

        // RFC 3339 insists on seconds; accept the minute-precision zoned form too.
        if let Ok(zoned) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M%#z") {
            return Some(Date::Offset(zoned));
        }

        NAIVE_DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(Date::Local)
    }

    /// Returns `false` only for [`Date::Invalid`].
    pub fn is_valid(&self) -> bool {
        !matches!(self, Date::Invalid)
    }

    /// Formats the date in the ISO-8601 shape it was built with.
    ///
    /// [`Date::Invalid`] formats as the empty string.
    pub fn to_iso8601(&self) -> String {
        match self {
            Date::Day(day) => day.format("%Y-%m-%d").to_string(),
            Date::Local(local) => local.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Date::Offset(zoned) => zoned.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Date::Invalid => String::new(),
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<NaiveDate> for Date {
    fn from(day: NaiveDate) -> Self {
        Date::Day(day)
    }
}

impl From<NaiveDateTime> for Date {
    fn from(local: NaiveDateTime) -> Self {
        Date::Local(local)
    }
}

impl From<DateTime<FixedOffset>> for Date {
    fn from(zoned: DateTime<FixedOffset>) -> Self {
        Date::Offset(zoned)
    }
}

impl From<DateTime<chrono::Utc>> for Date {
    fn from(utc: DateTime<chrono::Utc>) -> Self {
        Date::Offset(utc.fixed_offset())
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Date::Invalid => serializer.serialize_none(),
            valid => serializer.serialize_str(&valid.to_iso8601()),
        }
    }
}
