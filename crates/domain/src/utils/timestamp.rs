//! Lenient timestamp parsing
//!
//! Backend meeting payloads are not consistent about timestamp formats, and
//! a single bad field must never stop the meeting list from rendering. The
//! helpers here accept the common shapes and degrade to a caller-supplied
//! instant (usually "now") instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp string.
///
/// Accepts RFC 3339, RFC 2822, naive date-times (taken as UTC) and plain
/// dates (midnight UTC). Returns `None` for empty or unrecognised input.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a timestamp string, substituting `fallback` when it is unusable.
#[must_use]
pub fn parse_timestamp_or(raw: &str, fallback: DateTime<Utc>) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or(fallback)
}

/// Interpret an arbitrary JSON value as a timestamp.
///
/// Strings go through [`parse_timestamp`]; integers are epoch milliseconds.
#[must_use]
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp(raw),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Format a timestamp the way the backend expects (`2024-05-01T10:00:00.000Z`).
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for required timestamps: anything unusable becomes now.
pub mod lenient {
    use super::{
        format_timestamp, timestamp_from_value, DateTime, Deserialize, Deserializer, Serializer,
        Utc, Value,
    };

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(timestamp_from_value).unwrap_or_else(Utc::now))
    }
}

/// Serde adapter for optional timestamps: anything unusable becomes `None`.
pub mod lenient_option {
    use super::{
        format_timestamp, timestamp_from_value, DateTime, Deserialize, Deserializer, Serializer,
        Utc, Value,
    };

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(timestamp) => serializer.serialize_str(&format_timestamp(timestamp)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(timestamp_from_value))
    }
}
