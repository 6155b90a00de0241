//! Chart records and their time values.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default field holding the time-like value of a record.
pub const DEFAULT_TIME_KEY: &str = "time";

/// Naive date-time layouts accepted when a string carries no offset.
/// These are read as UTC.
const NAIVE_DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A single field of a [`Datum`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null.
    Null,

    /// Boolean value (never plotted, never a valid time).
    Bool(bool),

    /// Numeric value.
    Number(f64),

    /// Text value; may hold a date string.
    Text(String),

    /// Already-parsed instant.
    #[serde(skip_deserializing)]
    Date(DateTime<Utc>),

    /// Arrays and objects; kept but never plotted.
    Other(serde_json::Value),
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Date(v)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(FieldValue::Null, FieldValue::Number)
    }
}

/// The raw value of a record's time field, as handed to time formatters.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeValue {
    /// A date/time instant.
    Date(DateTime<Utc>),
    /// A number (epoch milliseconds or an arbitrary ordinal).
    Number(f64),
    /// A string, possibly a date.
    Text(String),
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Date(dt) => write!(f, "{}", dt.to_rfc3339()),
            TimeValue::Number(n) => write!(f, "{}", n),
            TimeValue::Text(s) => f.write_str(s),
        }
    }
}

/// Anything that can be charted: a time field plus numeric fields.
pub trait Record {
    /// The raw time value stored under `key`, if present and usable.
    fn time_value(&self, key: &str) -> Option<TimeValue>;

    /// The numeric value stored under `key`, if any.
    fn numeric(&self, key: &str) -> Option<f64>;
}

/// An open record: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Datum {
    fields: BTreeMap<String, FieldValue>,
}

impl Datum {
    /// Create an empty datum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to this datum.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Get a field.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Iterate over field names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl Record for Datum {
    fn time_value(&self, key: &str) -> Option<TimeValue> {
        match self.fields.get(key)? {
            FieldValue::Date(dt) => Some(TimeValue::Date(*dt)),
            FieldValue::Number(n) => Some(TimeValue::Number(*n)),
            FieldValue::Text(s) => Some(TimeValue::Text(s.clone())),
            FieldValue::Null | FieldValue::Bool(_) | FieldValue::Other(_) => None,
        }
    }

    fn numeric(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Parse a date string the way browsers accept common timestamp layouts.
///
/// Accepts RFC 3339, RFC 2822, bare `YYYY-MM-DD` dates and `YYYY` years
/// (midnight UTC) and naive `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]` date-times
/// (read as UTC).
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for pattern in NAIVE_DATETIME_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(naive.and_utc());
        }
    }

    let date = if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
    } else {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    };

    date.and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Load records from a JSON or JSON5 file holding an array of objects.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Datum>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read data file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let records: Vec<Datum> = json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse data file '{}': {}",
            path.display(),
            e
        ))
    })?;

    tracing::info!(path = %path.display(), count = records.len(), "Loaded chart data");
    Ok(records)
}
