//! Value and time formatting for axis ticks, tooltips and the brush.
//!
//! Formatters are plain values built once and handed to the chart model.
//! Callers may supply their own via the [`FormatValue`] and [`FormatTime`]
//! traits, which closures implement.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Locale as DateLocale, Utc};
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

use crate::datum::{TimeValue, parse_date};
use crate::error::{Error, Result};
use crate::normalize::AxisIndex;

/// Rendered in place of a missing value.
pub const PLACEHOLDER: &str = "—";

/// Numbers above this are treated as epoch milliseconds.
pub const EPOCH_THRESHOLD: f64 = 10_000.0;

/// Default date+time layout ("Jan 1, 2025, 09:30").
pub const DEFAULT_DATE_PATTERN: &str = "%b %-d, %Y, %H:%M";

/// Formats Y values for ticks and tooltips.
pub trait FormatValue {
    fn format_value(&self, value: Option<f64>) -> String;
}

impl<F> FormatValue for F
where
    F: Fn(Option<f64>) -> String,
{
    fn format_value(&self, value: Option<f64>) -> String {
        self(value)
    }
}

/// Formats raw time values for X ticks, tooltips and the brush.
///
/// `position` is the index of the first record holding the value, when known.
pub trait FormatTime {
    fn format_time(&self, value: &TimeValue, position: Option<usize>) -> String;
}

impl<F> FormatTime for F
where
    F: Fn(&TimeValue, Option<usize>) -> String,
{
    fn format_time(&self, value: &TimeValue, position: Option<usize>) -> String {
        self(value, position)
    }
}

/// Locale-aware fixed-point number formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    locale: Locale,
    min_fraction: usize,
    max_fraction: usize,
    prefix: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new(Locale::en)
    }
}

impl NumberFormat {
    /// Two fraction digits in the given locale.
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            min_fraction: 2,
            max_fraction: 2,
            prefix: String::new(),
        }
    }

    /// Build from a locale name such as `"en"`, `"de"` or `"fr_CA"`.
    pub fn from_locale_name(name: &str) -> Result<Self> {
        Ok(Self::new(lookup_locale(name)?))
    }

    /// Currency-style formatter with a leading symbol.
    pub fn currency(locale: Locale, symbol: impl Into<String>) -> Self {
        Self {
            prefix: symbol.into(),
            ..Self::new(locale)
        }
    }

    /// Set fraction digit bounds (`max` is raised to `min` if lower).
    pub fn with_fraction_digits(mut self, min: usize, max: usize) -> Self {
        self.min_fraction = min;
        self.max_fraction = max.max(min);
        self
    }

    /// The locale in use.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Format a number, or `None` when it cannot be represented.
    pub fn try_format(&self, value: f64) -> Option<String> {
        if !value.is_finite() {
            return None;
        }

        let digits = i32::try_from(self.max_fraction).ok().filter(|d| *d <= 9)?;
        let factor = 10u128.pow(digits as u32);
        let scaled = (value.abs() * factor as f64).round();
        if scaled >= u128::MAX as f64 {
            return None;
        }
        let scaled = scaled as u128;

        let mut out = String::new();
        if value.is_sign_negative() && scaled != 0 {
            out.push_str(self.locale.minus_sign());
        }
        out.push_str(&self.prefix);
        out.push_str(&(scaled / factor).to_formatted_string(&self.locale));

        let mut fraction = format!("{:0width$}", scaled % factor, width = self.max_fraction);
        while fraction.len() > self.min_fraction && fraction.ends_with('0') {
            fraction.pop();
        }
        if !fraction.is_empty() && self.max_fraction > 0 {
            out.push_str(self.locale.decimal());
            out.push_str(&fraction);
        }

        Some(out)
    }
}

impl FormatValue for NumberFormat {
    fn format_value(&self, value: Option<f64>) -> String {
        match value {
            None => PLACEHOLDER.to_string(),
            Some(v) if v.is_nan() => PLACEHOLDER.to_string(),
            Some(v) => self.try_format(v).unwrap_or_else(|| v.to_string()),
        }
    }
}

/// Resolve a locale name, trying `-`/`_` variants and the bare language.
pub fn lookup_locale(name: &str) -> Result<Locale> {
    let name = name.trim();
    let candidates = [
        name.to_string(),
        name.replace('_', "-"),
        name.split(['-', '_']).next().unwrap_or(name).to_string(),
    ];

    candidates
        .iter()
        .find_map(|candidate| Locale::from_name(candidate).ok())
        .ok_or_else(|| Error::Locale(name.to_string()))
}

/// Resolve a locale name to the one used for month and weekday names.
///
/// A bare language such as `"de"` maps to its home region (`de_DE`).
/// Unknown names fall back to POSIX, which renders English names.
pub fn lookup_date_locale(name: &str) -> DateLocale {
    let name = name.trim().replace('-', "_");
    let language = name.split('_').next().unwrap_or(&name).to_string();
    let candidates = [
        name.clone(),
        format!("{}_{}", language, language.to_uppercase()),
    ];

    match candidates
        .iter()
        .find_map(|candidate| DateLocale::try_from(candidate.as_str()).ok())
    {
        Some(locale) => locale,
        None => {
            tracing::debug!(locale = %name, "No date locale, using POSIX names");
            DateLocale::POSIX
        }
    }
}

/// Time zone used when rendering dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    /// Coordinated Universal Time (default).
    #[default]
    Utc,
    /// The system's local time zone.
    Local,
}

/// strftime-based date+time formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    pattern: String,
    zone: TimeZoneMode,
    locale: DateLocale,
}

impl Default for DateTimeFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_PATTERN.to_string(),
            zone: TimeZoneMode::Utc,
            locale: DateLocale::POSIX,
        }
    }
}

impl DateTimeFormat {
    /// Create a formatter; rejects patterns chrono cannot render.
    pub fn new(pattern: impl Into<String>, zone: TimeZoneMode) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!("Invalid date pattern: {}", pattern)));
        }
        Ok(Self {
            pattern,
            zone,
            locale: DateLocale::POSIX,
        })
    }

    /// Render month and weekday names in the given locale.
    pub fn with_locale(mut self, locale: DateLocale) -> Self {
        self.locale = locale;
        self
    }

    /// The strftime pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render an instant.
    pub fn format_instant(&self, instant: DateTime<Utc>) -> String {
        let mut out = String::new();
        let written = match self.zone {
            TimeZoneMode::Utc => write!(
                out,
                "{}",
                instant.format_localized(&self.pattern, self.locale)
            ),
            TimeZoneMode::Local => write!(
                out,
                "{}",
                instant
                    .with_timezone(&Local)
                    .format_localized(&self.pattern, self.locale)
            ),
        };

        match written {
            Ok(()) => out,
            Err(_) => instant.to_rfc3339(),
        }
    }

    /// Render epoch milliseconds; `None` when out of range.
    pub fn format_millis(&self, millis: f64) -> Option<String> {
        if !millis.is_finite() {
            return None;
        }
        DateTime::from_timestamp_millis(millis.trunc() as i64).map(|dt| self.format_instant(dt))
    }
}

impl FormatTime for DateTimeFormat {
    fn format_time(&self, value: &TimeValue, _position: Option<usize>) -> String {
        match value {
            TimeValue::Date(dt) => self.format_instant(*dt),
            TimeValue::Number(n) if *n > EPOCH_THRESHOLD => self
                .format_millis(*n)
                .unwrap_or_else(|| value.to_string()),
            TimeValue::Number(_) => value.to_string(),
            TimeValue::Text(s) => match parse_date(s) {
                Some(dt) => self.format_instant(dt),
                None => s.clone(),
            },
        }
    }
}

/// Turns axis keys back into display labels.
pub struct TimeLabeler<'a> {
    index: &'a AxisIndex,
    formatter: &'a dyn FormatTime,
}

impl<'a> TimeLabeler<'a> {
    pub fn new(index: &'a AxisIndex, formatter: &'a dyn FormatTime) -> Self {
        Self { index, formatter }
    }

    /// Label for an axis key; unknown keys format the key itself.
    pub fn label(&self, x: f64) -> String {
        match self.index.raw(x) {
            Some(raw) => self.formatter.format_time(raw, self.index.position(x)),
            None => self.formatter.format_time(&TimeValue::Number(x), None),
        }
    }
}
