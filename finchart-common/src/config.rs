use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::format::{
    DEFAULT_DATE_PATTERN, DateTimeFormat, NumberFormat, TimeZoneMode, lookup_date_locale,
};
use crate::model::DEFAULT_HEIGHT;
use crate::series::SeriesSpec;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Application color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

/// Chart display defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart height in pixels.
    #[serde(default = "default_height")]
    pub height: f32,

    /// Show the brush under the chart.
    #[serde(default = "default_true")]
    pub show_brush: bool,

    /// Draw the background grid.
    #[serde(default = "default_true")]
    pub show_grid: bool,
}

fn default_height() -> f32 {
    DEFAULT_HEIGHT
}

fn default_true() -> bool {
    true
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            show_brush: true,
            show_grid: true,
        }
    }
}

/// Chart built from a user-supplied data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomChartConfig {
    /// Chart title.
    #[serde(default)]
    pub title: Option<String>,

    /// Short description under the title.
    #[serde(default)]
    pub description: Option<String>,

    /// Field holding the time value.
    #[serde(default)]
    pub time_key: Option<String>,

    /// Series to plot; when empty, the first numeric fields are used.
    #[serde(default)]
    pub series: Vec<SeriesSpec>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub theme: ThemeMode,

    /// Locale name for numbers, months and weekdays (e.g. "en", "de").
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Time zone used to render dates.
    #[serde(default)]
    pub timezone: TimeZoneMode,

    /// strftime pattern for the default time formatter.
    #[serde(default = "default_date_pattern")]
    pub date_pattern: String,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub custom: CustomChartConfig,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_date_pattern() -> String {
    DEFAULT_DATE_PATTERN.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            theme: ThemeMode::default(),
            locale: default_locale(),
            timezone: TimeZoneMode::default(),
            date_pattern: default_date_pattern(),
            chart: ChartConfig::default(),
            custom: CustomChartConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default value formatter for the configured locale.
    pub fn number_format(&self) -> Result<NumberFormat> {
        NumberFormat::from_locale_name(&self.locale)
    }

    /// Default time formatter for the configured pattern, zone and locale.
    pub fn date_format(&self) -> Result<DateTimeFormat> {
        Ok(
            DateTimeFormat::new(self.date_pattern.clone(), self.timezone)?
                .with_locale(lookup_date_locale(&self.locale)),
        )
    }

    /// Check that every derived formatter can be built.
    pub fn validate(&self) -> Result<()> {
        self.number_format()?;
        self.date_format()?;
        if !(self.chart.height.is_finite() && self.chart.height > 0.0) {
            return Err(Error::Config(format!(
                "Chart height must be positive, got {}",
                self.chart.height
            )));
        }
        Ok(())
    }
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{AxisSide, SeriesColor};

    #[test]
    fn test_parse_app_config() {
        let json5 = r##"
        {
            logging: {
                level: "debug",
                format: "json",
            },
            theme: "light",
            locale: "de",
            timezone: "local",
            date_pattern: "%d.%m.%Y",
            chart: {
                height: 420,
                show_brush: false,
            },
            custom: {
                title: "BTC",
                time_key: "date",
                series: [
                    { key: "close", label: "Close", color: "#f7931a" },
                    { key: "volume", label: "Volume", axis: "right" },
                ],
            },
        }
        "##;

        let config: AppConfig = parse_config(json5).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.timezone, TimeZoneMode::Local);
        assert_eq!(config.chart.height, 420.0);
        assert!(!config.chart.show_brush);
        assert!(config.chart.show_grid);
        assert_eq!(config.custom.time_key.as_deref(), Some("date"));
        assert_eq!(
            config.custom.series[0].color,
            Some(SeriesColor::Rgb(0xf7, 0x93, 0x1a))
        );
        assert_eq!(config.custom.series[1].axis, Some(AxisSide::Right));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config() {
        let config: AppConfig = parse_config("{}").unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.locale, "en");
        assert_eq!(config.timezone, TimeZoneMode::Utc);
        assert_eq!(config.date_pattern, DEFAULT_DATE_PATTERN);
        assert_eq!(config.chart.height, DEFAULT_HEIGHT);
        assert!(config.chart.show_brush && config.chart.show_grid);
        assert!(config.custom.series.is_empty());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config: AppConfig = parse_config(r#"{ locale: "xx-nowhere" }"#).unwrap();
        assert!(matches!(config.validate(), Err(Error::Locale(_))));

        let config: AppConfig = parse_config(r#"{ date_pattern: "%Q" }"#).unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config: AppConfig = parse_config(r#"{ chart: { height: 0 } }"#).unwrap();
        assert!(config.validate().is_err());

        let bad: Result<AppConfig> = parse_config(r#"{ custom: { series: [{ key: "a", label: "A", color: "blue" }] } }"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_date_format_uses_locale() {
        use crate::format::FormatValue;
        use chrono::{TimeZone, Utc};

        let config: AppConfig =
            parse_config(r#"{ locale: "de", date_pattern: "%-d. %B %Y" }"#).unwrap();
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        assert_eq!(
            config.date_format().unwrap().format_instant(instant),
            "1. März 2025"
        );
        assert_eq!(config.number_format().unwrap().format_value(Some(1234.5)), "1.234,50");
    }

    #[test]
    fn test_load_missing_file() {
        let result: Result<AppConfig> = load_config("/nonexistent/finchart.json5");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
