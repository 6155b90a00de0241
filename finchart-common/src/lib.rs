//! FinChart Common Library
//!
//! GUI-free logic behind FinChart's dual-axis time-series charts:
//!
//! - [`datum`] - Records, time values and date parsing
//! - [`normalize`] - Mapping time values to numeric axis keys
//! - [`series`] - Series specs, default colors and axes
//! - [`visibility`] - Per-series visibility flags
//! - [`format`] - Value and time formatters
//! - [`brush`] - Index window used for scrubbing
//! - [`model`] - The chart model tying it all together
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod brush;
pub mod config;
pub mod datum;
pub mod error;
pub mod format;
pub mod model;
pub mod normalize;
pub mod series;
pub mod visibility;

// Re-export commonly used types at the crate root
pub use brush::{BrushHandle, BrushRange};
pub use config::{
    AppConfig, ChartConfig, CustomChartConfig, LogFormat, LoggingConfig, ThemeMode, load_config,
    parse_config,
};
pub use datum::{DEFAULT_TIME_KEY, Datum, FieldValue, Record, TimeValue, load_records, parse_date};
pub use error::{Error, Result};
pub use format::{
    DateTimeFormat, FormatTime, FormatValue, NumberFormat, PLACEHOLDER, TimeLabeler, TimeZoneMode,
};
pub use model::{ChartModel, DEFAULT_HEIGHT, Tick, Tooltip, TooltipEntry};
pub use normalize::{AxisIndex, Normalized, NormalizedDatum, normalize};
pub use series::{
    AxisLayout, AxisSide, AxisState, MAX_SERIES, ResolvedSeries, SeriesColor, SeriesSpec,
    resolve_series,
};
pub use visibility::VisibilityState;

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Example
///
/// ```ignore
/// use finchart_common::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
