//! Series specifications and their resolution to plotted series.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::visibility::VisibilityState;

/// Maximum number of series a chart plots.
pub const MAX_SERIES: usize = 2;

/// Number of colors in the chart palette.
pub const PALETTE_SIZE: u8 = 5;

/// Width reserved for a visible Y axis.
pub const AXIS_WIDTH: f32 = 60.0;

/// Which Y axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    #[default]
    Left,
    Right,
}

impl AxisSide {
    /// Both sides, left first.
    pub const ALL: [AxisSide; 2] = [AxisSide::Left, AxisSide::Right];

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisSide::Left => "left",
            AxisSide::Right => "right",
        }
    }
}

impl fmt::Display for AxisSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A series color: a palette slot resolved by the theme, or a fixed RGB value.
///
/// Parsed from `"chart-N"` (N in 1..=5) or `"#rrggbb"` / `"#rgb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SeriesColor {
    /// Palette slot, 1-based.
    Palette(u8),
    /// Fixed color.
    Rgb(u8, u8, u8),
}

impl SeriesColor {
    /// Palette color for the series at `index`, capped at the last slot.
    pub fn for_index(index: usize) -> Self {
        let slot = (index + 1).min(PALETTE_SIZE as usize) as u8;
        SeriesColor::Palette(slot)
    }
}

impl FromStr for SeriesColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::InvalidColor(s.to_string());

        if let Some(slot) = s.strip_prefix("chart-") {
            let slot: u8 = slot.parse().map_err(|_| invalid())?;
            if !(1..=PALETTE_SIZE).contains(&slot) {
                return Err(invalid());
            }
            return Ok(SeriesColor::Palette(slot));
        }

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());

        match hex.len() {
            6 => Ok(SeriesColor::Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // Short form: each digit is doubled.
            3 => Ok(SeriesColor::Rgb(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for SeriesColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeriesColor> for String {
    fn from(color: SeriesColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for SeriesColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesColor::Palette(slot) => write!(f, "chart-{}", slot),
            SeriesColor::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

/// A requested series: which field to plot and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    /// Field of the record holding the values.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Fixed color (defaults to a palette slot).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SeriesColor>,
    /// Axis assignment (defaults by position).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisSide>,
}

impl SeriesSpec {
    /// Create a series spec with default color and axis.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            color: None,
            axis: None,
        }
    }

    /// Set a fixed color.
    pub fn with_color(mut self, color: SeriesColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the axis.
    pub fn with_axis(mut self, axis: AxisSide) -> Self {
        self.axis = Some(axis);
        self
    }
}

/// A series with color and axis filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSeries {
    pub key: String,
    pub label: String,
    pub color: SeriesColor,
    pub axis: AxisSide,
}

/// Resolve series specs: keep the first two, default colors and axes.
///
/// The first series defaults to the left axis, the second to the right.
pub fn resolve_series(specs: &[SeriesSpec]) -> Vec<ResolvedSeries> {
    if specs.len() > MAX_SERIES {
        let dropped: Vec<_> = specs[MAX_SERIES..].iter().map(|s| s.key.as_str()).collect();
        tracing::warn!(
            requested = specs.len(),
            ?dropped,
            "Only the first {} series are plotted",
            MAX_SERIES
        );
    }

    specs
        .iter()
        .take(MAX_SERIES)
        .enumerate()
        .map(|(index, spec)| ResolvedSeries {
            key: spec.key.clone(),
            label: spec.label.clone(),
            color: spec.color.unwrap_or_else(|| SeriesColor::for_index(index)),
            axis: spec.axis.unwrap_or(if index == 0 {
                AxisSide::Left
            } else {
                AxisSide::Right
            }),
        })
        .collect()
}

/// Whether one Y axis is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisState {
    pub side: AxisSide,
    pub show: bool,
}

impl AxisState {
    /// Horizontal space the axis takes.
    pub fn width(&self) -> f32 {
        if self.show { AXIS_WIDTH } else { 0.0 }
    }
}

/// Visibility of both Y axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLayout {
    pub left: AxisState,
    pub right: AxisState,
}

impl AxisLayout {
    /// An axis is shown when at least one series on it is visible.
    pub fn compute(series: &[ResolvedSeries], visibility: &VisibilityState) -> Self {
        let shown = |side: AxisSide| {
            series
                .iter()
                .any(|s| s.axis == side && visibility.is_visible(&s.key))
        };

        Self {
            left: AxisState {
                side: AxisSide::Left,
                show: shown(AxisSide::Left),
            },
            right: AxisState {
                side: AxisSide::Right,
                show: shown(AxisSide::Right),
            },
        }
    }

    /// State of one side.
    pub fn get(&self, side: AxisSide) -> AxisState {
        match side {
            AxisSide::Left => self.left,
            AxisSide::Right => self.right,
        }
    }
}
