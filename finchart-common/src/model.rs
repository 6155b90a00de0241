//! Chart model: props plus everything derived from them.
//!
//! The model owns the records, the resolved series, the visibility flags and
//! the brush window. Renderers only read from it; user interaction goes
//! through [`ChartModel::toggle_series`] and the brush setters.

use std::fmt;

use crate::brush::{BrushHandle, BrushRange};
use crate::datum::{DEFAULT_TIME_KEY, Record};
use crate::format::{DateTimeFormat, FormatTime, FormatValue, NumberFormat, TimeLabeler};
use crate::normalize::{Normalized, NormalizedDatum, normalize};
use crate::series::{AxisLayout, AxisSide, ResolvedSeries, SeriesColor, SeriesSpec, resolve_series};
use crate::visibility::VisibilityState;

/// Default chart height in pixels.
pub const DEFAULT_HEIGHT: f32 = 360.0;

/// A labelled axis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// One row of a tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipEntry {
    pub key: String,
    pub label: String,
    pub color: SeriesColor,
    pub axis: AxisSide,
    pub value: Option<f64>,
    /// The value run through the value formatter.
    pub text: String,
}

/// Tooltip content for the record nearest the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Axis key of the record.
    pub x: f64,
    /// Position of the record.
    pub position: usize,
    /// Formatted time label.
    pub label: String,
    /// One entry per visible series.
    pub entries: Vec<TooltipEntry>,
}

/// A dual-axis time-series line chart.
pub struct ChartModel<R> {
    normalized: Normalized<R>,
    specs: Vec<SeriesSpec>,
    series: Vec<ResolvedSeries>,
    visibility: VisibilityState,
    brush: Option<BrushRange>,
    time_key: String,
    height: f32,
    title: Option<String>,
    description: Option<String>,
    show_brush: bool,
    show_grid: bool,
    value_format: Box<dyn FormatValue + Send + Sync>,
    time_format: Box<dyn FormatTime + Send + Sync>,
}

impl<R> fmt::Debug for ChartModel<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartModel")
            .field("records", &self.normalized.len())
            .field("series", &self.series)
            .field("visibility", &self.visibility)
            .field("brush", &self.brush)
            .field("time_key", &self.time_key)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl<R: Record> ChartModel<R> {
    /// Create a chart over `data` plotting `series`, with default options.
    pub fn new(data: Vec<R>, series: Vec<SeriesSpec>) -> Self {
        let normalized = normalize(data, DEFAULT_TIME_KEY);
        let resolved = resolve_series(&series);
        let visibility = VisibilityState::new(&resolved);
        let brush = BrushRange::full(normalized.len());

        Self {
            normalized,
            specs: series,
            series: resolved,
            visibility,
            brush,
            time_key: DEFAULT_TIME_KEY.to_string(),
            height: DEFAULT_HEIGHT,
            title: None,
            description: None,
            show_brush: true,
            show_grid: true,
            value_format: Box::new(NumberFormat::default()),
            time_format: Box::new(DateTimeFormat::default()),
        }
    }

    /// Use a different field as the time axis.
    pub fn with_time_key(mut self, key: impl Into<String>) -> Self {
        self.set_time_key(key);
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Formatter for Y ticks and tooltip values.
    pub fn with_value_formatter(
        mut self,
        formatter: impl FormatValue + Send + Sync + 'static,
    ) -> Self {
        self.value_format = Box::new(formatter);
        self
    }

    /// Formatter for X ticks, tooltip labels and brush labels.
    pub fn with_time_formatter(mut self, formatter: impl FormatTime + Send + Sync + 'static) -> Self {
        self.time_format = Box::new(formatter);
        self
    }

    pub fn with_brush(mut self, show: bool) -> Self {
        self.show_brush = show;
        self
    }

    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    /// Replace the records. The brush goes back to the full range.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.normalized = normalize(data, &self.time_key);
        self.brush = BrushRange::full(self.normalized.len());
    }

    /// Replace the series. Visibility resets when the series keys change.
    pub fn set_series(&mut self, series: Vec<SeriesSpec>) {
        self.series = resolve_series(&series);
        self.specs = series;
        if self.visibility.sync(&self.series) {
            tracing::debug!(series = self.series.len(), "Series changed, visibility reset");
        }
    }

    /// Change the time field and renormalize.
    pub fn set_time_key(&mut self, key: impl Into<String>) {
        self.time_key = key.into();
        let records = std::mem::take(&mut self.normalized).into_records();
        self.set_data(records);
    }

    /// Flip a series' visibility.
    pub fn toggle_series(&mut self, key: &str) -> Option<bool> {
        let visible = self.visibility.toggle(key);
        match visible {
            Some(visible) => tracing::debug!(series = key, visible, "Toggled series"),
            None => tracing::debug!(series = key, "Ignoring toggle for unknown series"),
        }
        visible
    }

    /// Set the brush window (clamped and ordered).
    pub fn set_brush(&mut self, start: usize, end: usize) {
        if let Some(brush) = BrushRange::new(start, end, self.normalized.len()) {
            tracing::debug!(start = brush.start(), end = brush.end(), "Brush moved");
            self.brush = Some(brush);
        }
    }

    /// Move a brush handle to a record position.
    pub fn drag_brush(&mut self, handle: BrushHandle, position: usize) {
        if let Some(brush) = self
            .brush
            .and_then(|b| b.drag(handle, position, self.normalized.len()))
        {
            self.set_brush(brush.start(), brush.end());
        }
    }

    /// Brush back to the full range.
    pub fn reset_brush(&mut self) {
        self.brush = BrushRange::full(self.normalized.len());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn show_brush(&self) -> bool {
        self.show_brush
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn time_key(&self) -> &str {
        &self.time_key
    }

    /// Series as requested, before truncation.
    pub fn specs(&self) -> &[SeriesSpec] {
        &self.specs
    }

    /// Resolved series (at most two).
    pub fn series(&self) -> &[ResolvedSeries] {
        &self.series
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visibility.is_visible(key)
    }

    /// Resolved series that are currently shown.
    pub fn visible_series(&self) -> impl Iterator<Item = &ResolvedSeries> {
        self.series
            .iter()
            .filter(|s| self.visibility.is_visible(&s.key))
    }

    /// All normalized records.
    pub fn data(&self) -> &[NormalizedDatum<R>] {
        self.normalized.data()
    }

    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Current brush window; `None` without data.
    pub fn brush(&self) -> Option<BrushRange> {
        self.brush
    }

    /// Records inside the brush window.
    pub fn windowed(&self) -> &[NormalizedDatum<R>] {
        match self.brush {
            Some(brush) => &self.normalized.data()[brush.start()..=brush.end()],
            None => &[],
        }
    }

    /// Plotted `(x, y)` pairs of one series inside the brush window.
    ///
    /// Records without a finite value are skipped so the line connects
    /// across gaps.
    pub fn points(&self, key: &str) -> Vec<(f64, f64)> {
        self.windowed()
            .iter()
            .filter_map(|d| {
                d.record
                    .numeric(key)
                    .filter(|y| y.is_finite())
                    .map(|y| (d.x, y))
            })
            .collect()
    }

    /// Horizontal extent of the brush window.
    pub fn x_domain(&self) -> Option<(f64, f64)> {
        let (min, max) = min_max(self.windowed().iter().map(|d| d.x))?;
        if max - min <= f64::EPSILON {
            Some((min - 1.0, max + 1.0))
        } else {
            Some((min, max))
        }
    }

    /// Vertical extent of the visible series on one axis, padded by 10 %.
    pub fn y_domain(&self, side: AxisSide) -> Option<(f64, f64)> {
        let values = self
            .visible_series()
            .filter(|s| s.axis == side)
            .flat_map(|s| self.points(&s.key).into_iter().map(|(_, y)| y));
        let (min, max) = min_max(values)?;

        let range = max - min;
        if range < 0.001 {
            Some((min - 0.5, max + 0.5))
        } else {
            let padding = range * 0.1;
            Some((min - padding, max + padding))
        }
    }

    /// Which Y axes are drawn.
    pub fn axis_layout(&self) -> AxisLayout {
        AxisLayout::compute(&self.series, &self.visibility)
    }

    /// Display label for an axis key.
    pub fn label_for(&self, x: f64) -> String {
        TimeLabeler::new(self.normalized.index(), self.time_format.as_ref()).label(x)
    }

    /// Display label for the record at `position`.
    pub fn label_at(&self, position: usize) -> Option<String> {
        self.normalized
            .data()
            .get(position)
            .map(|d| self.label_for(d.x))
    }

    /// Run a value through the value formatter.
    pub fn format_value(&self, value: Option<f64>) -> String {
        self.value_format.format_value(value)
    }

    /// Windowed record whose key is closest to `x`; ties go to the earlier one.
    pub fn nearest(&self, x: f64) -> Option<&NormalizedDatum<R>> {
        self.windowed()
            .iter()
            .min_by(|a, b| (a.x - x).abs().total_cmp(&(b.x - x).abs()))
    }

    /// Tooltip for the record nearest `x`.
    pub fn tooltip_at(&self, x: f64) -> Option<Tooltip> {
        let position = self.nearest(x)?.index;
        self.tooltip_for(position)
    }

    /// Tooltip for the record at `position`.
    pub fn tooltip_for(&self, position: usize) -> Option<Tooltip> {
        let datum = self.normalized.data().get(position)?;
        let entries = self
            .visible_series()
            .map(|s| {
                let value = datum.record.numeric(&s.key);
                TooltipEntry {
                    key: s.key.clone(),
                    label: s.label.clone(),
                    color: s.color,
                    axis: s.axis,
                    value,
                    text: self.format_value(value),
                }
            })
            .collect();

        Some(Tooltip {
            x: datum.x,
            position,
            label: self.label_for(datum.x),
            entries,
        })
    }

    /// Up to `max` X ticks at record positions spread over the brush window.
    pub fn x_ticks(&self, max: usize) -> Vec<Tick> {
        let window = self.windowed();
        if window.is_empty() || max == 0 {
            return Vec::new();
        }

        let n = window.len();
        let mut positions: Vec<usize> = if n <= max {
            (0..n).collect()
        } else if max == 1 {
            vec![0]
        } else {
            (0..max)
                .map(|i| ((i * (n - 1)) as f64 / (max - 1) as f64).round() as usize)
                .collect()
        };
        positions.dedup();

        positions
            .into_iter()
            .map(|i| Tick {
                value: window[i].x,
                label: self.label_for(window[i].x),
            })
            .collect()
    }

    /// `count` evenly spaced ticks over one axis domain, top to bottom.
    pub fn y_ticks(&self, side: AxisSide, count: usize) -> Vec<Tick> {
        let Some((min, max)) = self.y_domain(side) else {
            return Vec::new();
        };
        if count < 2 {
            return Vec::new();
        }

        (0..count)
            .map(|i| {
                let value = max - (i as f64 / (count - 1) as f64) * (max - min);
                Tick {
                    value,
                    label: self.format_value(Some(value)),
                }
            })
            .collect()
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::{Datum, TimeValue};
    use crate::format::PLACEHOLDER;

    const WEEKS: [(&str, f64, f64); 12] = [
        ("2025-01-01T00:00:00Z", 2450.12, 132.45),
        ("2025-01-08T00:00:00Z", 2380.34, 136.8),
        ("2025-01-15T00:00:00Z", 2498.92, 140.12),
        ("2025-01-22T00:00:00Z", 2566.48, 142.75),
        ("2025-01-29T00:00:00Z", 2521.87, 138.64),
        ("2025-02-05T00:00:00Z", 2602.56, 144.88),
        ("2025-02-12T00:00:00Z", 2688.9, 147.23),
        ("2025-02-19T00:00:00Z", 2714.22, 151.67),
        ("2025-02-26T00:00:00Z", 2660.71, 149.12),
        ("2025-03-05T00:00:00Z", 2735.18, 153.44),
        ("2025-03-12T00:00:00Z", 2792.03, 156.03),
        ("2025-03-19T00:00:00Z", 2856.41, 159.8),
    ];

    fn weekly() -> ChartModel<Datum> {
        let data = WEEKS
            .iter()
            .map(|(t, a, b)| {
                Datum::new()
                    .with("time", *t)
                    .with("primaryValue", *a)
                    .with("secondaryValue", *b)
            })
            .collect();
        let series = vec![
            SeriesSpec::new("primaryValue", "Asset A"),
            SeriesSpec::new("secondaryValue", "Asset B"),
        ];
        ChartModel::new(data, series).with_title("Portfolio Comparison")
    }

    #[test]
    fn test_weekly_end_to_end() {
        let chart = weekly();

        assert_eq!(chart.points("primaryValue").len(), 12);
        assert_eq!(chart.points("secondaryValue").len(), 12);

        assert_eq!(chart.series()[0].axis, AxisSide::Left);
        assert_eq!(chart.series()[1].axis, AxisSide::Right);
        let layout = chart.axis_layout();
        assert!(layout.left.show && layout.right.show);

        let brush = chart.brush().unwrap();
        assert_eq!((brush.start(), brush.end()), (0, 11));
        assert!(brush.is_full(chart.len()));

        let (x_min, x_max) = chart.x_domain().unwrap();
        assert_eq!(x_min, 1_735_689_600_000.0);
        assert_eq!(x_max, chart.data()[11].x);
    }

    #[test]
    fn test_hidden_series_drops_axis_and_domain() {
        let mut chart = weekly();
        assert_eq!(chart.toggle_series("secondaryValue"), Some(false));

        assert!(!chart.axis_layout().right.show);
        assert!(chart.y_domain(AxisSide::Right).is_none());
        assert!(chart.y_ticks(AxisSide::Right, 5).is_empty());
        assert_eq!(chart.visible_series().count(), 1);

        // Hidden series are left out of tooltips.
        let tooltip = chart.tooltip_for(0).unwrap();
        assert_eq!(tooltip.entries.len(), 1);
        assert_eq!(tooltip.entries[0].key, "primaryValue");
    }

    #[test]
    fn test_y_domain_padding() {
        let chart = weekly();
        let (min, max) = chart.y_domain(AxisSide::Left).unwrap();
        let range = 2856.41 - 2380.34;
        assert!((min - (2380.34 - range * 0.1)).abs() < 1e-9);
        assert!((max - (2856.41 + range * 0.1)).abs() < 1e-9);
        // Fitted to the data, not anchored at zero.
        assert!(min > 2000.0);

        let flat = ChartModel::new(
            vec![Datum::new().with("v", 3.0), Datum::new().with("v", 3.0)],
            vec![SeriesSpec::new("v", "V")],
        );
        assert_eq!(flat.y_domain(AxisSide::Left), Some((2.5, 3.5)));
    }

    #[test]
    fn test_brush_limits_window() {
        let mut chart = weekly();
        chart.set_brush(9, 2);

        let brush = chart.brush().unwrap();
        assert_eq!((brush.start(), brush.end()), (2, 9));
        assert_eq!(chart.windowed().len(), 8);
        assert_eq!(chart.points("primaryValue").len(), 8);
        assert_eq!(chart.x_domain().unwrap().0, chart.data()[2].x);

        chart.drag_brush(BrushHandle::end_of(brush), 11);
        assert_eq!(chart.brush().unwrap().end(), 11);

        chart.reset_brush();
        assert!(chart.brush().unwrap().is_full(12));
    }

    #[test]
    fn test_set_data_resets_brush() {
        let mut chart = weekly();
        chart.set_brush(3, 4);
        chart.set_data(vec![Datum::new().with("primaryValue", 1.0); 5]);

        let brush = chart.brush().unwrap();
        assert_eq!((brush.start(), brush.end()), (0, 4));

        chart.set_data(Vec::new());
        assert!(chart.brush().is_none());
        assert!(chart.windowed().is_empty());
        assert!(chart.x_domain().is_none());
        assert!(chart.tooltip_at(0.0).is_none());
    }

    #[test]
    fn test_set_series_resets_visibility_only_on_change() {
        let mut chart = weekly();
        chart.toggle_series("primaryValue");

        chart.set_series(vec![
            SeriesSpec::new("primaryValue", "Asset A (renamed)"),
            SeriesSpec::new("secondaryValue", "Asset B"),
        ]);
        assert!(!chart.is_visible("primaryValue"));
        assert_eq!(chart.series()[0].label, "Asset A (renamed)");

        chart.set_series(vec![SeriesSpec::new("secondaryValue", "Asset B")]);
        assert!(chart.is_visible("secondaryValue"));
        assert_eq!(chart.series().len(), 1);
        assert_eq!(chart.series()[0].axis, AxisSide::Left);
    }

    #[test]
    fn test_extra_series_dropped() {
        let chart = ChartModel::new(
            vec![Datum::new().with("a", 1.0).with("b", 2.0).with("c", 3.0)],
            vec![
                SeriesSpec::new("a", "A"),
                SeriesSpec::new("b", "B"),
                SeriesSpec::new("c", "C"),
            ],
        );

        assert_eq!(chart.specs().len(), 3);
        let keys: Vec<_> = chart.series().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_tooltip_nearest_record() {
        let chart = weekly();
        let second = chart.data()[1].x;

        let tooltip = chart.tooltip_at(second + 1000.0).unwrap();
        assert_eq!(tooltip.position, 1);
        assert_eq!(tooltip.label, "Jan 8, 2025, 00:00");
        assert_eq!(tooltip.entries.len(), 2);
        assert_eq!(tooltip.entries[0].text, "2,380.34");
        assert_eq!(tooltip.entries[1].text, "136.80");
        assert_eq!(tooltip.entries[1].color, SeriesColor::Palette(2));
    }

    #[test]
    fn test_tooltip_missing_value_placeholder() {
        let chart = ChartModel::new(
            vec![Datum::new().with("time", 1.0)],
            vec![SeriesSpec::new("v", "V")],
        );

        let tooltip = chart.tooltip_at(1.0).unwrap();
        assert_eq!(tooltip.entries[0].value, None);
        assert_eq!(tooltip.entries[0].text, PLACEHOLDER);
        assert!(chart.points("v").is_empty());
        assert!(chart.y_domain(AxisSide::Left).is_none());
    }

    #[test]
    fn test_custom_formatters_and_time_key() {
        let data = vec![
            Datum::new().with("name", "Page A").with("uv", 590.0),
            Datum::new().with("name", "Page B").with("uv", 868.0),
        ];
        let chart = ChartModel::new(data, vec![SeriesSpec::new("uv", "UV")])
            .with_time_key("name")
            .with_value_formatter(|v: Option<f64>| format!("{:.0}", v.unwrap_or(0.0)))
            .with_time_formatter(|t: &TimeValue, _: Option<usize>| format!("<{}>", t));

        assert_eq!(chart.time_key(), "name");
        assert_eq!(chart.data()[1].x, 1.0);
        assert_eq!(chart.label_for(1.0), "<Page B>");
        assert_eq!(chart.label_at(0).as_deref(), Some("<Page A>"));
        assert_eq!(chart.format_value(None), "0");
    }

    #[test]
    fn test_x_ticks_spread_over_window() {
        let chart = weekly();

        let ticks = chart.x_ticks(4);
        let positions: Vec<_> = ticks
            .iter()
            .map(|t| chart.data().iter().position(|d| d.x == t.value).unwrap())
            .collect();
        assert_eq!(positions, vec![0, 4, 7, 11]);
        assert_eq!(ticks[0].label, "Jan 1, 2025, 00:00");

        assert_eq!(chart.x_ticks(50).len(), 12);
        assert!(chart.x_ticks(0).is_empty());
    }

    #[test]
    fn test_y_ticks_span_domain() {
        let chart = weekly();
        let (min, max) = chart.y_domain(AxisSide::Right).unwrap();

        let ticks = chart.y_ticks(AxisSide::Right, 5);
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[0].value, max);
        assert!((ticks[4].value - min).abs() < 1e-9);
    }

    #[test]
    fn test_defaults() {
        let chart = weekly();
        assert_eq!(chart.height(), DEFAULT_HEIGHT);
        assert_eq!(chart.time_key(), "time");
        assert!(chart.show_brush());
        assert!(chart.show_grid());
        assert_eq!(chart.title(), Some("Portfolio Comparison"));
        assert_eq!(chart.description(), None);
    }
}
