//! Built-in demo dashboards.
//!
//! Two fixed datasets shown when FinChart starts: a weekly two-asset
//! portfolio and a small page-view table keyed by page name.

use num_format::Locale;

use finchart_common::{
    AppConfig, AxisSide, ChartModel, DEFAULT_TIME_KEY, DateTimeFormat, Datum, FormatValue,
    NumberFormat, SeriesColor, SeriesSpec,
};

/// strftime pattern of the portfolio X labels.
const SHORT_DATE: &str = "%b %-d";

/// Height of the page-view chart.
const PAGE_VIEWS_HEIGHT: f32 = 400.0;

/// Weekly closes: (time, asset A, asset B).
const PORTFOLIO: [(&str, f64, f64); 12] = [
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

/// Page views: (name, uv, pv, amt).
const PAGE_VIEWS: [(&str, f64, f64, f64); 7] = [
    ("Page A", 590.0, 800.0, 1400.0),
    ("Page B", 590.0, 800.0, 1400.0),
    ("Page C", 868.0, 967.0, 1506.0),
    ("Page D", 1397.0, 1098.0, 989.0),
    ("Page E", 1480.0, 1200.0, 1228.0),
    ("Page F", 1520.0, 1108.0, 1100.0),
    ("Page G", 1400.0, 680.0, 1700.0),
];

/// Portfolio records.
pub fn portfolio_data() -> Vec<Datum> {
    PORTFOLIO
        .iter()
        .map(|(time, a, b)| {
            Datum::new()
                .with(DEFAULT_TIME_KEY, *time)
                .with("primaryValue", *a)
                .with("secondaryValue", *b)
        })
        .collect()
}

/// Asset A on the left axis, asset B on the right.
pub fn portfolio_series() -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new("primaryValue", "Asset A").with_axis(AxisSide::Left),
        SeriesSpec::new("secondaryValue", "Asset B").with_axis(AxisSide::Right),
    ]
}

/// The portfolio comparison chart: dollar values, short dates.
pub fn portfolio_chart(config: &AppConfig) -> ChartModel<Datum> {
    let dollars = NumberFormat::currency(Locale::en, "$");
    let short_date = DateTimeFormat::new(SHORT_DATE, config.timezone).unwrap_or_default();

    ChartModel::new(portfolio_data(), portfolio_series())
        .with_title("Portfolio Comparison")
        .with_description("Track two asset prices side by side and scrub across the timeline.")
        .with_height(config.chart.height)
        .with_brush(config.chart.show_brush)
        .with_grid(config.chart.show_grid)
        .with_value_formatter(move |value: Option<f64>| {
            dollars.format_value(Some(value.unwrap_or(0.0)))
        })
        .with_time_formatter(short_date)
}

/// Page-view records keyed by page name.
pub fn page_views_data() -> Vec<Datum> {
    PAGE_VIEWS
        .iter()
        .map(|(name, uv, pv, amt)| {
            Datum::new()
                .with("name", *name)
                .with("uv", *uv)
                .with("pv", *pv)
                .with("amt", *amt)
        })
        .collect()
}

/// Three series; only the first two are plotted.
pub fn page_views_series() -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new("uv", "uv").with_color(SeriesColor::Rgb(0x88, 0x84, 0xd8)),
        SeriesSpec::new("pv", "pv").with_color(SeriesColor::Rgb(0x99, 0x88, 0x77)),
        SeriesSpec::new("amt", "amt"),
    ]
}

/// The page-view chart: categorical X axis, no brush.
pub fn page_views_chart(config: &AppConfig) -> ChartModel<Datum> {
    let mut chart = ChartModel::new(page_views_data(), page_views_series())
        .with_time_key("name")
        .with_title("Page Views")
        .with_height(PAGE_VIEWS_HEIGHT)
        .with_brush(false)
        .with_grid(config.chart.show_grid);

    if let Ok(format) = config.number_format() {
        chart = chart.with_value_formatter(format);
    }
    if let Ok(format) = config.date_format() {
        chart = chart.with_time_formatter(format);
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_chart() {
        let chart = portfolio_chart(&AppConfig::default());

        assert_eq!(chart.len(), 12);
        assert_eq!(chart.title(), Some("Portfolio Comparison"));
        assert_eq!(chart.label_at(0).as_deref(), Some("Jan 1"));
        assert_eq!(chart.label_at(11).as_deref(), Some("Mar 19"));
        assert_eq!(chart.format_value(Some(2450.12)), "$2,450.12");
        // Missing values render as zero dollars.
        assert_eq!(chart.format_value(None), "$0.00");

        let layout = chart.axis_layout();
        assert!(layout.left.show && layout.right.show);
    }

    #[test]
    fn test_page_views_chart() {
        let chart = page_views_chart(&AppConfig::default());

        assert_eq!(chart.len(), 7);
        // amt exceeds the two-series limit.
        let keys: Vec<&str> = chart.series().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["uv", "pv"]);
        assert_eq!(chart.series()[1].color, SeriesColor::Rgb(0x99, 0x88, 0x77));
        assert_eq!(chart.series()[1].axis, AxisSide::Right);

        // Page names are not dates: positional keys, raw labels.
        assert_eq!(chart.data()[3].x, 3.0);
        assert_eq!(chart.label_at(3).as_deref(), Some("Page D"));
        assert!(chart.brush().is_some());
        assert!(!chart.show_brush());
    }
}
