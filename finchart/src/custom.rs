//! Chart for records loaded with `--data`.

use finchart_common::{
    AppConfig, ChartModel, DEFAULT_TIME_KEY, Datum, FieldValue, MAX_SERIES, SeriesSpec,
};

/// Build the custom chart from loaded records and the `custom` config section.
///
/// Without configured series the first numeric fields become the series.
pub fn custom_chart(config: &AppConfig, data: Vec<Datum>) -> ChartModel<Datum> {
    let custom = &config.custom;
    let time_key = custom.time_key.as_deref().unwrap_or(DEFAULT_TIME_KEY);

    let series = if custom.series.is_empty() {
        let inferred = infer_series(&data, time_key);
        tracing::info!(
            series = ?inferred.iter().map(|s| s.key.as_str()).collect::<Vec<_>>(),
            "Inferred custom chart series"
        );
        inferred
    } else {
        custom.series.clone()
    };

    let mut chart = ChartModel::new(data, series)
        .with_time_key(time_key)
        .with_height(config.chart.height)
        .with_brush(config.chart.show_brush)
        .with_grid(config.chart.show_grid);

    if let Some(title) = &custom.title {
        chart = chart.with_title(title.clone());
    }
    if let Some(description) = &custom.description {
        chart = chart.with_description(description.clone());
    }
    if let Ok(format) = config.number_format() {
        chart = chart.with_value_formatter(format);
    }
    if let Ok(format) = config.date_format() {
        chart = chart.with_time_formatter(format);
    }
    chart
}

/// Numeric fields of the first record, in key order, excluding the time key.
pub fn infer_series(data: &[Datum], time_key: &str) -> Vec<SeriesSpec> {
    let Some(first) = data.first() else {
        return Vec::new();
    };

    first
        .keys()
        .filter(|key| *key != time_key)
        .filter(|key| matches!(first.get(key), Some(FieldValue::Number(_))))
        .take(MAX_SERIES)
        .map(|key| SeriesSpec::new(key, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use finchart_common::{CustomChartConfig, parse_config};

    fn records() -> Vec<Datum> {
        vec![
            Datum::new()
                .with("date", "2024-06-01")
                .with("close", 101.5)
                .with("symbol", "ACME")
                .with("volume", 12000.0)
                .with("open", 100.0),
            Datum::new()
                .with("date", "2024-06-02")
                .with("close", 103.0)
                .with("symbol", "ACME")
                .with("volume", 9000.0)
                .with("open", 101.5),
        ]
    }

    #[test]
    fn test_infer_series() {
        let series = infer_series(&records(), "date");
        let keys: Vec<&str> = series.iter().map(|s| s.key.as_str()).collect();
        // BTreeMap order; text fields skipped.
        assert_eq!(keys, vec!["close", "open"]);
        assert!(infer_series(&[], "date").is_empty());
    }

    #[test]
    fn test_custom_chart_from_config() {
        let config: AppConfig = parse_config(
            r##"{
                custom: {
                    title: "ACME",
                    time_key: "date",
                    series: [{ key: "volume", label: "Volume", color: "chart-3" }],
                },
            }"##,
        )
        .unwrap();

        let chart = custom_chart(&config, records());
        assert_eq!(chart.title(), Some("ACME"));
        assert_eq!(chart.time_key(), "date");
        assert_eq!(chart.series().len(), 1);
        assert_eq!(chart.series()[0].label, "Volume");
        assert_eq!(chart.label_at(1).as_deref(), Some("Jun 2, 2024, 00:00"));
    }

    #[test]
    fn test_custom_chart_defaults() {
        let config = AppConfig {
            custom: CustomChartConfig::default(),
            ..AppConfig::default()
        };
        let chart = custom_chart(&config, records());

        // No "time" field: positional keys.
        assert_eq!(chart.time_key(), DEFAULT_TIME_KEY);
        assert_eq!(chart.data()[1].x, 1.0);
        assert_eq!(chart.series().len(), 2);
    }
}
