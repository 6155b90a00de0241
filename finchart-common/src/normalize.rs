//! Axis normalization: turn heterogeneous time values into numeric axis keys.

use std::collections::HashMap;

use crate::datum::{Record, TimeValue, parse_date};

/// A record augmented with its numeric axis key and original time value.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDatum<R> {
    /// The original record.
    pub record: R,
    /// Numeric axis key used for plotting.
    pub x: f64,
    /// The raw time value (the position when the field was missing).
    pub raw: TimeValue,
    /// Zero-based position in the input.
    pub index: usize,
}

/// Compute the axis key for a raw time value at `index`.
///
/// Dates map to epoch milliseconds, numbers to themselves and date strings
/// to their parsed epoch. Everything else, and any non-finite result,
/// falls back to the position.
pub fn axis_key(raw: Option<&TimeValue>, index: usize) -> f64 {
    numeric_key(raw).unwrap_or(index as f64)
}

fn numeric_key(raw: Option<&TimeValue>) -> Option<f64> {
    let numeric = match raw? {
        TimeValue::Date(dt) => dt.timestamp_millis() as f64,
        TimeValue::Number(n) => *n,
        TimeValue::Text(s) => parse_date(s)?.timestamp_millis() as f64,
    };

    numeric.is_finite().then_some(numeric)
}

#[derive(Debug, Clone, PartialEq)]
struct AxisEntry {
    raw: TimeValue,
    position: usize,
}

/// Reverse lookup from axis key to the raw time value.
///
/// When several records share a key, the raw value of the last one wins
/// while the position of the first one is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisIndex {
    entries: HashMap<u64, AxisEntry>,
}

impl AxisIndex {
    fn insert(&mut self, x: f64, raw: TimeValue, position: usize) {
        self.entries
            .entry(key_bits(x))
            .and_modify(|entry| entry.raw = raw.clone())
            .or_insert(AxisEntry { raw, position });
    }

    /// Raw time value for an axis key.
    pub fn raw(&self, x: f64) -> Option<&TimeValue> {
        self.entries.get(&key_bits(x)).map(|e| &e.raw)
    }

    /// Position of the first record with this axis key.
    pub fn position(&self, x: f64) -> Option<usize> {
        self.entries.get(&key_bits(x)).map(|e| e.position)
    }

    /// Number of distinct axis keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hash key for an f64, folding -0.0 onto 0.0.
fn key_bits(x: f64) -> u64 {
    if x == 0.0 { 0f64.to_bits() } else { x.to_bits() }
}

/// Normalized records plus their reverse index.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<R> {
    data: Vec<NormalizedDatum<R>>,
    index: AxisIndex,
}

impl<R> Default for Normalized<R> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            index: AxisIndex::default(),
        }
    }
}

impl<R> Normalized<R> {
    /// Normalized records, in input order.
    pub fn data(&self) -> &[NormalizedDatum<R>] {
        &self.data
    }

    /// Reverse index from axis key to raw value.
    pub fn index(&self) -> &AxisIndex {
        &self.index
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Give the records back, dropping the derived keys.
    pub fn into_records(self) -> Vec<R> {
        self.data.into_iter().map(|d| d.record).collect()
    }
}

/// Normalize records against `time_key`.
///
/// Produces exactly one entry per record, in the same order. Bad or
/// missing time values never fail; they fall back to the record position.
pub fn normalize<R: Record>(records: Vec<R>, time_key: &str) -> Normalized<R> {
    let mut index = AxisIndex::default();
    let mut fallbacks = 0usize;

    let data: Vec<_> = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let value = record.time_value(time_key);
            let x = numeric_key(value.as_ref()).unwrap_or_else(|| {
                fallbacks += 1;
                i as f64
            });
            let raw = value.unwrap_or(TimeValue::Number(i as f64));
            index.insert(x, raw.clone(), i);
            NormalizedDatum {
                record,
                x,
                raw,
                index: i,
            }
        })
        .collect();

    if fallbacks > 0 {
        tracing::debug!(
            time_key,
            fallbacks,
            "Records without a usable time value use their position"
        );
    }

    Normalized { data, index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::Datum;
    use chrono::{TimeZone, Utc};

    fn keys(normalized: &Normalized<Datum>) -> Vec<f64> {
        normalized.data().iter().map(|d| d.x).collect()
    }

    #[test]
    fn test_axis_key_variants() {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(
            axis_key(Some(&TimeValue::Date(date)), 3),
            1_735_689_600_000.0
        );
        assert_eq!(axis_key(Some(&TimeValue::Number(42.0)), 3), 42.0);
        assert_eq!(
            axis_key(Some(&TimeValue::Text("2025-01-01T00:00:00Z".into())), 3),
            1_735_689_600_000.0
        );
        assert_eq!(axis_key(Some(&TimeValue::Text("garbage".into())), 3), 3.0);
        assert_eq!(axis_key(Some(&TimeValue::Number(f64::NAN)), 3), 3.0);
        assert_eq!(axis_key(Some(&TimeValue::Number(f64::INFINITY)), 3), 3.0);
        assert_eq!(axis_key(None, 7), 7.0);
    }

    #[test]
    fn test_one_output_per_input_in_order() {
        let records = vec![
            Datum::new().with("time", "2025-01-08").with("v", 2.0),
            Datum::new().with("time", "2025-01-01").with("v", 1.0),
            Datum::new().with("v", 3.0),
        ];

        let normalized = normalize(records, "time");
        assert_eq!(normalized.len(), 3);

        let values: Vec<_> = normalized
            .data()
            .iter()
            .map(|d| d.record.numeric("v"))
            .collect();
        assert_eq!(values, vec![Some(2.0), Some(1.0), Some(3.0)]);

        let positions: Vec<_> = normalized.data().iter().map(|d| d.index).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_or_unparsable_time_uses_position() {
        let records = vec![
            Datum::new().with("time", "Page A"),
            Datum::new(),
            Datum::new().with("time", None::<f64>),
            Datum::new().with("time", "not a date"),
        ];

        let normalized = normalize(records, "time");
        assert_eq!(keys(&normalized), vec![0.0, 1.0, 2.0, 3.0]);

        // Missing values keep the position as raw value; strings stay as-is.
        assert_eq!(normalized.data()[0].raw, TimeValue::Text("Page A".into()));
        assert_eq!(normalized.data()[1].raw, TimeValue::Number(1.0));
    }

    #[test]
    fn test_identical_times_are_stable() {
        let records = vec![
            Datum::new().with("time", "2025-01-01").with("v", 1.0),
            Datum::new().with("time", "2025-01-01T00:00:00Z").with("v", 2.0),
            Datum::new().with("time", 1_735_689_600_000i64).with("v", 3.0),
        ];

        let normalized = normalize(records, "time");
        assert!(keys(&normalized).iter().all(|&x| x == 1_735_689_600_000.0));

        let order: Vec<_> = normalized
            .data()
            .iter()
            .map(|d| d.record.numeric("v").unwrap())
            .collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_reverse_index() {
        let records = vec![
            Datum::new().with("time", "2025-01-01"),
            Datum::new().with("time", "2025-01-01T00:00:00Z"),
            Datum::new().with("time", "Page C"),
        ];

        let normalized = normalize(records, "time");
        let index = normalized.index();
        let key = 1_735_689_600_000.0;

        assert_eq!(index.len(), 2);
        // Last raw value wins, first position is kept.
        assert_eq!(
            index.raw(key),
            Some(&TimeValue::Text("2025-01-01T00:00:00Z".into()))
        );
        assert_eq!(index.position(key), Some(0));
        assert_eq!(index.raw(2.0), Some(&TimeValue::Text("Page C".into())));
        assert_eq!(index.raw(99.0), None);
    }

    #[test]
    fn test_custom_time_key_and_round_trip() {
        let records = vec![
            Datum::new().with("date", 10.0),
            Datum::new().with("date", 20.0),
        ];

        let normalized = normalize(records.clone(), "date");
        assert_eq!(keys(&normalized), vec![10.0, 20.0]);
        assert_eq!(normalized.into_records(), records);
    }

    #[test]
    fn test_negative_zero_key() {
        let records = vec![Datum::new().with("time", -0.0)];
        let normalized = normalize(records, "time");
        assert!(normalized.index().raw(0.0).is_some());
    }
}
