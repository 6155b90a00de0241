//! Per-series visibility flags.

use crate::series::ResolvedSeries;

/// Which series are currently shown.
///
/// Every resolved series starts visible. Only [`toggle`](Self::toggle)
/// changes a flag; a different series list resets the state through
/// [`sync`](Self::sync).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityState {
    flags: Vec<(String, bool)>,
}

impl VisibilityState {
    /// All series visible.
    pub fn new(series: &[ResolvedSeries]) -> Self {
        Self {
            flags: series.iter().map(|s| (s.key.clone(), true)).collect(),
        }
    }

    /// Flip one series. Returns the new flag, or `None` for an unknown key.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let (_, visible) = self.flags.iter_mut().find(|(k, _)| k == key)?;
        *visible = !*visible;
        Some(*visible)
    }

    /// Whether a series is shown. Unknown keys count as visible.
    pub fn is_visible(&self, key: &str) -> bool {
        self.flags
            .iter()
            .find(|(k, _)| k == key)
            .is_none_or(|(_, visible)| *visible)
    }

    /// Reset to all-visible if the series keys differ from the tracked ones.
    ///
    /// Returns `true` when a reset happened.
    pub fn sync(&mut self, series: &[ResolvedSeries]) -> bool {
        let same = self.flags.len() == series.len()
            && self.flags.iter().zip(series).all(|((k, _), s)| *k == s.key);

        if !same {
            *self = Self::new(series);
        }
        !same
    }

    /// Tracked keys with their flags, in series order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of visible series.
    pub fn visible_count(&self) -> usize {
        self.flags.iter().filter(|(_, v)| *v).count()
    }
}
