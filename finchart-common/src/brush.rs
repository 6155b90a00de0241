//! Brush: an inclusive index window over the chart data.

/// Inclusive `[start, end]` window of record positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushRange {
    start: usize,
    end: usize,
}

/// Which part of the brush a drag holds.
///
/// Captured when the drag starts; every move of the same drag is applied
/// against it, so a traveller pulled past the other keeps that one fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushHandle {
    /// A traveller; `fixed` is the position of the one not being dragged.
    Traveller { fixed: usize },
    /// The selection body, grabbed at `anchor` with the window at `origin`.
    Window { anchor: usize, origin: BrushRange },
}

impl BrushHandle {
    /// Grab the left traveller of `brush`.
    pub fn start_of(brush: BrushRange) -> Self {
        BrushHandle::Traveller { fixed: brush.end }
    }

    /// Grab the right traveller of `brush`.
    pub fn end_of(brush: BrushRange) -> Self {
        BrushHandle::Traveller { fixed: brush.start }
    }
}

impl BrushRange {
    /// The whole data range, or `None` without data.
    pub fn full(len: usize) -> Option<Self> {
        (len > 0).then(|| Self {
            start: 0,
            end: len - 1,
        })
    }

    /// A window clamped to `len` records, with its bounds ordered.
    pub fn new(start: usize, end: usize, len: usize) -> Option<Self> {
        let last = len.checked_sub(1)?;
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Some(Self {
            start: start.min(last),
            end: end.min(last),
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of records in the window.
    pub fn count(&self) -> usize {
        self.end - self.start + 1
    }

    /// Whether a position is inside the window.
    pub fn contains(&self, position: usize) -> bool {
        (self.start..=self.end).contains(&position)
    }

    /// Whether the window spans all `len` records.
    pub fn is_full(&self, len: usize) -> bool {
        self.start == 0 && self.end + 1 == len
    }

    /// Apply a drag of `handle` to `position`.
    pub fn drag(&self, handle: BrushHandle, position: usize, len: usize) -> Option<Self> {
        match handle {
            BrushHandle::Traveller { fixed } => Self::new(position, fixed, len),
            BrushHandle::Window { anchor, origin } => {
                let last = len.checked_sub(1)?;
                let span = origin.end - origin.start;
                let delta = position as isize - anchor as isize;
                let max_start = last.saturating_sub(span) as isize;
                let start = (origin.start as isize + delta).clamp(0, max_start) as usize;
                Self::new(start, start + span, len)
            }
        }
    }
}

/// Record position under a fraction (0..=1) of the brush track.
pub fn position_at(fraction: f32, len: usize) -> usize {
    match len {
        0 | 1 => 0,
        _ => {
            let last = len - 1;
            ((fraction.clamp(0.0, 1.0) * last as f32).round() as usize).min(last)
        }
    }
}

/// Fraction of the brush track where a record position sits.
pub fn fraction_of(position: usize, len: usize) -> f32 {
    if len <= 1 {
        0.0
    } else {
        position.min(len - 1) as f32 / (len - 1) as f32
    }
}
