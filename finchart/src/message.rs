use crate::app::Page;

/// Messages for the FinChart application.
///
/// Chart messages always apply to the chart on the current page.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// User switched dashboard page.
    SelectPage(Page),

    /// User clicked a series button in the chart header.
    ToggleSeries(String),

    /// User dragged the brush to a new window (inclusive record positions).
    BrushChanged { start: usize, end: usize },

    /// User right-clicked the brush to show the full range again.
    ResetBrush,
}
