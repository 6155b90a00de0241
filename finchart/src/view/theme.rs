//! Theme-aware color palette for FinChart.
//!
//! This module provides semantic colors that automatically adapt to the current theme.
//! Use these instead of hardcoded Color::from_rgb() values.

use iced::{Color, Theme};

use finchart_common::{SeriesColor, ThemeMode};

const fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color { r, g, b, a: 1.0 }
}

/// Series palette for dark themes (slots 1..=5).
const DARK_PALETTE: [Color; 5] = [
    rgb(0.08, 0.28, 0.90),
    rgb(0.0, 0.74, 0.49),
    rgb(1.0, 0.60, 0.0),
    rgb(0.68, 0.27, 1.0),
    rgb(1.0, 0.13, 0.34),
];

/// Series palette for light themes (slots 1..=5).
const LIGHT_PALETTE: [Color; 5] = [
    rgb(0.96, 0.29, 0.0),
    rgb(0.0, 0.59, 0.54),
    rgb(0.06, 0.31, 0.39),
    rgb(1.0, 0.73, 0.0),
    rgb(1.0, 0.60, 0.0),
];

/// Map the configured theme mode to an iced theme.
pub fn iced_theme(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::Dark,
        ThemeMode::Light => Theme::Light,
    }
}

/// Get colors from the theme's extended palette.
/// This provides theme-aware colors for consistent light/dark mode support.
pub struct ThemeColors<'a> {
    theme: &'a Theme,
}

impl<'a> ThemeColors<'a> {
    /// Create a new ThemeColors from a theme reference.
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Get the extended palette from the theme.
    fn palette(&self) -> &iced::theme::palette::Extended {
        self.theme.extended_palette()
    }

    // ========================================================================
    // Text Colors
    // ========================================================================

    /// Primary text color.
    pub fn text(&self) -> Color {
        self.palette().background.base.text
    }

    /// Muted/secondary text color.
    pub fn text_muted(&self) -> Color {
        self.palette().background.weak.text
    }

    // ========================================================================
    // Border Colors
    // ========================================================================

    /// Default border color.
    pub fn border(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.25, 0.25, 0.3)
        } else {
            Color::from_rgb(0.8, 0.8, 0.82)
        }
    }

    // ========================================================================
    // Chart Colors
    // ========================================================================

    /// Chart plot area background.
    pub fn chart_background(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.08, 0.08, 0.1)
        } else {
            Color::from_rgb(0.98, 0.98, 0.99)
        }
    }

    /// Chart grid lines.
    pub fn chart_grid(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.2, 0.2, 0.25)
        } else {
            Color::from_rgb(0.85, 0.85, 0.88)
        }
    }

    /// Chart axis labels.
    pub fn chart_label(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.5, 0.5, 0.5)
        } else {
            Color::from_rgb(0.4, 0.4, 0.4)
        }
    }

    /// Chart tooltip background.
    pub fn chart_tooltip_background(&self) -> Color {
        if self.is_dark() {
            Color::from_rgba(0.0, 0.0, 0.0, 0.85)
        } else {
            Color::from_rgba(1.0, 1.0, 1.0, 0.95)
        }
    }

    /// Brush track fill.
    pub fn brush_track(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.14, 0.14, 0.17)
        } else {
            Color::from_rgb(0.93, 0.93, 0.95)
        }
    }

    /// Brush selection fill.
    pub fn brush_selection(&self) -> Color {
        if self.is_dark() {
            Color::from_rgba(0.5, 0.5, 0.6, 0.25)
        } else {
            Color::from_rgba(0.3, 0.3, 0.4, 0.15)
        }
    }

    /// Color of a series: palette slot or fixed RGB.
    pub fn series(&self, color: SeriesColor) -> Color {
        series_color(color, self.is_dark())
    }

    // ========================================================================
    // Card Colors
    // ========================================================================

    /// Card background color.
    pub fn card_background(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.12, 0.12, 0.14)
        } else {
            Color::from_rgb(1.0, 1.0, 1.0)
        }
    }

    // ========================================================================
    // Utility
    // ========================================================================

    /// Check if the current theme is dark.
    pub fn is_dark(&self) -> bool {
        self.palette().is_dark
    }
}

/// Resolve a series color against the dark or light palette.
pub fn series_color(color: SeriesColor, dark: bool) -> Color {
    match color {
        SeriesColor::Palette(slot) => {
            let palette = if dark { &DARK_PALETTE } else { &LIGHT_PALETTE };
            let index = (slot.max(1) as usize - 1).min(palette.len() - 1);
            palette[index]
        }
        SeriesColor::Rgb(r, g, b) => Color::from_rgb8(r, g, b),
    }
}

/// Convenience function to create ThemeColors.
pub fn colors(theme: &Theme) -> ThemeColors<'_> {
    ThemeColors::new(theme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_slots() {
        assert_eq!(series_color(SeriesColor::Palette(1), true), DARK_PALETTE[0]);
        assert_eq!(series_color(SeriesColor::Palette(2), false), LIGHT_PALETTE[1]);
        // Out-of-range slots clamp to the palette.
        assert_eq!(series_color(SeriesColor::Palette(0), true), DARK_PALETTE[0]);
        assert_eq!(series_color(SeriesColor::Palette(9), true), DARK_PALETTE[4]);
    }

    #[test]
    fn test_fixed_color() {
        let color = series_color(SeriesColor::Rgb(0x88, 0x84, 0xd8), true);
        assert_eq!(color, Color::from_rgb8(0x88, 0x84, 0xd8));
    }

    #[test]
    fn test_theme_mode() {
        assert!(colors(&iced_theme(ThemeMode::Dark)).is_dark());
        assert!(!colors(&iced_theme(ThemeMode::Light)).is_dark());
    }
}
