//! Neon-on-charcoal palette and the styles built from it.
//!
//! - **Accent**: electric cyan (focus, highlights)
//! - **Positive**: neon green (gains)
//! - **Negative**: hot pink (losses, errors)
//! - **Warning**: neon orange (synthetic data, skipped tickers)
//! - **Neutral**: cool purple (secondary info)
//! - **Muted**: steel blue (hints, labels)

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

/// Line colors for chart series, cycled by index.
const SERIES: [Color; 6] = [ACCENT, POSITIVE, WARNING, NEUTRAL, NEGATIVE, Color::Rgb(255, 255, 102)];

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Green for growth, pink for loss.
pub fn change(value: f64) -> Style {
    if value >= 0.0 {
        positive()
    } else {
        negative()
    }
}

pub fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}
