//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

use crate::cells::Chemistry;
use crate::tasks::TaskStatus;

/// Line colors cycled across cells in the voltage chart.
pub const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Blue,
    Color::LightRed,
];
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Footer message color.
pub const MESSAGE_FG: Color = Color::LightBlue;
/// Table header row color.
pub const TABLE_HEADER_FG: Color = Color::Gray;

/// Returns a color for a cell chemistry.
pub fn chemistry_color(chemistry: Chemistry) -> Color {
    match chemistry {
        Chemistry::Lfp => Color::Cyan,
        Chemistry::Nmc => Color::Yellow,
    }
}

/// Returns a color for a task status.
pub fn task_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Gray,
        TaskStatus::Running => Color::Yellow,
        TaskStatus::Completed => Color::Green,
    }
}

/// Computes Y-axis bounds over every series with 10% padding.
pub fn auto_bounds_y(series: &[Vec<(f64, f64)>]) -> [f64; 2] {
    let all = series.iter().flatten().map(|&(_, y)| y);
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [2.5, 4.5];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
