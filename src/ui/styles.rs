use ratatui::style::{Color, Modifier, Style};

/// Accent color used for headers, highlights, and status badges.
pub const ACCENT: Color = Color::Cyan;

pub fn header_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn hint_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

/// Green for gains, red for losses; keyed off the percent-change sign.
pub fn change_style(change_percent: f64) -> Style {
    if change_percent < 0.0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    }
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn success_style() -> Style {
    Style::default().fg(Color::Green)
}
