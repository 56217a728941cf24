//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme.  Change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── list ───────────────────────────────────────────────────
    pub fn title_style() -> Style {
        Style::default()
    }

    pub fn link_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn ellipsis_style() -> Style {
        Style::default().add_modifier(Modifier::DIM)
    }

    pub fn link_ellipsis_style() -> Style {
        Self::link_style().add_modifier(Modifier::DIM)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default()
    }

    pub fn header_style() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn warning_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn info_style() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn error_style() -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }
}
