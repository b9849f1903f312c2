//! TUI theme and styles

use ratatui::style::{Color, Modifier, Style};

use crate::core::notification::Severity;

/// Application color theme
pub struct Theme;

impl Theme {
    /// Primary accent color
    pub const PRIMARY: Color = Color::Cyan;

    /// Focused field color
    pub const FOCUS: Color = Color::Yellow;

    /// Success color
    pub const SUCCESS: Color = Color::Green;

    /// Error color
    pub const ERROR: Color = Color::Red;

    /// Info color
    pub const INFO: Color = Color::Blue;

    /// Muted text color
    pub const MUTED: Color = Color::DarkGray;

    /// Header style
    pub fn header() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().bg(Color::DarkGray)
    }

    /// Border of the focused field
    pub fn focused() -> Style {
        Style::default().fg(Self::FOCUS)
    }

    /// Border of a field with a validation error
    pub fn invalid() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Inline validation message
    pub fn error_text() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Active button
    pub fn button_active() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Normal text style
    pub fn normal() -> Style {
        Style::default()
    }

    /// Muted text style
    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED)
    }

    /// Accent color for a notification
    pub fn severity(severity: Severity) -> Color {
        match severity {
            Severity::Info => Self::INFO,
            Severity::Success => Self::SUCCESS,
            Severity::Error => Self::ERROR,
        }
    }
}
