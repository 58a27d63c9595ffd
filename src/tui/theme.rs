//! Colour palette shared by every control.

use ratatui::style::{Color, Modifier, Style};

/// Icon/border colour for a focused or filled field.
pub const HIGHLIGHT_COLOR: Color = Color::Rgb(0xF1, 0x90, 0x00);

/// Icon colour for an idle field, and placeholder text colour.
pub const MUTED_COLOR: Color = Color::Rgb(0x66, 0x63, 0x60);

/// Border colour of a field carrying a validation error.
pub const ERROR_COLOR: Color = Color::Rgb(0xC5, 0x30, 0x30);

/// Colours used when rendering fields and buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub highlight: Color,
    pub muted: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            highlight: HIGHLIGHT_COLOR,
            muted: MUTED_COLOR,
            error: ERROR_COLOR,
        }
    }
}

impl Theme {
    /// Style for text that should stand out (focused labels, active button)
    pub fn accent(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for secondary text (placeholders, hints)
    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
