use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::theme::Theme;

/// A focusable push button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub is_focused: bool,
}

impl Button {
    pub const HEIGHT: u16 = 3;

    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_focused: false,
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    /// Returns true when the key presses the button (Enter or Space while focused)
    pub fn handle_key(&self, key: KeyEvent) -> bool {
        self.is_focused && matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (fill, text) = if self.is_focused {
            (
                Style::default().bg(theme.highlight),
                Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            )
        } else {
            (Style::default(), Style::default().fg(theme.highlight))
        };

        let widget = Paragraph::new(Span::styled(self.label.clone(), text))
            .alignment(Alignment::Center)
            .style(fill)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.highlight)),
            );
        frame.render_widget(widget, area);
    }
}
