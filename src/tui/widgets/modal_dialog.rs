use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::common::centered_rect;

/// A centred popup that overlays the current screen until a key is pressed
#[derive(Debug, Clone)]
pub struct ModalDialog {
    pub title: String,
    pub content: Vec<Line<'static>>,
    pub dialog_type: DialogType,

    /// Width as percentage of screen (1-100)
    pub width_percent: u16,

    /// Height as percentage of screen (1-100)
    pub height_percent: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogType {
    Error,
    Success,
}

impl DialogType {
    pub fn border_color(&self) -> Color {
        match self {
            Self::Error => Color::Red,
            Self::Success => Color::Green,
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Success => "Success",
        }
    }
}

impl ModalDialog {
    /// Dialog with the type's default title and a "press any key" footer
    pub fn new(dialog_type: DialogType, message: impl Into<String>) -> Self {
        Self {
            title: dialog_type.default_title().to_string(),
            content: vec![
                Line::from(""),
                Line::from(message.into()).alignment(Alignment::Center),
                Line::from(""),
                Line::from("[Press any key]").alignment(Alignment::Center),
            ],
            dialog_type,
            width_percent: 60,
            height_percent: 25,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DialogType::Error, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(DialogType::Success, message)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let modal_area = centered_rect(self.width_percent, self.height_percent, area);
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .title(self.title.clone())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .style(
                Style::default()
                    .fg(self.dialog_type.border_color())
                    .add_modifier(Modifier::BOLD),
            );

        let paragraph = Paragraph::new(self.content.clone())
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, modal_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_dialog() {
        let dialog = ModalDialog::error("Something went wrong");
        assert_eq!(dialog.title, "Error");
        assert_eq!(dialog.dialog_type, DialogType::Error);
        assert_eq!(dialog.content.len(), 4);
    }

    #[test]
    fn test_success_dialog() {
        let dialog = ModalDialog::success("Account created");
        assert_eq!(dialog.title, "Success");
        assert_eq!(dialog.dialog_type, DialogType::Success);
    }

    #[test]
    fn test_dialog_type_colors() {
        assert_eq!(DialogType::Error.border_color(), Color::Red);
        assert_eq!(DialogType::Success.border_color(), Color::Green);
    }
}
