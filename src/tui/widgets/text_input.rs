use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::field::{InputElement, InputEvent};

/// Terminal text-entry element driven by a field controller
///
/// This widget provides:
/// - Character-by-character editing with a cursor
/// - Optional character filter and maximum length
/// - Masked display for secrets
/// - Focus/blur/change events queued for the owning controller
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,

    /// Placeholder text shown when empty
    pub placeholder: String,

    /// Maximum allowed length in characters (None = unlimited)
    pub max_length: Option<usize>,

    /// Character filter; rejected characters are ignored
    pub filter: Option<fn(char) -> bool>,

    /// Show every character as a bullet
    pub masked: bool,

    /// Cursor position in characters (0-indexed)
    cursor_pos: usize,

    is_focused: bool,

    events: Vec<InputEvent>,
}

// Function pointers don't have meaningful equality, so the filter is skipped
impl PartialEq for TextInput {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.placeholder == other.placeholder
            && self.max_length == other.max_length
            && self.masked == other.masked
            && self.cursor_pos == other.cursor_pos
            && self.is_focused == other.is_focused
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInput {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            placeholder: String::new(),
            max_length: None,
            filter: None,
            masked: false,
            cursor_pos: 0,
            is_focused: false,
            events: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_filter(mut self, filter: fn(char) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    /// Set the initial value and park the cursor at its end. The filter and
    /// length limit apply, so set those first.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.replace_text(&value.into());
        self
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    /// Replace the text with the accepted characters of `text`, up to the
    /// length limit
    fn replace_text(&mut self, text: &str) {
        let limit = self.max_length.unwrap_or(usize::MAX);
        self.value = text.chars().filter(|&c| self.accepts(c)).take(limit).collect();
        self.cursor_pos = self.char_len();
    }

    fn accepts(&self, c: char) -> bool {
        self.filter.map_or(true, |filter| filter(c))
    }

    fn emit_change(&mut self) {
        self.events.push(InputEvent::Change(self.value.clone()));
    }

    /// Text as it should be displayed (masked or not)
    fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.char_len())
        } else {
            self.value.clone()
        }
    }
}

impl InputElement for TextInput {
    fn focus(&mut self) {
        if !self.is_focused {
            self.is_focused = true;
            self.events.push(InputEvent::Focus);
        }
    }

    fn blur(&mut self) {
        if self.is_focused {
            self.is_focused = false;
            self.events.push(InputEvent::Blur);
        }
    }

    fn is_focused(&self) -> bool {
        self.is_focused
    }

    fn set_text(&mut self, text: &str) {
        self.replace_text(text);
    }

    fn clear(&mut self) {
        self.value.clear();
        self.cursor_pos = 0;
    }

    fn text(&self) -> &str {
        &self.value
    }

    /// Returns true if the key was consumed. Only edits emit a change event.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) if self.accepts(c) => {
                if self.max_length.map_or(true, |max| self.char_len() < max) {
                    let idx = self.byte_index(self.cursor_pos);
                    self.value.insert(idx, c);
                    self.cursor_pos += 1;
                    self.emit_change();
                    true
                } else {
                    false
                }
            }
            KeyCode::Backspace if self.cursor_pos > 0 => {
                let idx = self.byte_index(self.cursor_pos - 1);
                self.value.remove(idx);
                self.cursor_pos -= 1;
                self.emit_change();
                true
            }
            KeyCode::Delete if self.cursor_pos < self.char_len() => {
                let idx = self.byte_index(self.cursor_pos);
                self.value.remove(idx);
                self.emit_change();
                true
            }
            KeyCode::Left if self.cursor_pos > 0 => {
                self.cursor_pos -= 1;
                true
            }
            KeyCode::Right if self.cursor_pos < self.char_len() => {
                self.cursor_pos += 1;
                true
            }
            KeyCode::Home if self.cursor_pos > 0 => {
                self.cursor_pos = 0;
                true
            }
            KeyCode::End if self.cursor_pos < self.char_len() => {
                self.cursor_pos = self.char_len();
                true
            }
            _ => false,
        }
    }

    fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    fn render(&self, frame: &mut Frame, area: Rect, text_style: Style, placeholder_style: Style) {
        let line = if self.value.is_empty() && !self.is_focused {
            Line::from(Span::styled(self.placeholder.clone(), placeholder_style))
        } else if self.is_focused {
            let display = self.display_value();
            let split = display
                .char_indices()
                .nth(self.cursor_pos)
                .map(|(idx, _)| idx)
                .unwrap_or(display.len());
            let (before, after) = display.split_at(split);
            Line::from(vec![
                Span::styled(before.to_string(), text_style),
                Span::styled("█", text_style),
                Span::styled(after.to_string(), text_style),
            ])
        } else {
            Line::from(Span::styled(self.display_value(), text_style))
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

// Predefined filters

/// Accepts characters that can appear in an e-mail address
pub fn email_filter(c: char) -> bool {
    c.is_alphanumeric() || "@._-+".contains(c)
}

/// Accepts anything printable except whitespace
pub fn no_whitespace_filter(c: char) -> bool {
    !c.is_whitespace() && !c.is_control()
}
