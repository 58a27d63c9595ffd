//! One-at-a-time popup messages shown over any screen.

use ratatui::{layout::Rect, Frame};

use crate::tui::widgets::{DialogType, ModalDialog};

/// The popup currently waiting to be dismissed, if any
///
/// Setting a new message replaces the previous one regardless of kind.
///
/// # Example
/// ```
/// use fieldkit::tui::state::MessageDisplay;
///
/// let mut messages = MessageDisplay::default();
/// messages.set_error("Could not create the account");
/// assert!(messages.has_message());
/// messages.clear();
/// assert!(!messages.has_message());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MessageDisplay {
    current: Option<(DialogType, String)>,
}

impl MessageDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.current = Some((DialogType::Error, msg.into()));
    }

    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.current = Some((DialogType::Success, msg.into()));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn has_message(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<(DialogType, &str)> {
        self.current
            .as_ref()
            .map(|(kind, msg)| (*kind, msg.as_str()))
    }

    /// Render the message centred over `area`; nothing when empty
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let dialog = match &self.current {
            Some((DialogType::Error, msg)) => ModalDialog::error(msg.clone()),
            Some((DialogType::Success, msg)) => ModalDialog::success(msg.clone()),
            None => return,
        };
        dialog.render(frame, area);
    }
}
