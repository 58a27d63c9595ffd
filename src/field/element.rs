//! The visual host seam: what a field controller needs from the widget that
//! actually draws and edits text.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, style::Style, Frame};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::FieldError;

/// Events an input element reports back to its controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The element gained input focus
    Focus,

    /// The element lost input focus
    Blur,

    /// The user edited the text; carries the full new text
    Change(String),
}

/// A text-entry widget that can be driven by a field controller.
///
/// Programmatic updates (`set_text`, `clear`) never emit `Change`; only
/// user edits through `handle_key` do. `focus`/`blur` emit an event only when
/// the focus state actually changes.
pub trait InputElement: Send {
    fn focus(&mut self);

    fn blur(&mut self);

    fn is_focused(&self) -> bool;

    /// Replace the displayed text without emitting a change event
    fn set_text(&mut self, text: &str);

    /// Empty the displayed text without emitting a change event
    fn clear(&mut self);

    fn text(&self) -> &str;

    /// Apply a key press. Returns true if the element consumed it.
    fn handle_key(&mut self, key: KeyEvent) -> bool;

    /// Drain the events emitted since the last call
    fn take_events(&mut self) -> Vec<InputEvent>;

    fn render(&self, frame: &mut Frame, area: Rect, text_style: Style, placeholder_style: Style);
}

/// Shared slot holding a field's element. `None` before mount and after unmount.
pub(crate) type ElementSlot = Arc<Mutex<Option<Box<dyn InputElement>>>>;

pub(crate) fn empty_slot() -> ElementSlot {
    Arc::new(Mutex::new(None))
}

/// Run `f` against the mounted element, or fail with `NotMounted`.
pub(crate) fn with_element<R>(
    slot: &ElementSlot,
    field: &str,
    f: impl FnOnce(&mut dyn InputElement) -> R,
) -> Result<R, FieldError> {
    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    match guard.as_mut() {
        Some(element) => Ok(f(element.as_mut())),
        None => Err(FieldError::NotMounted {
            field: field.to_string(),
        }),
    }
}
