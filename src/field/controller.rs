use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use super::binding::{FieldBinding, FieldRegistration, ValueCell, VALUE_PATH};
use super::element::{empty_slot, with_element, ElementSlot, InputElement, InputEvent};
use super::handle::FieldHandle;
use super::icon::FieldIcon;
use super::state::FieldPhase;
use crate::error::FieldError;
use crate::form::{FormScope, ScopeId};
use crate::tui::theme::Theme;
use crate::tui::widgets::TextInput;

/// Pass-through configuration for the underlying text input
#[derive(Debug, Clone, Default)]
struct InputProps {
    placeholder: String,
    masked: bool,
    max_length: Option<usize>,
    filter: Option<fn(char) -> bool>,

    /// Overrides the default value the form scope supplies
    default_value: Option<String>,
}

/// A styled text field that tracks focus/filled state and registers itself
/// with a [`FormScope`].
///
/// `is_filled` is only recomputed on blur: typing into a focused field
/// updates the value cell but not the filled flag.
pub struct FieldController {
    name: String,
    icon: FieldIcon,
    props: InputProps,
    value: ValueCell,
    element: ElementSlot,
    is_focused: bool,
    is_filled: bool,
    error: Option<String>,

    /// Scope and name this field is currently registered under
    registration: Option<(ScopeId, String)>,
}

impl std::fmt::Debug for FieldController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldController")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("value", &self.value.get())
            .field("is_focused", &self.is_focused)
            .field("is_filled", &self.is_filled)
            .field("error", &self.error)
            .finish()
    }
}

impl FieldController {
    pub fn new(name: impl Into<String>, icon: impl Into<FieldIcon>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            props: InputProps::default(),
            value: ValueCell::default(),
            element: empty_slot(),
            is_focused: false,
            is_filled: false,
            error: None,
            registration: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.props.placeholder = placeholder.into();
        self
    }

    pub fn masked(mut self) -> Self {
        self.props.masked = true;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.props.max_length = Some(max_length);
        self
    }

    pub fn with_filter(mut self, filter: fn(char) -> bool) -> Self {
        self.props.filter = Some(filter);
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.props.default_value = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &FieldIcon {
        &self.icon
    }

    pub fn value(&self) -> String {
        self.value.get()
    }

    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub fn is_filled(&self) -> bool {
        self.is_filled
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> FieldPhase {
        FieldPhase::from_flags(self.is_focused, self.is_filled)
    }

    pub fn is_mounted(&self) -> bool {
        with_element(&self.element, &self.name, |_| ()).is_ok()
    }

    /// The imperative handle parents use to move focus here
    pub fn handle(&self) -> FieldHandle {
        FieldHandle::new(self.name.clone(), self.element.clone())
    }

    /// Create the input element, seed it from the scope's default value and
    /// register with the scope.
    pub fn mount(&mut self, scope: &mut FormScope) -> Result<(), FieldError> {
        if self.name.trim().is_empty() {
            return Err(FieldError::EmptyName);
        }

        let context = scope.use_field(&self.name);
        let default_value = self
            .props
            .default_value
            .clone()
            .unwrap_or(context.default_value);

        let mut input = TextInput::new()
            .with_placeholder(self.props.placeholder.clone())
            .masked(self.props.masked);
        if let Some(max) = self.props.max_length {
            input = input.with_max_length(max);
        }
        if let Some(filter) = self.props.filter {
            input = input.with_filter(filter);
        }
        // The element applies its filter and length limit to the default
        let input = input.with_value(default_value);
        let initial = input.text().to_string();

        *self.element.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
            Some(Box::new(input));
        self.is_focused = false;
        self.is_filled = !initial.is_empty();
        self.value.set(initial);
        self.error = context.error;
        self.registration = None;

        if let Err(err) = self.sync_registration(scope) {
            self.element
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .take();
            return Err(err);
        }
        debug!(field = %self.name, filled = self.is_filled, "field mounted");
        Ok(())
    }

    /// Register with `scope` if the field's name or the scope changed since
    /// the last registration. A stale name in the same scope is dropped.
    pub fn sync_registration(&mut self, scope: &mut FormScope) -> Result<(), FieldError> {
        let key = (scope.id(), self.name.clone());
        if self.registration.as_ref() == Some(&key) {
            return Ok(());
        }
        if let Some((old_scope, old_name)) = self.registration.take() {
            if old_scope == scope.id() && old_name != self.name {
                scope.unregister_field(&old_name);
            }
        }
        scope.register_field(self.registration_descriptor())?;
        debug!(field = %self.name, scope = %scope.id(), "field registered");
        self.registration = Some(key);
        Ok(())
    }

    /// Change the field's name; re-registers under the new name. If the new
    /// name conflicts with another field the old name is kept and registered.
    pub fn rename(&mut self, name: impl Into<String>, scope: &mut FormScope) -> Result<(), FieldError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FieldError::EmptyName);
        }
        let previous = std::mem::replace(&mut self.name, name);
        if self.is_mounted() {
            if let Err(err) = self.sync_registration(scope) {
                self.name = previous;
                self.sync_registration(scope)?;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Unregister from the scope and drop the input element
    pub fn unmount(&mut self, scope: &mut FormScope) {
        if let Some((scope_id, name)) = self.registration.take() {
            if scope_id == scope.id() {
                scope.unregister_field(&name);
            }
        }
        self.element
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        self.is_focused = false;
        debug!(field = %self.name, "field unmounted");
    }

    fn registration_descriptor(&self) -> FieldRegistration {
        FieldRegistration {
            name: self.name.clone(),
            path: VALUE_PATH,
            binding: FieldBinding::new(self.name.clone(), self.value.clone(), self.element.clone()),
        }
    }

    /// Apply one event reported by the element
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Focus => {
                self.is_focused = true;
                debug!(field = %self.name, "focus");
            }
            InputEvent::Blur => {
                self.is_focused = false;
                self.is_filled = !self.value.is_empty();
                debug!(field = %self.name, filled = self.is_filled, "blur");
            }
            InputEvent::Change(text) => {
                self.value.set(text);
            }
        }
    }

    /// Drain and apply all pending element events. A no-op when unmounted.
    pub fn process_events(&mut self) {
        let events = with_element(&self.element, &self.name, |element| element.take_events())
            .unwrap_or_default();
        for event in events {
            self.handle_event(event);
        }
    }

    /// Forward a key press to the element, then apply the resulting events.
    ///
    /// Returns true if the element consumed the key.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool, FieldError> {
        let consumed = with_element(&self.element, &self.name, |element| element.handle_key(key))?;
        self.process_events();
        Ok(consumed)
    }

    /// Re-read this field's validation error from the scope
    pub fn refresh_error(&mut self, scope: &FormScope) {
        self.error = scope.error(&self.name).map(str::to_string);
    }

    pub fn icon_color(&self, theme: &Theme) -> Color {
        if self.is_focused || self.is_filled {
            theme.highlight
        } else {
            theme.muted
        }
    }

    pub fn border_color(&self, theme: &Theme) -> Color {
        if self.error.is_some() {
            theme.error
        } else if self.is_focused {
            theme.highlight
        } else {
            theme.muted
        }
    }

    /// Rows needed to render: the bordered box plus one line for an error
    pub fn height(&self) -> u16 {
        if self.error.is_some() {
            4
        } else {
            3
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        // A clipped area keeps the box and loses the error line first
        let boxed = Rect {
            height: area.height.min(3),
            ..area
        };
        let message = if self.error.is_some() && area.height > 3 {
            Rect {
                y: area.y + 3,
                height: 1,
                ..area
            }
        } else {
            Rect::default()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color(theme)));
        let inner = block.inner(boxed);
        frame.render_widget(block, boxed);

        let row = Layout::horizontal([Constraint::Length(3), Constraint::Min(0)]).split(inner);
        let icon = Paragraph::new(Span::styled(
            self.icon.glyph(),
            Style::default().fg(self.icon_color(theme)),
        ));
        frame.render_widget(icon, row[0]);

        let guard = self
            .element
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(element) = guard.as_ref() {
            element.render(frame, row[1], Style::default(), theme.dim());
        }
        drop(guard);

        if let Some(err) = &self.error {
            let line = Line::from(Span::styled(err.clone(), Style::default().fg(theme.error)));
            frame.render_widget(Paragraph::new(line), message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use serde_json::json;

    fn type_text(field: &mut FieldController, text: &str) {
        for c in text.chars() {
            field.handle_key(KeyEvent::from(KeyCode::Char(c))).unwrap();
        }
    }

    fn mounted(name: &str, scope: &mut FormScope) -> FieldController {
        let mut field = FieldController::new(name, "mail").with_placeholder("E-mail");
        field.mount(scope).unwrap();
        field
    }

    #[test]
    fn test_empty_default_starts_blurred_empty() {
        let mut scope = FormScope::new();
        let field = mounted("email", &mut scope);
        assert_eq!(field.phase(), FieldPhase::BlurredEmpty);
        assert!(!field.is_filled());
    }

    #[test]
    fn test_scope_default_starts_blurred_filled() {
        let mut scope = FormScope::with_initial_data(json!({ "email": "a@b.com" }));
        let field = mounted("email", &mut scope);
        assert_eq!(field.phase(), FieldPhase::BlurredFilled);
        assert!(field.is_filled());
        assert_eq!(field.value(), "a@b.com");
    }

    #[test]
    fn test_prop_default_overrides_scope_default() {
        let mut scope = FormScope::with_initial_data(json!({ "email": "scope@x.com" }));
        let mut field = FieldController::new("email", "mail").with_default_value("prop@x.com");
        field.mount(&mut scope).unwrap();
        assert_eq!(field.value(), "prop@x.com");
    }

    #[test]
    fn test_filled_lags_until_blur() {
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        let handle = field.handle();

        handle.focus().unwrap();
        field.process_events();
        type_text(&mut field, "a@b.com");
        assert_eq!(field.value(), "a@b.com");
        assert!(!field.is_filled());
        assert_eq!(field.phase(), FieldPhase::Focused);

        handle.blur().unwrap();
        field.process_events();
        assert!(field.is_filled());
        assert_eq!(field.phase(), FieldPhase::BlurredFilled);
    }

    #[test]
    fn test_focus_then_blur_empty() {
        let mut scope = FormScope::new();
        let mut field = mounted("name", &mut scope);
        field.handle_event(InputEvent::Focus);
        field.handle_event(InputEvent::Blur);
        assert_eq!(field.phase(), FieldPhase::BlurredEmpty);
    }

    #[test]
    fn test_clearing_text_unfills_on_next_blur() {
        let mut scope = FormScope::with_initial_data(json!({ "name": "Ana" }));
        let mut field = mounted("name", &mut scope);
        field.handle_event(InputEvent::Focus);
        field.handle_event(InputEvent::Change(String::new()));
        assert!(field.is_filled());
        field.handle_event(InputEvent::Blur);
        assert!(!field.is_filled());
    }

    #[test]
    fn test_handle_focus_fires_focus_event() {
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        assert!(!field.is_focused());
        field.handle().focus().unwrap();
        field.process_events();
        assert!(field.is_focused());
    }

    #[test]
    fn test_handle_before_mount_is_not_mounted() {
        let field = FieldController::new("email", "mail");
        let err = field.handle().focus().unwrap_err();
        assert_eq!(
            err,
            FieldError::NotMounted {
                field: "email".to_string()
            }
        );
        assert!(!field.is_mounted());
    }

    #[test]
    fn test_key_before_mount_is_not_mounted() {
        let mut field = FieldController::new("email", "mail");
        assert!(field.handle_key(KeyEvent::from(KeyCode::Char('a'))).is_err());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut scope = FormScope::new();
        let mut field = FieldController::new("  ", "user");
        assert_eq!(field.mount(&mut scope), Err(FieldError::EmptyName));
    }

    #[test]
    fn test_typing_is_visible_to_scope() {
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        type_text(&mut field, "x@y.z");
        assert_eq!(scope.data()["email"], json!("x@y.z"));
    }

    #[test]
    fn test_scope_clear_resets_regardless_of_focus() {
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        field.handle().focus().unwrap();
        field.process_events();
        type_text(&mut field, "abc");

        scope.clear_field("email").unwrap();
        assert_eq!(field.value(), "");
        let guard = field.element.lock().unwrap();
        assert_eq!(guard.as_ref().unwrap().text(), "");
        drop(guard);
        // Focus is untouched by a programmatic clear
        assert!(field.is_focused());
    }

    #[test]
    fn test_scope_set_value_does_not_refill_before_blur() {
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        scope.set_field_value("email", "set@by.scope").unwrap();
        field.process_events();
        assert_eq!(field.value(), "set@by.scope");
        assert!(!field.is_filled());
    }

    #[test]
    fn test_rename_reregisters() {
        let mut scope = FormScope::new();
        let mut field = mounted("mail", &mut scope);
        field.rename("email", &mut scope).unwrap();
        assert!(scope.is_registered("email"));
        assert!(!scope.is_registered("mail"));
    }

    #[test]
    fn test_new_scope_triggers_registration() {
        let mut first = FormScope::new();
        let mut second = FormScope::new();
        let mut field = mounted("email", &mut first);
        field.sync_registration(&mut second).unwrap();
        assert!(first.is_registered("email"));
        assert!(second.is_registered("email"));
        assert_eq!(second.registration_count(), 1);

        // Same scope and name: nothing to do
        field.sync_registration(&mut second).unwrap();
        assert_eq!(second.registration_count(), 1);
    }

    #[test]
    fn test_rename_into_conflicting_path_keeps_old_name() {
        let mut scope = FormScope::new();
        let _address = mounted("address", &mut scope);
        let mut street = mounted("street", &mut scope);

        let err = street.rename("address.street", &mut scope).unwrap_err();
        assert!(matches!(err, FieldError::PathConflict { .. }));
        assert_eq!(street.name(), "street");
        assert!(scope.is_registered("street"));
        assert!(!scope.is_registered("address.street"));
    }

    #[test]
    fn test_default_value_respects_max_length() {
        let mut scope = FormScope::with_initial_data(json!({ "code": "123456" }));
        let mut field = FieldController::new("code", "lock").with_max_length(3);
        field.mount(&mut scope).unwrap();
        assert_eq!(field.value(), "123");
        assert_eq!(scope.field_value("code").unwrap(), "123");
    }

    #[test]
    fn test_unmount_unregisters_and_invalidates_handle() {
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        let handle = field.handle();
        field.unmount(&mut scope);
        assert!(!scope.is_registered("email"));
        assert!(handle.focus().is_err());
        assert!(!handle.is_mounted());
    }

    #[test]
    fn test_error_is_read_from_scope() {
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        scope.set_field_error("email", "E-mail is required");
        field.refresh_error(&scope);
        assert_eq!(field.error(), Some("E-mail is required"));
        assert_eq!(field.height(), 4);

        scope.clear_errors();
        field.refresh_error(&scope);
        assert_eq!(field.error(), None);
    }

    #[test]
    fn test_icon_color_follows_focus_or_filled() {
        let theme = Theme::default();
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        assert_eq!(field.icon_color(&theme), theme.muted);

        field.handle_event(InputEvent::Focus);
        assert_eq!(field.icon_color(&theme), theme.highlight);

        field.handle_event(InputEvent::Blur);
        assert_eq!(field.icon_color(&theme), theme.muted);
    }

    #[test]
    fn test_border_color_prefers_error() {
        let theme = Theme::default();
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        field.handle_event(InputEvent::Focus);
        assert_eq!(field.border_color(&theme), theme.highlight);

        scope.set_field_error("email", "bad");
        field.refresh_error(&scope);
        assert_eq!(field.border_color(&theme), theme.error);
    }

    #[test]
    fn test_email_scenario() {
        let theme = Theme::default();
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        let handle = field.handle();
        assert_eq!(field.icon_color(&theme), theme.muted);

        handle.focus().unwrap();
        field.process_events();
        type_text(&mut field, "a@b.com");
        // Still focused, so the icon is highlighted but the field is not "filled"
        assert!(!field.is_filled());

        handle.blur().unwrap();
        field.process_events();
        assert!(field.is_filled());
        assert_eq!(field.icon_color(&theme), theme.highlight);
    }

    #[test]
    fn test_render_shows_placeholder_and_error() {
        use ratatui::{backend::TestBackend, Terminal};

        let theme = Theme::default();
        let mut scope = FormScope::new();
        let mut field = mounted("email", &mut scope);
        scope.set_field_error("email", "Invalid e-mail");
        field.refresh_error(&scope);

        let mut terminal = Terminal::new(TestBackend::new(30, 4)).unwrap();
        terminal
            .draw(|frame| field.render(frame, frame.area(), &theme))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let rows: Vec<String> = (0..4)
            .map(|y| {
                (0..30)
                    .map(|x| buffer.content[y * 30 + x].symbol().to_string())
                    .collect()
            })
            .collect();
        assert!(rows[1].contains("E-mail"));
        assert!(rows[3].contains("Invalid e-mail"));
    }
}
