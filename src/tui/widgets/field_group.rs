use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};
use serde_json::{Map, Value};
use tracing::warn;

use super::button::Button;
use super::scroll_view::ScrollView;
use crate::error::FieldError;
use crate::field::FieldController;
use crate::form::{FieldErrors, FormScope, ValidationSchema};
use crate::tui::state::FocusCycle;
use crate::tui::theme::Theme;

/// Rows between stacked controls
const GAP: u16 = 1;

/// What a key press on the group amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    /// The key was handled (focus moved, text edited)
    Handled,

    /// The key was not for the group
    Ignored,

    /// The submit button was pressed, or Enter on the last field
    Submit,
}

/// A form: fields mounted in one [`FormScope`], followed by a submit button.
///
/// Focus walks fields then the button with Tab/Shift-Tab (or Enter on a
/// field). The column scrolls to keep the focused control visible.
pub struct FieldGroup {
    scope: FormScope,
    fields: Vec<FieldController>,
    button: Button,
    focused: usize,
    scroll: ScrollView,
}

impl std::fmt::Debug for FieldGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldGroup")
            .field("scope", &self.scope)
            .field("fields", &self.fields)
            .field("focused", &self.focused)
            .finish()
    }
}

impl FieldGroup {
    /// Mount every field into `scope`
    pub fn new(
        mut scope: FormScope,
        mut fields: Vec<FieldController>,
        button: Button,
    ) -> Result<Self, FieldError> {
        for field in &mut fields {
            field.mount(&mut scope)?;
        }
        Ok(Self {
            scope,
            fields,
            button,
            focused: 0,
            scroll: ScrollView::new(),
        })
    }

    pub fn scope(&self) -> &FormScope {
        &self.scope
    }

    pub fn fields(&self) -> &[FieldController] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldController> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn button(&self) -> &Button {
        &self.button
    }

    pub fn data(&self) -> Map<String, Value> {
        self.scope.data()
    }

    /// Focus the control at `index` (fields first, then the button) and
    /// blur whatever had focus.
    fn move_focus(&mut self, index: usize) {
        if let Some(field) = self.fields.get(self.focused) {
            if let Err(err) = field.handle().blur() {
                warn!("cannot blur field: {}", err);
            }
        }
        self.button.set_focused(false);

        self.focused = index;
        match self.fields.get(self.focused) {
            Some(field) => {
                if let Err(err) = field.handle().focus() {
                    warn!("cannot focus field: {}", err);
                }
            }
            None => self.button.set_focused(true),
        }

        for field in &mut self.fields {
            field.process_events();
        }
    }

    /// Drop focus from every control
    pub fn blur_all(&mut self) {
        for field in &mut self.fields {
            let _ = field.handle().blur();
            field.process_events();
        }
        self.button.set_focused(false);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<GroupAction, FieldError> {
        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                Ok(GroupAction::Handled)
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_previous();
                Ok(GroupAction::Handled)
            }
            KeyCode::Down => {
                self.focus_next();
                Ok(GroupAction::Handled)
            }
            _ if self.button.handle_key(key) => Ok(GroupAction::Submit),
            KeyCode::Enter => {
                if self.focused + 1 >= self.fields.len() {
                    Ok(GroupAction::Submit)
                } else {
                    self.focus_next();
                    Ok(GroupAction::Handled)
                }
            }
            _ => match self.fields.get_mut(self.focused) {
                Some(field) => Ok(if field.handle_key(key)? {
                    GroupAction::Handled
                } else {
                    GroupAction::Ignored
                }),
                None => Ok(GroupAction::Ignored),
            },
        }
    }

    /// Validate with `schema`, then pull the resulting errors into every field
    pub async fn submit(&mut self, schema: &ValidationSchema) -> Result<Map<String, Value>, FieldErrors> {
        let result = self.scope.validate(schema).await;
        self.refresh_errors();
        result
    }

    pub fn refresh_errors(&mut self) {
        for field in &mut self.fields {
            field.refresh_error(&self.scope);
        }
    }

    /// Clear every value and error and move the focus index back to the first field
    pub fn reset(&mut self) -> Result<(), FieldError> {
        self.blur_all();
        self.scope.reset()?;
        self.refresh_errors();
        // A cleared field must not keep its "filled" styling
        for field in &mut self.fields {
            let handle = field.handle();
            handle.focus()?;
            handle.blur()?;
            field.process_events();
        }
        self.focused = 0;
        self.scroll.reset();
        Ok(())
    }

    fn heights(&self) -> Vec<u16> {
        self.fields
            .iter()
            .map(FieldController::height)
            .chain(std::iter::once(Button::HEIGHT))
            .collect()
    }

    /// Render the column into `area`, scrolling to reveal the focused control
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let heights = self.heights();
        self.scroll.reveal(&heights, GAP, self.focused, area.height);
        let rects = self.scroll.layout(&heights, GAP, self.focused, area);
        for (field, rect) in self.fields.iter().zip(&rects) {
            if let Some(rect) = rect {
                field.render(frame, *rect, theme);
            }
        }
        if let Some(Some(rect)) = rects.last() {
            self.button.render(frame, *rect, theme);
        }
    }

    /// Scroll so the focused control fits in `viewport` rows
    pub fn reveal_focused(&self, viewport: u16) {
        let heights = self.heights();
        self.scroll.reveal(&heights, GAP, self.focused, viewport);
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll.offset()
    }
}

impl FocusCycle for FieldGroup {
    fn focus_count(&self) -> usize {
        self.fields.len() + 1
    }

    fn focused_index(&self) -> usize {
        self.focused
    }

    fn set_focused_index(&mut self, index: usize) {
        self.move_focus(index);
    }
}
