use super::element::{with_element, ElementSlot};
use crate::error::FieldError;

/// Imperative capability a parent holds to move focus onto a field.
///
/// Cloning is cheap; every clone refers to the same element. Calls made
/// before the field is mounted (or after it is unmounted) fail with
/// [`FieldError::NotMounted`].
#[derive(Clone)]
pub struct FieldHandle {
    field: String,
    element: ElementSlot,
}

impl std::fmt::Debug for FieldHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldHandle").field("field", &self.field).finish()
    }
}

impl FieldHandle {
    pub(crate) fn new(field: impl Into<String>, element: ElementSlot) -> Self {
        Self {
            field: field.into(),
            element,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Move input focus to this field. The controller observes a focus event
    /// the next time it processes its element's events.
    pub fn focus(&self) -> Result<(), FieldError> {
        with_element(&self.element, &self.field, |element| element.focus())
    }

    pub fn blur(&self) -> Result<(), FieldError> {
        with_element(&self.element, &self.field, |element| element.blur())
    }

    pub fn is_mounted(&self) -> bool {
        with_element(&self.element, &self.field, |_| ()).is_ok()
    }
}
