use std::sync::{Arc, Mutex, PoisonError};

use super::element::{with_element, ElementSlot};
use crate::error::FieldError;

/// The controller-owned cell holding a field's current text
#[derive(Debug, Clone, Default)]
pub struct ValueCell(Arc<Mutex<String>>);

impl ValueCell {
    pub fn new(initial: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new(initial.into())))
    }

    pub fn get(&self) -> String {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, value: impl Into<String>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = value.into();
    }

    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

/// The `{ read, write, clear }` capability a field hands to its form scope.
///
/// `write` and `clear` touch both the value cell and the visual element, and
/// fail with `NotMounted` (without touching the cell) when the element is gone.
#[derive(Clone)]
pub struct FieldBinding {
    field: String,
    value: ValueCell,
    element: ElementSlot,
}

impl std::fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("value", &self.value.get())
            .finish()
    }
}

impl FieldBinding {
    pub(crate) fn new(field: impl Into<String>, value: ValueCell, element: ElementSlot) -> Self {
        Self {
            field: field.into(),
            value,
            element,
        }
    }

    pub fn read(&self) -> String {
        self.value.get()
    }

    /// Push `value` into the element, then store whatever the element kept
    /// (it may drop filtered characters or truncate)
    pub fn write(&self, value: &str) -> Result<(), FieldError> {
        with_element(&self.element, &self.field, |element| {
            element.set_text(value);
            self.value.set(element.text());
        })
    }

    pub fn clear(&self) -> Result<(), FieldError> {
        with_element(&self.element, &self.field, |element| {
            self.value.clear();
            element.clear();
        })
    }
}

/// What a field registers with its form scope on mount
#[derive(Debug, Clone)]
pub struct FieldRegistration {
    /// The field's name (its path in the submitted data)
    pub name: String,

    /// Which attribute of the value reference holds the text
    pub path: &'static str,

    pub binding: FieldBinding,
}

/// Attribute path every text field registers under
pub const VALUE_PATH: &str = "value";
