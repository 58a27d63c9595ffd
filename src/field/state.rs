/// Per-field visual state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPhase {
    BlurredEmpty,
    BlurredFilled,
    Focused,
}

impl FieldPhase {
    /// Initial phase for a freshly mounted field with the given default text
    pub fn initial(default_value: &str) -> Self {
        Self::after_blur(default_value)
    }

    /// Phase entered on blur, given the value at blur time
    pub fn after_blur(value: &str) -> Self {
        if value.is_empty() {
            Self::BlurredEmpty
        } else {
            Self::BlurredFilled
        }
    }

    pub fn from_flags(is_focused: bool, is_filled: bool) -> Self {
        match (is_focused, is_filled) {
            (true, _) => Self::Focused,
            (false, true) => Self::BlurredFilled,
            (false, false) => Self::BlurredEmpty,
        }
    }
}
