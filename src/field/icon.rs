/// Icon shown at the left edge of a field or link.
///
/// Names follow the Feather icon set so screen definitions read the same as
/// their designs; unknown names fall back to a neutral glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIcon {
    name: String,
}

impl FieldIcon {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Single-cell glyph drawn in the terminal
    pub fn glyph(&self) -> &'static str {
        match self.name.as_str() {
            "user" => "◉",
            "mail" => "✉",
            "lock" => "⚿",
            "arrow-left" => "←",
            "log-in" => "→",
            "log-out" => "⇥",
            _ => "•",
        }
    }
}

impl From<&str> for FieldIcon {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
