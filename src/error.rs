use thiserror::Error;

/// Errors raised by field controllers and the form scope.
///
/// Validation failures are not errors here: they are plain strings owned by
/// the form scope and displayed verbatim by the field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field's input element does not exist yet (or anymore).
    #[error("field '{field}' is not mounted")]
    NotMounted { field: String },

    /// A field was constructed with an empty name.
    #[error("field name must not be empty")]
    EmptyName,

    /// The form scope has no field registered under this name.
    #[error("no field named '{0}' is registered")]
    UnknownField(String),

    /// Two fields whose dotted names would nest into each other (`a` and `a.b`).
    #[error("field '{field}' conflicts with registered field '{existing}'")]
    PathConflict { field: String, existing: String },
}
