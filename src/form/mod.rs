//! The form collaborator: a registry that fields register with, which owns
//! initial data and validation errors and collects values at submit time.

pub mod scope;
pub mod validation;

pub use scope::{FieldContext, FieldErrors, FormScope, ScopeId};
pub use validation::{
    AsyncValidator, EmailFormatValidator, MinLengthValidator, NonEmptyValidator, ValidationResult,
    ValidationSchema,
};
