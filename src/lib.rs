pub mod config;
pub mod error;
pub mod field;
pub mod form;
pub mod session;
pub mod tui;

pub use error::FieldError;
