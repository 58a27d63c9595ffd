//! Controlled text fields: focus/filled state, an imperative focus handle and
//! the registration contract with a [`crate::form::FormScope`].

pub mod binding;
pub mod controller;
pub mod element;
pub mod handle;
pub mod icon;
pub mod state;

pub use binding::{FieldBinding, FieldRegistration, ValueCell, VALUE_PATH};
pub use controller::FieldController;
pub use element::{InputElement, InputEvent};
pub use handle::FieldHandle;
pub use icon::FieldIcon;
pub use state::FieldPhase;
