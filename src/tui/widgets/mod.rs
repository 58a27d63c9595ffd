pub mod button;
pub mod common;
pub mod field_group;
pub mod modal_dialog;
pub mod scroll_view;
pub mod text_input;

pub use button::Button;
pub use field_group::{FieldGroup, GroupAction};
pub use modal_dialog::{DialogType, ModalDialog};
pub use scroll_view::ScrollView;
pub use text_input::TextInput;
