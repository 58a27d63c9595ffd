pub mod focus;
pub mod messages;

pub use focus::FocusCycle;
pub use messages::MessageDisplay;
