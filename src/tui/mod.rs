pub mod app;
pub mod routes;
pub mod screen_trait;
pub mod screens;
pub mod state;
pub mod state_machine;
pub mod theme;
pub mod widgets;


pub use app::App;
