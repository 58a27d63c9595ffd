pub mod dashboard;
pub mod sign_in;
pub mod sign_up;

pub use dashboard::DashboardState;
pub use sign_in::SignInState;
pub use sign_up::SignUpState;
