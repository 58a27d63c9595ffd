//! Top-level switch between the signed-out and signed-in screen stacks.

use crate::session::SessionState;
use crate::tui::screen_trait::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStack {
    /// Session is still being restored; show a spinner
    Loading,

    /// Signed out: sign-in and sign-up screens
    Auth,

    /// Signed in
    App,
}

impl RouteStack {
    /// First screen of the stack, `None` while loading
    pub fn root(&self) -> Option<ScreenId> {
        match self {
            Self::Loading => None,
            Self::Auth => Some(ScreenId::SignIn),
            Self::App => Some(ScreenId::Dashboard),
        }
    }

    pub fn contains(&self, screen: ScreenId) -> bool {
        match self {
            Self::Loading => false,
            Self::Auth => matches!(screen, ScreenId::SignIn | ScreenId::SignUp),
            Self::App => matches!(screen, ScreenId::Dashboard),
        }
    }
}

pub fn resolve_stack(session: &SessionState) -> RouteStack {
    if session.loading {
        RouteStack::Loading
    } else if session.user.is_some() {
        RouteStack::App
    } else {
        RouteStack::Auth
    }
}
