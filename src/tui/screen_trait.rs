use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::session::SessionProvider;
use crate::tui::app::AppContext;

/// Interface every TUI screen implements
///
/// Screen state (`&mut self`) and app context are borrowed separately so a
/// screen can mutate itself while reading or updating shared resources.
#[async_trait]
pub trait Screen<S: SessionProvider>: Send {
    fn render(&self, frame: &mut Frame, context: &AppContext<S>);

    /// Handle a key press and return the resulting navigation
    async fn handle_key(&mut self, context: &mut AppContext<S>, key: KeyEvent) -> Result<ScreenTransition>;

    /// Called each time the screen becomes current
    async fn on_enter(&mut self, context: &mut AppContext<S>) -> Result<()> {
        let _ = context;
        Ok(())
    }

    /// Called when navigating away from the screen
    async fn on_exit(&mut self, context: &mut AppContext<S>) -> Result<()> {
        let _ = context;
        Ok(())
    }

    fn id(&self) -> ScreenId;
}

/// Navigation requested by a screen after handling input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTransition {
    Stay,

    /// Push a screen onto the current stack
    GoTo(ScreenId),

    /// Pop back to the previous screen
    Back,

    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    SignIn,
    SignUp,
    Dashboard,
}
