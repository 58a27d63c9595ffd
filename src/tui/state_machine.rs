use crate::tui::screen_trait::ScreenId;

/// Tracks the current screen and the back-stack within one route stack.
///
/// Screens themselves are owned by the `App`; only their ids live here.
pub struct ScreenStateMachine {
    current: ScreenId,
    history: Vec<ScreenId>,
}

impl Default for ScreenStateMachine {
    fn default() -> Self {
        Self::new(ScreenId::SignIn)
    }
}

impl ScreenStateMachine {
    pub fn new(root: ScreenId) -> Self {
        Self {
            current: root,
            history: vec![],
        }
    }

    pub fn go_to(&mut self, screen_id: ScreenId) {
        self.history.push(self.current);
        self.current = screen_id;
    }

    /// Returns false if there was nothing to go back to
    pub fn go_back(&mut self) -> bool {
        if let Some(previous) = self.history.pop() {
            self.current = previous;
            true
        } else {
            false
        }
    }

    /// Replace the whole stack with a single root screen
    pub fn reset(&mut self, root: ScreenId) {
        self.history.clear();
        self.current = root;
    }

    pub fn current(&self) -> ScreenId {
        self.current
    }

    pub fn history(&self) -> &[ScreenId] {
        &self.history
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
}
