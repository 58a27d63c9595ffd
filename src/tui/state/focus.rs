//! Focus cycling shared by screens that step through a list of controls.

/// Trait for types whose controls receive focus one at a time
///
/// Implementors provide the count and the index accessors; moving focus
/// forward and backward wraps around at both ends.
///
/// # Example
/// ```
/// use fieldkit::tui::state::FocusCycle;
///
/// struct Toolbar {
///     buttons: Vec<&'static str>,
///     focused: usize,
/// }
///
/// impl FocusCycle for Toolbar {
///     fn focus_count(&self) -> usize {
///         self.buttons.len()
///     }
///
///     fn focused_index(&self) -> usize {
///         self.focused
///     }
///
///     fn set_focused_index(&mut self, index: usize) {
///         self.focused = index;
///     }
/// }
///
/// let mut bar = Toolbar { buttons: vec!["Save", "Cancel"], focused: 1 };
/// bar.focus_next();
/// assert_eq!(bar.focused_index(), 0);
/// bar.focus_previous();
/// assert_eq!(bar.focused_index(), 1);
/// ```
pub trait FocusCycle {
    fn focus_count(&self) -> usize;

    fn focused_index(&self) -> usize;

    /// Move focus to `index` (always `< focus_count()`)
    fn set_focused_index(&mut self, index: usize);

    fn focus_next(&mut self) {
        let count = self.focus_count();
        if count > 0 {
            self.set_focused_index((self.focused_index() + 1) % count);
        }
    }

    fn focus_previous(&mut self) {
        let count = self.focus_count();
        if count > 0 {
            let current = self.focused_index();
            self.set_focused_index(if current == 0 { count - 1 } else { current - 1 });
        }
    }

    fn focus_first(&mut self) {
        if self.focus_count() > 0 {
            self.set_focused_index(0);
        }
    }
}
