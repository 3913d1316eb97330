//! Log view port: the rendering host of the two tabs.
//!
//! The display controller owns the retained lines and the filter; the view
//! owns presentation and the scroll position. Line indexes refer to the
//! position of a line among the retained lines of its tab, oldest first.

use crate::domain::LogGroup;

/// Port for the UI collaborator.
#[cfg_attr(test, mockall::automock)]
pub trait LogViewPort: Send {
    /// Append a line element at the bottom of a tab.
    fn append_line(&mut self, group: LogGroup, text: &str, visible: bool);

    /// Remove the oldest line element of a tab.
    fn remove_oldest(&mut self, group: LogGroup);

    /// Show or hide the line at `index`.
    fn set_line_visible(&mut self, group: LogGroup, index: usize, visible: bool);

    /// Called once per tab after a filter change altered any visibility in it.
    fn visibility_changed(&mut self, _group: LogGroup) {}

    /// Scroll a tab to its newest line.
    fn scroll_to_bottom(&mut self, group: LogGroup);

    /// Toggle tab styling.
    fn set_tab_active(&mut self, group: LogGroup, active: bool);

    /// Whether the tab is currently scrolled to the bottom, within the
    /// view's own padding tolerance.
    fn is_at_bottom(&self, group: LogGroup) -> bool;

    /// Remove every line element of a tab.
    fn clear(&mut self, group: LogGroup);
}

/// A view that renders nothing and always reports being at the bottom.
///
/// Useful for headless sessions and tests that only inspect controller state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogView;

impl LogViewPort for NoopLogView {
    fn append_line(&mut self, _group: LogGroup, _text: &str, _visible: bool) {}

    fn remove_oldest(&mut self, _group: LogGroup) {}

    fn set_line_visible(&mut self, _group: LogGroup, _index: usize, _visible: bool) {}

    fn scroll_to_bottom(&mut self, _group: LogGroup) {}

    fn set_tab_active(&mut self, _group: LogGroup, _active: bool) {}

    fn is_at_bottom(&self, _group: LogGroup) -> bool {
        true
    }

    fn clear(&mut self, _group: LogGroup) {}
}
