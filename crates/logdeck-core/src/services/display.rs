//! Log display controller.
//!
//! Owns the two tab buffers, the active tab and the filter, and turns log
//! lines and UI actions into render instructions for a `LogViewPort`.

use tracing::{debug, trace};

use crate::domain::{BufferedLine, FilterState, LogGroup, MAX_RETAINED_LINES, TabBuffer};
use crate::ports::LogViewPort;

/// All mutable viewer state, owned by one controller.
#[derive(Debug, Clone)]
pub struct LogViewerState {
    tabs: [TabBuffer; 2],
    active: LogGroup,
    filter: FilterState,
}

impl LogViewerState {
    /// Domain-server starts active, both tabs follow the bottom, no filter.
    pub fn new(max_lines: usize) -> Self {
        Self {
            tabs: [TabBuffer::new(max_lines), TabBuffer::new(max_lines)],
            active: LogGroup::DomainServer,
            filter: FilterState::default(),
        }
    }

    pub fn tab(&self, group: LogGroup) -> &TabBuffer {
        &self.tabs[group.index()]
    }

    pub const fn active(&self) -> LogGroup {
        self.active
    }

    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }
}

impl Default for LogViewerState {
    fn default() -> Self {
        Self::new(MAX_RETAINED_LINES)
    }
}

/// Drives a `LogViewPort` from log lines, tab selection and filter input.
pub struct LogDisplayController<V: LogViewPort> {
    state: LogViewerState,
    view: V,
}

impl<V: LogViewPort> LogDisplayController<V> {
    pub fn new(view: V, max_lines: usize) -> Self {
        Self {
            state: LogViewerState::new(max_lines),
            view,
        }
    }

    /// Append a line to the tab of `group`.
    ///
    /// At the retention cap the oldest line is evicted first. When the tab is
    /// active the view only follows the new line if it was already at the
    /// bottom; a reader scrolled up into history stays where they are.
    pub fn append(&mut self, group: LogGroup, text: impl Into<String>) {
        let text = text.into();
        let visible = self.state.filter.matches(&text);
        let is_active = group == self.state.active;
        let was_at_bottom = is_active && self.view.is_at_bottom(group);

        let tab = &mut self.state.tabs[group.index()];
        if tab.is_full() {
            tab.evict_oldest();
            self.view.remove_oldest(group);
        }
        self.view.append_line(group, &text, visible);
        tab.push(BufferedLine { text, visible });

        if is_active {
            if was_at_bottom {
                self.view.scroll_to_bottom(group);
            }
            tab.is_at_bottom = was_at_bottom;
        }
    }

    /// Switch the visible tab.
    ///
    /// Returns `false` (and does nothing) if `group` is already active.
    pub fn set_active_tab(&mut self, group: LogGroup) -> bool {
        let previous = self.state.active;
        if group == previous {
            return false;
        }

        let previous_at_bottom = self.view.is_at_bottom(previous);
        self.state.tabs[previous.index()].is_at_bottom = previous_at_bottom;
        self.state.active = group;

        self.view.set_tab_active(previous, false);
        self.view.set_tab_active(group, true);
        if self.state.tabs[group.index()].is_at_bottom {
            self.view.scroll_to_bottom(group);
        }

        debug!(from = %previous, to = %group, previous_at_bottom, "Switched tab");
        true
    }

    /// Replace the filter and re-evaluate visibility of every retained line.
    ///
    /// Lines are never dropped; clearing the filter restores them all.
    pub fn set_filter(&mut self, substring: &str) {
        self.state.filter.set(substring);

        let LogViewerState { tabs, filter, .. } = &mut self.state;
        for group in LogGroup::ALL {
            let mut changed = 0usize;
            for (index, line) in tabs[group.index()].iter_mut().enumerate() {
                let visible = filter.matches(&line.text);
                if visible != line.visible {
                    line.visible = visible;
                    self.view.set_line_visible(group, index, visible);
                    changed += 1;
                }
            }
            if changed > 0 {
                self.view.visibility_changed(group);
            }
            trace!(%group, changed, "Applied filter");
        }

        debug!(filter = %self.state.filter.as_str(), "Filter updated");
    }

    /// Jump the active tab to its newest line and resume following.
    pub fn scroll_active_to_bottom(&mut self) {
        let group = self.state.active;
        self.view.scroll_to_bottom(group);
        self.state.tabs[group.index()].is_at_bottom = true;
    }

    /// Drop every retained line of a tab.
    pub fn clear(&mut self, group: LogGroup) {
        self.state.tabs[group.index()].clear();
        self.view.clear(group);
    }

    pub const fn active_tab(&self) -> LogGroup {
        self.state.active
    }

    pub fn filter(&self) -> &str {
        self.state.filter.as_str()
    }

    pub fn line_count(&self, group: LogGroup) -> usize {
        self.state.tab(group).len()
    }

    /// Persisted "following the bottom" flag of a tab.
    pub fn is_at_bottom(&self, group: LogGroup) -> bool {
        self.state.tab(group).is_at_bottom
    }

    /// Retained lines of a tab, oldest first.
    pub fn lines(&self, group: LogGroup) -> impl Iterator<Item = &BufferedLine> {
        self.state.tab(group).iter()
    }

    /// Text of the currently visible lines of a tab, oldest first.
    pub fn visible_lines(&self, group: LogGroup) -> Vec<&str> {
        self.lines(group)
            .filter(|line| line.visible)
            .map(|line| line.text.as_str())
            .collect()
    }

    pub const fn state(&self) -> &LogViewerState {
        &self.state
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }
}
