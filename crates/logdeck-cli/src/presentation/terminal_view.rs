//! `LogViewPort` for a plain terminal.
//!
//! A terminal cannot scroll back programmatically, so the view mirrors the
//! retained lines of both tabs and prints the active one as a stream:
//!
//! - following (not paused): new visible lines of the active tab are printed
//!   as they arrive;
//! - paused: new lines are held back until the next scroll to the bottom;
//! - switching tabs or changing the filter redraws the active tab.
//!
//! The pause flag is shared so the console can toggle it while the session
//! owns the view. The first failed write (e.g. a closed pipe) cancels the
//! `closed` token so the console can stop the session.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use logdeck_core::{LogGroup, LogViewPort};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// One mirrored line: text and visibility.
type Mirrored = (String, bool);

pub struct TerminalView<W: Write + Send> {
    out: W,
    tabs: [VecDeque<Mirrored>; 2],
    /// Trailing lines per tab not printed yet.
    pending: [usize; 2],
    active: LogGroup,
    paused: Arc<AtomicBool>,
    closed: CancellationToken,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, paused: Arc<AtomicBool>, closed: CancellationToken) -> Self {
        Self {
            out,
            tabs: [VecDeque::new(), VecDeque::new()],
            pending: [0, 0],
            active: LogGroup::DomainServer,
            paused,
            closed,
        }
    }

    pub const fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    pub fn pending(&self, group: LogGroup) -> usize {
        self.pending[group.index()]
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Write `text` and flush; after the first failure all output is dropped.
    fn write_out(&mut self, text: &str) {
        if text.is_empty() || self.closed.is_cancelled() {
            return;
        }
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "Terminal output failed, stopping the viewer");
            self.closed.cancel();
        }
    }

    /// Print the header and every visible line of `group` except the pending tail.
    fn redraw(&mut self, group: LogGroup, note: Option<&str>) {
        let tab = &self.tabs[group.index()];
        let shown = tab.len() - self.pending[group.index()];

        let mut text = match note {
            Some(note) => format!("=== {} ({note}) ===\n", group.label()),
            None => format!("=== {} ===\n", group.label()),
        };
        for (line, _) in tab.iter().take(shown).filter(|(_, visible)| *visible) {
            let _ = writeln!(text, "{line}");
        }
        self.write_out(&text);
    }
}

impl<W: Write + Send> LogViewPort for TerminalView<W> {
    fn append_line(&mut self, group: LogGroup, text: &str, visible: bool) {
        self.tabs[group.index()].push_back((text.to_string(), visible));
        self.pending[group.index()] += 1;
    }

    fn remove_oldest(&mut self, group: LogGroup) {
        let tab = &mut self.tabs[group.index()];
        tab.pop_front();
        let pending = &mut self.pending[group.index()];
        *pending = (*pending).min(tab.len());
    }

    fn set_line_visible(&mut self, group: LogGroup, index: usize, visible: bool) {
        if let Some(line) = self.tabs[group.index()].get_mut(index) {
            line.1 = visible;
        }
    }

    fn visibility_changed(&mut self, group: LogGroup) {
        if group == self.active {
            self.redraw(group, Some("filter changed"));
        }
    }

    fn scroll_to_bottom(&mut self, group: LogGroup) {
        if group != self.active {
            return;
        }

        let tab = &self.tabs[group.index()];
        let pending = self.pending[group.index()];
        let mut text = String::new();
        for (line, _) in tab.iter().skip(tab.len() - pending).filter(|(_, v)| *v) {
            let _ = writeln!(text, "{line}");
        }
        self.write_out(&text);

        self.pending[group.index()] = 0;
        self.paused.store(false, Ordering::Relaxed);
    }

    fn set_tab_active(&mut self, group: LogGroup, active: bool) {
        if !active {
            return;
        }
        self.active = group;
        // The controller scrolls right after if the tab was following.
        self.paused.store(true, Ordering::Relaxed);
        self.redraw(group, None);
    }

    fn is_at_bottom(&self, _group: LogGroup) -> bool {
        !self.is_paused()
    }

    fn clear(&mut self, group: LogGroup) {
        self.tabs[group.index()].clear();
        self.pending[group.index()] = 0;
        if group == self.active {
            self.redraw(group, Some("cleared"));
        }
    }
}
