//! A `LogViewPort` that records what it was told to render.

use std::sync::{Arc, Mutex};

use logdeck_core::{LogGroup, LogViewPort};

#[derive(Debug, Default)]
pub struct Rendered {
    pub lines: [Vec<(String, bool)>; 2],
    pub tab_calls: Vec<(LogGroup, bool)>,
    pub scrolls: Vec<LogGroup>,
}

impl Rendered {
    pub fn texts(&self, group: LogGroup) -> Vec<String> {
        self.lines[group.index()]
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub fn visible(&self, group: LogGroup) -> Vec<String> {
        self.lines[group.index()]
            .iter()
            .filter(|(_, visible)| *visible)
            .map(|(text, _)| text.clone())
            .collect()
    }
}

/// Always at the bottom; shares its record with the test.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub rendered: Arc<Mutex<Rendered>>,
}

impl RecordingView {
    pub fn new() -> (Self, Arc<Mutex<Rendered>>) {
        let view = Self::default();
        let rendered = Arc::clone(&view.rendered);
        (view, rendered)
    }
}

impl LogViewPort for RecordingView {
    fn append_line(&mut self, group: LogGroup, text: &str, visible: bool) {
        self.rendered.lock().unwrap().lines[group.index()].push((text.to_string(), visible));
    }

    fn remove_oldest(&mut self, group: LogGroup) {
        self.rendered.lock().unwrap().lines[group.index()].remove(0);
    }

    fn set_line_visible(&mut self, group: LogGroup, index: usize, visible: bool) {
        self.rendered.lock().unwrap().lines[group.index()][index].1 = visible;
    }

    fn scroll_to_bottom(&mut self, group: LogGroup) {
        self.rendered.lock().unwrap().scrolls.push(group);
    }

    fn set_tab_active(&mut self, group: LogGroup, active: bool) {
        self.rendered.lock().unwrap().tab_calls.push((group, active));
    }

    fn is_at_bottom(&self, _group: LogGroup) -> bool {
        true
    }

    fn clear(&mut self, group: LogGroup) {
        self.rendered.lock().unwrap().lines[group.index()].clear();
    }
}
