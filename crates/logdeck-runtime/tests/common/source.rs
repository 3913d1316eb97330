//! A `TailSourcePort` that starts nothing and lets tests inject events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use logdeck_core::{
    LogGroup, LogLine, TailEvent, TailEventSink, TailHandle, TailId, TailRequest, TailSourcePort,
};

#[derive(Default)]
pub struct SourceLog {
    pub started: Vec<TailRequest>,
    pub stopped: Vec<TailId>,
    pub sink: Option<Arc<dyn TailEventSink>>,
}

impl SourceLog {
    pub fn request_for(&self, path: &str) -> Option<&TailRequest> {
        self.started.iter().rev().find(|r| r.path == path)
    }

    /// Emit a line as if the tail of `path` had read it.
    pub fn emit_line(&self, path: &str, text: &str) {
        let request = self.request_for(path).expect("path was never tailed");
        self.emit(TailEvent::Line {
            tail: request.id,
            line: LogLine::new(request.group, text),
        });
    }

    pub fn emit_line_from(&self, tail: TailId, group: LogGroup, text: &str) {
        self.emit(TailEvent::Line {
            tail,
            line: LogLine::new(group, text),
        });
    }

    pub fn emit(&self, event: TailEvent) {
        self.sink.as_ref().expect("source has no sink").emit(event);
    }
}

pub struct FakeSource {
    log: Arc<Mutex<SourceLog>>,
}

impl FakeSource {
    /// Returns a factory for `LogViewerSession::with_tail_source` and the shared log.
    pub fn factory() -> (
        impl FnOnce(Arc<dyn TailEventSink>) -> Arc<dyn TailSourcePort>,
        Arc<Mutex<SourceLog>>,
    ) {
        let log = Arc::new(Mutex::new(SourceLog::default()));
        let shared = Arc::clone(&log);
        let factory = move |sink: Arc<dyn TailEventSink>| -> Arc<dyn TailSourcePort> {
            shared.lock().unwrap().sink = Some(sink);
            Arc::new(Self { log: shared })
        };
        (factory, log)
    }
}

impl TailSourcePort for FakeSource {
    fn start_tail(&self, request: TailRequest) -> Box<dyn TailHandle> {
        let id = request.id;
        self.log.lock().unwrap().started.push(request);
        Box::new(FakeHandle {
            id,
            stopped: AtomicBool::new(false),
            log: Arc::clone(&self.log),
        })
    }
}

struct FakeHandle {
    id: TailId,
    stopped: AtomicBool,
    log: Arc<Mutex<SourceLog>>,
}

impl TailHandle for FakeHandle {
    fn stop(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.log.lock().unwrap().stopped.push(self.id);
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
