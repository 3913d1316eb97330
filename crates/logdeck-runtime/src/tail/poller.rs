//! Polling file tailer.

use std::io::SeekFrom;
use std::sync::Arc;

use logdeck_core::{
    InitialOffsetPolicy, LogLine, TailError, TailEvent, TailEventSink, TailHandle, TailId,
    TailRequest, TailSourcePort,
};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{MAX_READ_PER_POLL, MIN_POLL_INTERVAL};
use super::splitter::LineSplitter;

/// `TailSourcePort` implementation that polls file sizes on a timer.
///
/// Each tail runs as its own tokio task, so `start_tail` must be called from
/// within a tokio runtime.
pub struct PollingTailer {
    sink: Arc<dyn TailEventSink>,
    max_read_per_poll: usize,
}

impl PollingTailer {
    pub fn new(sink: Arc<dyn TailEventSink>) -> Self {
        Self {
            sink,
            max_read_per_poll: MAX_READ_PER_POLL,
        }
    }

    /// Override the per-poll read cap (mostly for tests).
    #[must_use]
    pub fn with_max_read_per_poll(mut self, bytes: usize) -> Self {
        self.max_read_per_poll = bytes.max(1);
        self
    }
}

impl TailSourcePort for PollingTailer {
    fn start_tail(&self, request: TailRequest) -> Box<dyn TailHandle> {
        let cancel = CancellationToken::new();
        let id = request.id;
        let path = request.path.clone();

        debug!(tail = %id, group = %request.group, path = %path, "Starting tail");

        let task = tokio::spawn(run_tail(
            request,
            Arc::clone(&self.sink),
            cancel.clone(),
            self.max_read_per_poll,
        ));

        Box::new(PollingTailHandle {
            id,
            path,
            cancel,
            task: Some(task),
        })
    }
}

/// Handle of a running polling tail.
///
/// Dropping the handle stops the tail.
#[derive(Debug)]
pub struct PollingTailHandle {
    id: TailId,
    path: String,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollingTailHandle {
    pub const fn id(&self) -> TailId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl TailHandle for PollingTailHandle {
    fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(tail = %self.id, path = %self.path, "Tail stopped");
        }
    }

    fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PollingTailHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read position of one tail.
struct TailCursor {
    /// `None` until the first successful stat resolves the initial policy.
    offset: Option<u64>,
    policy: InitialOffsetPolicy,
}

async fn run_tail(
    request: TailRequest,
    sink: Arc<dyn TailEventSink>,
    cancel: CancellationToken,
    max_read: usize,
) {
    let TailRequest {
        id,
        group,
        path,
        initial_offset,
        poll_interval,
    } = request;

    let splitter = LineSplitter::new(max_read);
    let mut cursor = TailCursor {
        offset: None,
        policy: initial_offset,
    };
    let mut failing = false;

    if poll_interval < MIN_POLL_INTERVAL {
        debug!(tail = %id, ?poll_interval, "Poll interval below minimum, clamping");
    }
    let mut ticker = interval(poll_interval.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match poll_once(&path, &mut cursor, &splitter, max_read).await {
            Ok(lines) => {
                if failing {
                    failing = false;
                    if cancel.is_cancelled() {
                        break;
                    }
                    info!(tail = %id, group = %group, path = %path, "Tail recovered");
                    sink.emit(TailEvent::Recovered { tail: id });
                }
                for text in lines {
                    if cancel.is_cancelled() {
                        return;
                    }
                    sink.emit(TailEvent::Line {
                        tail: id,
                        line: LogLine::new(group, text),
                    });
                }
            }
            Err(error) => {
                if !failing {
                    failing = true;
                    if cancel.is_cancelled() {
                        break;
                    }
                    warn!(tail = %id, group = %group, error = %error, "Tail read failed");
                    sink.emit(TailEvent::Error { tail: id, error });
                }
            }
        }
    }

    debug!(tail = %id, path = %path, "Tail task exiting");
}

/// One poll: stat, resolve/reset the offset, read new bytes, split lines.
async fn poll_once(
    path: &str,
    cursor: &mut TailCursor,
    splitter: &LineSplitter,
    max_read: usize,
) -> Result<Vec<String>, TailError> {
    let size = fs::metadata(path)
        .await
        .map_err(|e| TailError::Stat {
            path: path.to_string(),
            reason: e.to_string(),
        })?
        .len();

    let mut offset = *cursor.offset.get_or_insert_with(|| cursor.policy.resolve(size));

    if size < offset {
        debug!(path = %path, size, offset, "File shrank, restarting from the beginning");
        offset = 0;
        cursor.offset = Some(0);
    }
    if size == offset {
        return Ok(Vec::new());
    }

    let mut file = File::open(path).await.map_err(|e| TailError::Open {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    let read_err = |e: std::io::Error| TailError::Read {
        path: path.to_string(),
        reason: e.to_string(),
    };

    file.seek(SeekFrom::Start(offset)).await.map_err(read_err)?;

    let wanted = usize::try_from(size - offset).map_or(max_read, |n| n.min(max_read));
    let mut buf = Vec::with_capacity(wanted);
    file.take(wanted as u64)
        .read_to_end(&mut buf)
        .await
        .map_err(read_err)?;

    let split = splitter.split(&buf);
    cursor.offset = Some(offset + split.consumed as u64);
    Ok(split.lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tail::ChannelTailSink;
    use logdeck_core::LogGroup;
    use std::io::Write;
    use std::path::Path;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const POLL: Duration = Duration::from_millis(10);

    fn tailer() -> (PollingTailer, mpsc::UnboundedReceiver<TailEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (PollingTailer::new(Arc::new(ChannelTailSink::new(tx))), rx)
    }

    fn request(id: u64, path: &Path, initial_offset: InitialOffsetPolicy) -> TailRequest {
        TailRequest {
            id: TailId(id),
            group: LogGroup::DomainServer,
            path: path.to_string_lossy().into_owned(),
            initial_offset,
            poll_interval: POLL,
        }
    }

    fn append(path: &Path, bytes: &[u8]) {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        file.write_all(bytes).unwrap();
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<TailEvent>) -> TailEvent {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for tail event")
            .expect("sink closed")
    }

    async fn next_line(rx: &mut mpsc::UnboundedReceiver<TailEvent>) -> String {
        match next_event(rx).await {
            TailEvent::Line { line, .. } => line.text,
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reads_from_start_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domain-server-1-stdout.txt");
        append(&path, b"first\nsecond\n");

        let (tailer, mut rx) = tailer();
        let _handle = tailer.start_tail(request(1, &path, InitialOffsetPolicy::FromStart));

        assert_eq!(next_line(&mut rx).await, "first");
        assert_eq!(next_line(&mut rx).await, "second");

        append(&path, b"third\n");
        assert_eq!(next_line(&mut rx).await, "third");
    }

    #[tokio::test]
    async fn test_partial_line_waits_for_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        append(&path, b"hel");

        let (tailer, mut rx) = tailer();
        let _handle = tailer.start_tail(request(1, &path, InitialOffsetPolicy::FromStart));

        tokio::time::sleep(POLL * 5).await;
        assert!(rx.try_recv().is_err());

        append(&path, b"lo\n");
        assert_eq!(next_line(&mut rx).await, "hello");
    }

    #[tokio::test]
    async fn test_tail_window_skips_old_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ac-1-stdout.txt");
        append(&path, b"old line one\nold line two\nrecent\n");

        let (tailer, mut rx) = tailer();
        let _handle = tailer.start_tail(request(
            1,
            &path,
            InitialOffsetPolicy::TailWindow { window_bytes: 7 },
        ));

        assert_eq!(next_line(&mut rx).await, "recent");
    }

    #[tokio::test]
    async fn test_truncation_restarts_from_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        append(&path, b"a long line before rotation\n");

        let (tailer, mut rx) = tailer();
        let _handle = tailer.start_tail(request(1, &path, InitialOffsetPolicy::FromStart));
        assert_eq!(next_line(&mut rx).await, "a long line before rotation");

        std::fs::write(&path, b"fresh\n").unwrap();
        assert_eq!(next_line(&mut rx).await, "fresh");
    }

    #[tokio::test]
    async fn test_large_growth_is_drained_over_several_polls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        append(&path, b"aaaa\nbbbb\ncccc\n");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let tailer =
            PollingTailer::new(Arc::new(ChannelTailSink::new(tx))).with_max_read_per_poll(6);
        let _handle = tailer.start_tail(request(1, &path, InitialOffsetPolicy::FromStart));

        assert_eq!(next_line(&mut rx).await, "aaaa");
        assert_eq!(next_line(&mut rx).await, "bbbb");
        assert_eq!(next_line(&mut rx).await, "cccc");
    }

    #[tokio::test]
    async fn test_error_then_recovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.txt");

        let (tailer, mut rx) = tailer();
        let _handle = tailer.start_tail(request(7, &path, InitialOffsetPolicy::FromStart));

        match next_event(&mut rx).await {
            TailEvent::Error { tail, error } => {
                assert_eq!(tail, TailId(7));
                assert!(matches!(error, TailError::Stat { .. }));
            }
            other => panic!("expected an error, got {other:?}"),
        }

        // Still failing: no duplicate error.
        tokio::time::sleep(POLL * 5).await;
        assert!(rx.try_recv().is_err());

        append(&path, b"up\n");
        assert_eq!(next_event(&mut rx).await, TailEvent::Recovered { tail: TailId(7) });
        assert_eq!(next_line(&mut rx).await, "up");
    }

    #[tokio::test]
    async fn test_zero_poll_interval_still_tails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        append(&path, b"hello\n");

        let (tailer, mut rx) = tailer();
        let mut req = request(1, &path, InitialOffsetPolicy::FromStart);
        req.poll_interval = Duration::ZERO;
        let handle = tailer.start_tail(req);

        assert_eq!(next_line(&mut rx).await, "hello");
        append(&path, b"again\n");
        assert_eq!(next_line(&mut rx).await, "again");
        assert!(!handle.is_stopped());
    }

    #[tokio::test]
    async fn test_stop_prevents_further_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        append(&path, b"before\n");

        let (tailer, mut rx) = tailer();
        let mut handle = tailer.start_tail(request(1, &path, InitialOffsetPolicy::FromStart));
        assert_eq!(next_line(&mut rx).await, "before");

        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());

        append(&path, b"after\n");
        std::fs::remove_file(&path).unwrap();
        tokio::time::sleep(POLL * 5).await;
        assert!(rx.try_recv().is_err());
    }
}
