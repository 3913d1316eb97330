//! End-to-end tests with real files, the polling tailer and real registries.

mod common;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use common::view::RecordingView;
use common::wait_until;
use logdeck_core::{LogGroup, ProcessLogs, ProcessRegistryPort, ViewerSettings};
use logdeck_runtime::{InMemoryProcessRegistry, LogDirectoryRegistry, LogViewerSession};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

const DS: LogGroup = LogGroup::DomainServer;
const AC: LogGroup = LogGroup::AssignmentClient;

fn fast_settings() -> ViewerSettings {
    ViewerSettings {
        poll_interval_ms: 10,
        ..ViewerSettings::default()
    }
}

fn append(path: &Path, text: &str) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_domain_server_file_is_read_from_start() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("a.log");
    append(&log, "hello\nworld\n");

    let ds = Arc::new(InMemoryProcessRegistry::new(DS));
    ds.set_process("42", ProcessLogs {
        stdout: Some(path_str(&log)),
        stderr: None,
    });
    let ac = Arc::new(InMemoryProcessRegistry::new(AC));

    let (view, rendered) = RecordingView::new();
    let handle = LogViewerSession::new(view, &fast_settings(), ds, ac).spawn();

    wait_until("two lines", || rendered.lock().unwrap().lines[0].len() == 2).await;
    assert_eq!(rendered.lock().unwrap().texts(DS), vec!["hello", "world"]);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_assignment_client_file_starts_near_the_end() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("ac.log");

    // 300 lines of exactly 100 bytes: 30000 bytes, the window starts at line 50.
    let content: String = (0..300)
        .map(|i| format!("{i:05}{}\n", "x".repeat(94)))
        .collect();
    assert_eq!(content.len(), 30_000);
    fs::write(&log, &content).unwrap();

    let ds = Arc::new(InMemoryProcessRegistry::new(DS));
    let ac = Arc::new(InMemoryProcessRegistry::new(AC));
    ac.set_process("7", ProcessLogs {
        stdout: Some(path_str(&log)),
        stderr: None,
    });

    let (view, rendered) = RecordingView::new();
    let handle = LogViewerSession::new(view, &fast_settings(), ds, ac).spawn();

    wait_until("window lines", || rendered.lock().unwrap().lines[1].len() == 250).await;
    let texts = rendered.lock().unwrap().texts(AC);
    assert!(texts[0].starts_with("00050"));
    assert!(texts[249].starts_with("00299"));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_removed_process_produces_no_further_lines() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("a.log");
    append(&log, "before\n");

    let ds = Arc::new(InMemoryProcessRegistry::new(DS));
    ds.set_process("42", ProcessLogs {
        stdout: Some(path_str(&log)),
        stderr: None,
    });
    let ac = Arc::new(InMemoryProcessRegistry::new(AC));

    let (view, rendered) = RecordingView::new();
    let handle = LogViewerSession::new(
        view,
        &fast_settings(),
        Arc::clone(&ds) as Arc<dyn ProcessRegistryPort>,
        ac,
    )
    .spawn();
    wait_until("first line", || rendered.lock().unwrap().lines[0].len() == 1).await;

    ds.remove_process("42");
    tokio::time::sleep(Duration::from_millis(100)).await;

    append(&log, "after\n");
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(rendered.lock().unwrap().texts(DS), vec!["before"]);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_log_directory_drives_the_session() {
    let dir = tempdir().unwrap();
    let ds_out = dir.path().join("domain-server-1-stdout.txt");
    let ac_out = dir.path().join("ac-2-stdout.txt");
    append(&ds_out, "ds up\n");

    let ds = Arc::new(LogDirectoryRegistry::open(dir.path(), DS));
    let ac = Arc::new(LogDirectoryRegistry::open(dir.path(), AC));
    let cancel = CancellationToken::new();
    let watchers = [
        ds.spawn_watcher(Duration::from_millis(10), cancel.clone()),
        ac.spawn_watcher(Duration::from_millis(10), cancel.clone()),
    ];

    let (view, rendered) = RecordingView::new();
    let handle = LogViewerSession::new(
        view,
        &fast_settings(),
        Arc::clone(&ds) as Arc<dyn ProcessRegistryPort>,
        Arc::clone(&ac) as Arc<dyn ProcessRegistryPort>,
    )
    .spawn();

    wait_until("ds line", || rendered.lock().unwrap().lines[0].len() == 1).await;

    // A process started after the viewer shows up through the watcher.
    append(&ac_out, "ac up\nac ready\n");
    wait_until("ac lines", || rendered.lock().unwrap().lines[1].len() == 2).await;

    let r = rendered.lock().unwrap();
    assert_eq!(r.texts(DS), vec!["ds up"]);
    assert_eq!(r.texts(AC), vec!["ac up", "ac ready"]);
    drop(r);

    handle.shutdown().await.unwrap();
    cancel.cancel();
    for watcher in watchers {
        watcher.await.unwrap();
    }
}
