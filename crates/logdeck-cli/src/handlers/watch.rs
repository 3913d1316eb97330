//! Watch command handler.
//!
//! Follows the log directory, prints the active tab to stdout and reads
//! console commands from stdin:
//!
//! ```text
//! :tab ds|ac       switch tab
//! :filter TEXT     show only lines containing TEXT (case-insensitive)
//! :filter          clear the filter
//! :pause           stop following; new lines are held back
//! :follow          print held-back lines and follow again
//! :clear           drop the lines of the current tab
//! :quit            leave
//! ```

use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use logdeck_core::{LogGroup, ProcessRegistryPort, ViewerSettings, validate_settings};
use logdeck_runtime::{
    LogDirectoryRegistry, LogViewerSession, SessionHandle, SweepReport, UiAction, sweep_old_logs,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bootstrap::CliContext;
use crate::commands::WatchArgs;
use crate::error::CliError;
use crate::presentation::TerminalView;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Tab(LogGroup),
    Filter(String),
    Pause,
    Follow,
    Clear,
    Help,
    Quit,
}

/// Parse one line of console input. Blank lines yield `Ok(None)`.
pub fn parse_console_command(input: &str) -> Result<Option<ConsoleCommand>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let Some(body) = input.strip_prefix(':') else {
        return Err(format!("unknown input '{input}' (commands start with ':', try :help)"));
    };
    let (name, rest) = body
        .split_once(char::is_whitespace)
        .map_or((body, ""), |(name, rest)| (name, rest.trim()));

    let command = match name {
        "tab" | "t" => {
            let group = rest.parse::<LogGroup>().map_err(|e| e.to_string())?;
            ConsoleCommand::Tab(group)
        }
        "filter" | "f" => ConsoleCommand::Filter(rest.to_string()),
        "pause" | "p" => ConsoleCommand::Pause,
        "follow" | "bottom" => ConsoleCommand::Follow,
        "clear" => ConsoleCommand::Clear,
        "help" | "h" | "?" => ConsoleCommand::Help,
        "quit" | "q" | "exit" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command ':{other}' (try :help)")),
    };
    Ok(Some(command))
}

const HELP: &str = "\
commands:
  :tab ds|ac       switch tab
  :filter TEXT     show only lines containing TEXT
  :filter          clear the filter
  :pause           stop following
  :follow          print held-back lines and follow again
  :clear           drop the lines of the current tab
  :quit            leave";

/// Execute the watch command until `:quit` or Ctrl-C.
pub async fn execute(ctx: &CliContext, args: WatchArgs) -> Result<()> {
    let mut settings = ctx.settings.clone();
    if let Some(rescan_ms) = args.rescan_ms {
        settings.rescan_interval_ms = rescan_ms;
        validate_settings(&settings).map_err(|e| CliError::Arguments(e.to_string()))?;
    }

    let log_dir = ctx.log_dir().to_path_buf();
    if !log_dir.exists() {
        warn!(dir = %log_dir.display(), "Log directory does not exist yet, waiting for it");
    } else if !args.no_sweep {
        startup_sweep(&log_dir, &settings);
    }

    let ds = Arc::new(LogDirectoryRegistry::open(&log_dir, LogGroup::DomainServer));
    let ac = Arc::new(LogDirectoryRegistry::open(&log_dir, LogGroup::AssignmentClient));
    let cancel = CancellationToken::new();
    let watchers = [
        ds.spawn_watcher(settings.rescan_interval(), cancel.clone()),
        ac.spawn_watcher(settings.rescan_interval(), cancel.clone()),
    ];

    let paused = Arc::new(AtomicBool::new(false));
    let output_closed = CancellationToken::new();
    let view = TerminalView::new(io::stdout(), Arc::clone(&paused), output_closed.clone());
    let session = LogViewerSession::new(
        view,
        &settings,
        Arc::clone(&ds) as Arc<dyn ProcessRegistryPort>,
        Arc::clone(&ac) as Arc<dyn ProcessRegistryPort>,
    )
    .spawn();

    let mut active = LogGroup::DomainServer;
    if let Some(tab) = args.tab {
        active = tab;
        session.select_tab(tab)?;
    }
    if let Some(filter) = args.filter {
        session.set_filter(filter)?;
    }

    info!(dir = %log_dir.display(), tab = %active, "Watching server logs");
    run_console(&session, &paused, &output_closed, active).await?;

    session.shutdown().await?;
    cancel.cancel();
    for watcher in watchers {
        let _ = watcher.await;
    }
    debug!("Watch finished");
    Ok(())
}

/// Delete log files older than the configured retention before tailing starts.
pub fn startup_sweep(log_dir: &Path, settings: &ViewerSettings) -> SweepReport {
    let report = sweep_old_logs(log_dir, settings.retention_max_age());
    if report.deleted > 0 || report.failed > 0 {
        info!(
            dir = %log_dir.display(),
            deleted = report.deleted,
            failed = report.failed,
            "Removed old log files"
        );
    }
    report
}

/// Read console commands until the user quits, presses Ctrl-C or stdout closes.
async fn run_console<V>(
    session: &SessionHandle<V>,
    paused: &AtomicBool,
    output_closed: &CancellationToken,
    mut active: LogGroup,
) -> Result<(), CliError> {
    let mut input = spawn_stdin_reader();
    let mut input_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            () = output_closed.cancelled() => break,
            line = input.recv(), if input_open => {
                let Some(line) = line else {
                    // End of input: keep following until Ctrl-C.
                    input_open = false;
                    continue;
                };
                let command = match parse_console_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        eprintln!("{message}");
                        continue;
                    }
                };

                match command {
                    ConsoleCommand::Tab(group) => {
                        active = group;
                        session.select_tab(group)?;
                    }
                    ConsoleCommand::Filter(filter) => session.set_filter(filter)?,
                    ConsoleCommand::Pause => paused.store(true, Ordering::Relaxed),
                    ConsoleCommand::Follow => session.send(UiAction::JumpToBottom)?,
                    ConsoleCommand::Clear => session.send(UiAction::ClearTab(active))?,
                    ConsoleCommand::Help => eprintln!("{HELP}"),
                    ConsoleCommand::Quit => break,
                }
            }
        }

        if session.is_finished() {
            break;
        }
    }
    Ok(())
}

/// Read stdin lines on a dedicated thread.
///
/// A blocking read cannot be cancelled; the thread is left behind at exit.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
