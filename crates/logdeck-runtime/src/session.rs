//! Viewer session: the event loop that owns all viewer state.
//!
//! Registry notifications, tail events and UI actions are funnelled into one
//! mpsc channel and handled one at a time by a single task, which owns the
//! `LogSourceTracker` and the `LogDisplayController`. Nothing else mutates
//! viewer state.

use std::sync::Arc;

use logdeck_core::{
    LogDisplayController, LogGroup, LogSourceTracker, LogViewPort, ProcessRegistryPort,
    RegistrySnapshot, RegistryUpdate, TailEvent, TailEventSink, TailSourcePort, ViewerSettings,
};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::tail::{ChannelTailSink, PollingTailer};

/// User interface actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Switch the active tab.
    SelectTab(LogGroup),
    /// Replace the filter; an empty string shows every line.
    SetFilter(String),
    /// Scroll the active tab to its newest line and resume following.
    JumpToBottom,
    /// Drop every retained line of a tab.
    ClearTab(LogGroup),
    /// Unsubscribe from the registries, stop all tails and end the session.
    Unload,
}

/// Everything the session loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    RegistryUpdated(LogGroup),
    Tail(TailEvent),
    Ui(UiAction),
}

impl From<TailEvent> for SessionEvent {
    fn from(event: TailEvent) -> Self {
        Self::Tail(event)
    }
}

impl From<UiAction> for SessionEvent {
    fn from(action: UiAction) -> Self {
        Self::Ui(action)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Viewer session has ended")]
    Closed,

    #[error("Viewer session task failed: {0}")]
    Join(String),
}

/// A viewer session that has not been started yet.
pub struct LogViewerSession<V: LogViewPort> {
    controller: LogDisplayController<V>,
    tracker: LogSourceTracker,
    registries: [Arc<dyn ProcessRegistryPort>; 2],
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<V: LogViewPort + 'static> LogViewerSession<V> {
    /// Build a session that tails files with a `PollingTailer`.
    pub fn new(
        view: V,
        settings: &ViewerSettings,
        domain_server: Arc<dyn ProcessRegistryPort>,
        assignment_client: Arc<dyn ProcessRegistryPort>,
    ) -> Self {
        Self::with_tail_source(view, settings, domain_server, assignment_client, |sink| {
            Arc::new(PollingTailer::new(sink))
        })
    }

    /// Build a session with a custom tail source. `make_source` receives the
    /// sink that feeds tail events into the session loop.
    pub fn with_tail_source<F>(
        view: V,
        settings: &ViewerSettings,
        domain_server: Arc<dyn ProcessRegistryPort>,
        assignment_client: Arc<dyn ProcessRegistryPort>,
        make_source: F,
    ) -> Self
    where
        F: FnOnce(Arc<dyn TailEventSink>) -> Arc<dyn TailSourcePort>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink: Arc<dyn TailEventSink> = Arc::new(ChannelTailSink::new(tx.clone()));
        let source = make_source(sink);

        for (registry, expected) in [
            (&domain_server, LogGroup::DomainServer),
            (&assignment_client, LogGroup::AssignmentClient),
        ] {
            if registry.group() != expected {
                warn!(
                    expected = %expected,
                    reported = %registry.group(),
                    "Registry reports a different group than its slot"
                );
            }
        }

        Self {
            controller: LogDisplayController::new(view, settings.max_retained_lines),
            tracker: LogSourceTracker::new(source, settings.tail_policies()),
            registries: [domain_server, assignment_client],
            tx,
            rx,
        }
    }

    /// Start the session loop on the tokio runtime.
    pub fn spawn(self) -> SessionHandle<V>
    where
        V: Send,
    {
        let tx = self.tx.clone();
        let task = tokio::spawn(self.run());
        SessionHandle {
            tx,
            task: Some(task),
        }
    }

    async fn run(mut self) -> V {
        // Subscribe before the first read so no change falls in between.
        let forwarders: Vec<JoinHandle<()>> = LogGroup::ALL
            .into_iter()
            .map(|group| {
                let updates = self.registries[group.index()].subscribe();
                spawn_forwarder(group, updates, self.tx.clone())
            })
            .collect();

        for group in LogGroup::ALL {
            self.refresh(group);
        }
        info!("Log viewer session started");

        while let Some(event) = self.rx.recv().await {
            if !self.handle(event) {
                break;
            }
        }

        for forwarder in forwarders {
            forwarder.abort();
            let _ = forwarder.await;
        }
        let stopped = self.tracker.stop_all();
        info!(stopped, "Log viewer session unloaded");

        self.controller.into_view()
    }

    /// Handle one event. Returns false when the session should end.
    fn handle(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::RegistryUpdated(group) => self.refresh(group),
            SessionEvent::Tail(event) => self.handle_tail(event),
            SessionEvent::Ui(UiAction::Unload) => return false,
            SessionEvent::Ui(action) => self.handle_ui(action),
        }
        true
    }

    fn refresh(&mut self, group: LogGroup) {
        let snapshot = match self.registries[group.index()].get_logs() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(group = %group, error = %e, "Registry read failed, treating as empty");
                RegistrySnapshot::new()
            }
        };

        self.tracker.reconcile(group, &snapshot);
    }

    fn handle_tail(&mut self, event: TailEvent) {
        let tail = event.tail();
        if !self.tracker.is_current(tail) {
            trace!(tail = %tail, "Dropping event from a stopped tail");
            return;
        }

        match event {
            TailEvent::Line { line, .. } => self.controller.append(line.group, line.text),
            TailEvent::Error { tail, error } => {
                self.tracker.mark_errored(tail, error.to_string());
            }
            TailEvent::Recovered { tail } => {
                self.tracker.mark_recovered(tail);
            }
        }
    }

    fn handle_ui(&mut self, action: UiAction) {
        debug!(?action, "UI action");
        match action {
            UiAction::SelectTab(group) => {
                self.controller.set_active_tab(group);
            }
            UiAction::SetFilter(filter) => self.controller.set_filter(&filter),
            UiAction::JumpToBottom => self.controller.scroll_active_to_bottom(),
            UiAction::ClearTab(group) => self.controller.clear(group),
            UiAction::Unload => {}
        }
    }
}

/// Forward a registry's `updated` notifications into the session channel.
///
/// A lagged receiver still forwards one notification: reconcile reads the
/// whole snapshot, so missed notifications carry no extra information.
fn spawn_forwarder(
    group: LogGroup,
    mut updates: broadcast::Receiver<RegistryUpdate>,
    tx: mpsc::UnboundedSender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    if tx.send(SessionEvent::RegistryUpdated(group)).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(group = %group, "Registry closed its update channel");
                    break;
                }
            }
        }
    })
}

/// Handle of a running session.
///
/// Dropping the handle unloads the session.
pub struct SessionHandle<V> {
    tx: mpsc::UnboundedSender<SessionEvent>,
    task: Option<JoinHandle<V>>,
}

impl<V> SessionHandle<V> {
    pub fn send(&self, action: UiAction) -> Result<(), SessionError> {
        self.tx
            .send(SessionEvent::Ui(action))
            .map_err(|_| SessionError::Closed)
    }

    pub fn select_tab(&self, group: LogGroup) -> Result<(), SessionError> {
        self.send(UiAction::SelectTab(group))
    }

    pub fn set_filter(&self, filter: impl Into<String>) -> Result<(), SessionError> {
        self.send(UiAction::SetFilter(filter.into()))
    }

    /// Whether the session loop has ended.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Unload the session and wait for it to end. Returns the view.
    pub async fn shutdown(mut self) -> Result<V, SessionError> {
        let _ = self.tx.send(SessionEvent::Ui(UiAction::Unload));
        let task = self.task.take().ok_or(SessionError::Closed)?;
        task.await.map_err(|e| SessionError::Join(e.to_string()))
    }
}

impl<V> Drop for SessionHandle<V> {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.tx.send(SessionEvent::Ui(UiAction::Unload));
        }
    }
}
