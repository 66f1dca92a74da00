//! Engine - shared orchestration for the headless runner and embedders
//!
//! The Engine owns the TEA state, the message channel and the backend. It
//! runs messages through `process::process_message()` and broadcasts
//! [`EngineEvent`]s describing what changed.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use manus_api::Backend;
use manus_core::{NotificationLevel, SessionId, WizardStep};

use crate::config::Settings;
use crate::engine_event::{EngineEvent, ProgressStage};
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::{AppState, Phase, Progress};

/// Interval of the housekeeping tick
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    step: WizardStep,
    phase: Phase,
    epoch: u64,
    staged: Vec<PathBuf>,
    staged_size: u64,
    session_id: Option<SessionId>,
    has_result: bool,
    progress: Option<Progress>,
    next_notification_id: u64,
    explorer_loading: bool,
    preview_path: Option<String>,
    last_download: Option<PathBuf>,
    last_export: Option<PathBuf>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            step: state.step,
            phase: state.phase,
            epoch: state.epoch,
            staged: state.staged.iter().map(|f| f.path.clone()).collect(),
            staged_size: state.staged_total_size(),
            session_id: state.session_id().cloned(),
            has_result: state.analysis_result.is_some(),
            progress: state.progress.clone(),
            next_notification_id: state.notifications.next_id(),
            explorer_loading: state.explorer.loading,
            preview_path: state.explorer.preview.as_ref().map(|p| p.file_path.clone()),
            last_download: state.last_download.clone(),
            last_export: state.last_export.clone(),
        }
    }
}

/// Orchestration engine for the Manus client.
///
/// Generic over the [`Backend`] so tests can drive it with a scripted fake.
pub struct Engine<B> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (stdin reader, signal handler).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    backend: B,

    /// Subscribers receive EngineEvents after each message processing cycle.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<B> Engine<B>
where
    B: Backend + Clone + Sync + 'static,
{
    /// Create an engine with fresh state. Nothing is spawned until [`Engine::start`].
    pub fn new(backend: B, settings: Settings) -> Self {
        let state = AppState::with_settings(settings);
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (event_tx, _) = broadcast::channel(256);

        Self {
            state,
            msg_tx,
            msg_rx,
            backend,
            event_tx,
        }
    }

    /// Spawn the signal handler and the housekeeping ticker, and probe the
    /// backend once.
    pub fn start(&mut self) -> JoinHandle<()> {
        signals::spawn_signal_handler(self.msg_tx.clone());
        let ticker = self.spawn_ticker();
        self.process_message(Message::CheckHealth);
        ticker
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Process a single message through the TEA update cycle.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(&mut self.state, msg, &self.msg_tx, &self.backend);

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message and process it. `false` once the channel closed.
    pub async fn process_next(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.process_message(msg);
                true
            }
            None => false,
        }
    }

    /// Process messages until `done` holds for the state or a quit was requested
    pub async fn run_until<F>(&mut self, mut done: F)
    where
        F: FnMut(&AppState) -> bool,
    {
        while !done(&self.state) && !self.should_quit() {
            if !self.process_next().await {
                break;
            }
        }
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Cancel pending work and tell subscribers we are going away.
    pub fn shutdown(&mut self) {
        info!("Engine shutting down");
        self.state.cancel_poll();
        self.emit(EngineEvent::Shutdown);
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(Message::Tick).await.is_err() {
                    debug!("Ticker stopping: channel closed");
                    break;
                }
            }
        })
    }

    /// Compare pre/post snapshots and emit an event per observable change.
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if post.epoch != pre.epoch {
            self.emit(EngineEvent::Reset { epoch: post.epoch });
        }

        if post.staged != pre.staged || post.staged_size != pre.staged_size {
            self.emit(EngineEvent::FilesStaged {
                count: post.staged.len(),
                total_size: post.staged_size,
            });
        }

        if pre.phase != Phase::Uploading && post.phase == Phase::Uploading {
            self.emit(EngineEvent::UploadStarted {
                files: post.staged.len(),
            });
        }

        if post.session_id.is_some() && post.session_id != pre.session_id {
            if let Some(session) = self.state.session.as_ref() {
                self.emit(EngineEvent::SessionCreated {
                    session_id: session.id.clone(),
                    total_files: session.structure.total_files,
                });
            }
        }

        if pre.phase != Phase::Submitting && post.phase == Phase::Submitting {
            if let Some(session_id) = post.session_id.clone() {
                self.emit(EngineEvent::AnalysisStarted { session_id });
            }
        }

        if post.progress != pre.progress {
            if let Some(progress) = post.progress.as_ref() {
                let stage = if post.phase == Phase::Uploading {
                    ProgressStage::Upload
                } else {
                    ProgressStage::Analysis
                };
                self.emit(EngineEvent::Progress {
                    stage,
                    percent: progress.percent,
                    label: progress.label.clone(),
                });
            }
        }

        if !pre.has_result && post.has_result {
            let summary = self
                .state
                .analysis_result
                .as_ref()
                .and_then(|r| r.summary.clone());
            self.emit(EngineEvent::AnalysisCompleted { summary });
        }

        let analysis_ended = matches!(pre.phase, Phase::Submitting | Phase::Polling)
            && post.phase == Phase::Idle
            && !post.has_result
            && pre.epoch == post.epoch;
        if analysis_ended {
            let message = self
                .state
                .notifications
                .since(pre.next_notification_id)
                .filter(|n| n.level == NotificationLevel::Error)
                .last()
                .map(|n| n.message.clone())
                .unwrap_or_else(|| "Analysis failed".to_string());
            self.emit(EngineEvent::AnalysisFailed { message });
        }

        if pre.explorer_loading && !post.explorer_loading && self.state.explorer.open {
            self.emit(EngineEvent::ExplorerLoaded {
                files: self.state.explorer.files.len(),
            });
        }

        if post.preview_path.is_some() && post.preview_path != pre.preview_path {
            if let Some(preview) = self.state.explorer.preview.as_ref() {
                self.emit(EngineEvent::FilePreviewed {
                    path: preview.file_path.clone(),
                    size: preview.size,
                });
            }
        }

        if post.last_download.is_some() && post.last_download != pre.last_download {
            if let Some(path) = post.last_download.clone() {
                self.emit(EngineEvent::Downloaded { path });
            }
        }

        if post.last_export.is_some() && post.last_export != pre.last_export {
            if let Some(path) = post.last_export.clone() {
                self.emit(EngineEvent::Exported { path });
            }
        }

        // Last, so consumers see the state change before the toast about it
        for notification in self.state.notifications.since(pre.next_notification_id) {
            self.emit(EngineEvent::Notification {
                id: notification.id,
                level: notification.level,
                message: notification.message.clone(),
            });
        }

        if post.step != pre.step {
            self.emit(EngineEvent::StepChanged {
                from: pre.step,
                to: post.step,
            });
        }
    }

    /// send() returns Err only if there are no receivers, which is fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
