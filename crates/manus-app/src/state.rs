//! Application state (Model in TEA pattern)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;

use manus_api::FileContent;
use manus_core::{
    format_file_size, AnalysisResult, AnalysisStatus, FilePolicy, ProjectFile, ProjectStructure,
    SessionId, StagedFile, UploadedFile, WizardStep,
};

use crate::config::Settings;
use crate::notifications::Notifications;
use crate::session_clock::SessionClock;

/// Duration of the cosmetic upload progress animation
pub const UPLOAD_ANIMATION: Duration = Duration::from_millis(3000);

/// Which request flow is in flight, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Submitting,
    Polling,
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// Server session created by a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub id: SessionId,
    pub structure: ProjectStructure,
    pub uploaded_files: Vec<UploadedFile>,
    pub warnings: Vec<String>,
}

/// Progress bar contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub percent: u8,
    pub label: String,
}

impl Progress {
    pub fn new(percent: u8, label: impl Into<String>) -> Self {
        Self {
            percent,
            label: label.into(),
        }
    }

    pub fn for_status(status: AnalysisStatus) -> Self {
        let (percent, label) = status.progress();
        Self::new(percent, label)
    }

    /// Upload animation frame: linear 0-100% over [`UPLOAD_ANIMATION`]
    pub fn upload_frame(elapsed: Duration) -> Self {
        let ratio = elapsed.as_millis() as f64 / UPLOAD_ANIMATION.as_millis() as f64;
        let percent = (ratio * 100.0).clamp(0.0, 100.0) as u8;
        Self::new(percent, "Uploading files...")
    }
}

/// A status poll that is currently scheduled or in flight
#[derive(Debug)]
pub struct ActivePoll {
    /// Status requests issued so far
    pub attempts: u32,
    /// Send `true` to stop the pending timer
    pub cancel_tx: watch::Sender<bool>,
}

impl ActivePoll {
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            attempts: 0,
            cancel_tx,
        }
    }

    pub fn cancel(self) {
        let _ = self.cancel_tx.send(true);
    }
}

impl Default for ActivePoll {
    fn default() -> Self {
        Self::new()
    }
}

/// Layout of the explorer file listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "list" => Ok(ViewMode::List),
            "grid" => Ok(ViewMode::Grid),
            other => Err(format!("unknown view mode '{}'", other)),
        }
    }
}

/// Session file explorer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorerState {
    pub open: bool,
    pub loading: bool,
    pub files: Vec<ProjectFile>,
    pub query: String,
    pub view_mode: ViewMode,
    pub selected: Option<String>,
    pub preview: Option<FileContent>,
}

impl ExplorerState {
    /// Files whose path contains the query, case-insensitively
    pub fn filtered(&self) -> Vec<&ProjectFile> {
        let needle = self.query.trim().to_lowercase();
        self.files
            .iter()
            .filter(|f| needle.is_empty() || f.path.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    pub step: WizardStep,

    /// Local files waiting to be uploaded, in arrival order
    pub staged: Vec<StagedFile>,

    pub session: Option<SessionInfo>,

    pub task_description: String,

    pub analysis_result: Option<AnalysisResult>,

    pub phase: Phase,

    /// Bumped on every reset; async responses from an older epoch are dropped
    pub epoch: u64,

    pub poll: Option<ActivePoll>,

    pub progress: Option<Progress>,

    /// When the current upload was started, for the progress animation
    pub upload_started_at: Option<Instant>,

    pub explorer: ExplorerState,

    pub notifications: Notifications,

    pub clock: SessionClock,

    pub policy: FilePolicy,

    pub settings: Settings,

    pub last_download: Option<PathBuf>,

    pub last_export: Option<PathBuf>,

    quitting: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            step: WizardStep::Upload,
            staged: Vec::new(),
            session: None,
            task_description: String::new(),
            analysis_result: None,
            phase: Phase::Idle,
            epoch: 0,
            poll: None,
            progress: None,
            upload_started_at: None,
            explorer: ExplorerState::default(),
            notifications: Notifications::new(settings.ui.notification_timeout()),
            clock: SessionClock::start(),
            policy: settings.file_policy(),
            settings,
            last_download: None,
            last_export: None,
            quitting: false,
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(|s| &s.id)
    }

    /// Upload is offered iff something is staged and nothing is in flight
    pub fn can_upload(&self) -> bool {
        !self.staged.is_empty() && !self.phase.is_busy()
    }

    pub fn staged_total_size(&self) -> u64 {
        self.staged.iter().map(|f| f.size).sum()
    }

    /// `<n> file(s), <size>` summary line for the staged list
    pub fn staged_summary(&self) -> String {
        format!(
            "{} file(s), {}",
            self.staged.len(),
            format_file_size(self.staged_total_size())
        )
    }

    pub fn task_char_count(&self) -> usize {
        self.task_description.chars().count()
    }

    pub fn task_over_limit(&self) -> bool {
        self.task_char_count() > self.settings.analysis.max_task_length
    }

    /// Whether the wizard may move to `step`
    pub fn step_reachable(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Upload => true,
            WizardStep::Task => self.session.is_some(),
            WizardStep::Results => self.analysis_result.is_some(),
        }
    }

    /// Stop any scheduled status poll
    pub fn cancel_poll(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.cancel();
        }
    }

    /// Back to a fresh wizard: new epoch, nothing staged, no session
    pub fn reset(&mut self) {
        self.cancel_poll();
        self.epoch += 1;
        self.step = WizardStep::Upload;
        self.staged.clear();
        self.session = None;
        self.task_description.clear();
        self.analysis_result = None;
        self.phase = Phase::Idle;
        self.progress = None;
        self.upload_started_at = None;
        self.explorer = ExplorerState::default();
        self.clock.restart();
    }

    pub fn request_quit(&mut self) {
        self.cancel_poll();
        self.quitting = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_frame_is_time_based() {
        assert_eq!(Progress::upload_frame(Duration::ZERO).percent, 0);
        assert_eq!(Progress::upload_frame(Duration::from_millis(1500)).percent, 50);
        assert_eq!(Progress::upload_frame(Duration::from_secs(10)).percent, 100);
    }

    #[test]
    fn test_can_upload() {
        let mut state = AppState::new();
        assert!(!state.can_upload());

        state.staged.push(StagedFile::new("/tmp/a.py", 10, None));
        assert!(state.can_upload());

        state.phase = Phase::Uploading;
        assert!(!state.can_upload());
    }

    #[test]
    fn test_task_over_limit_counts_chars() {
        let mut state = AppState::new();
        state.task_description = "é".repeat(2000);
        assert_eq!(state.task_char_count(), 2000);
        assert!(!state.task_over_limit());

        state.task_description.push('x');
        assert!(state.task_over_limit());
    }

    #[test]
    fn test_reset_cancels_poll_and_bumps_epoch() {
        let mut state = AppState::new();
        let poll = ActivePoll::new();
        let mut cancel_rx = poll.cancel_tx.subscribe();
        state.poll = Some(poll);
        state.step = WizardStep::Results;

        state.reset();

        assert_eq!(state.epoch, 1);
        assert!(state.poll.is_none());
        assert_eq!(state.step, WizardStep::Upload);
        assert!(*cancel_rx.borrow_and_update());
    }

    #[test]
    fn test_explorer_filter_is_case_insensitive() {
        let explorer = ExplorerState {
            files: vec![
                ProjectFile {
                    path: "src/Main.py".into(),
                    ..Default::default()
                },
                ProjectFile {
                    path: "README.md".into(),
                    ..Default::default()
                },
            ],
            query: "main".into(),
            ..Default::default()
        };
        let hits: Vec<_> = explorer.filtered().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(hits, vec!["src/Main.py"]);
    }

    #[test]
    fn test_staged_summary() {
        let mut state = AppState::new();
        state.staged.push(StagedFile::new("/tmp/a.py", 1024, None));
        state.staged.push(StagedFile::new("/tmp/b.py", 512, None));
        assert_eq!(state.staged_summary(), "2 file(s), 1.5 KB");
    }
}
