//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON lines.

use std::path::PathBuf;

use serde::Serialize;

use manus_core::{NotificationLevel, SessionId, WizardStep};

/// Which flow a progress update belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStage {
    Upload,
    Analysis,
}

/// Domain events emitted by the Engine for external consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Wizard
    // ─────────────────────────────────────────────────────────
    StepChanged { from: WizardStep, to: WizardStep },

    /// The staged file list changed
    FilesStaged { count: usize, total_size: u64 },

    /// The wizard went back to a fresh start
    Reset { epoch: u64 },

    // ─────────────────────────────────────────────────────────
    // Upload / Analysis
    // ─────────────────────────────────────────────────────────
    UploadStarted { files: usize },

    SessionCreated {
        session_id: SessionId,
        total_files: u64,
    },

    AnalysisStarted { session_id: SessionId },

    Progress {
        stage: ProgressStage,
        percent: u8,
        label: String,
    },

    AnalysisCompleted { summary: Option<String> },

    AnalysisFailed { message: String },

    // ─────────────────────────────────────────────────────────
    // Explorer / Output
    // ─────────────────────────────────────────────────────────
    ExplorerLoaded { files: usize },

    FilePreviewed { path: String, size: u64 },

    Downloaded { path: PathBuf },

    Exported { path: PathBuf },

    // ─────────────────────────────────────────────────────────
    // Feedback
    // ─────────────────────────────────────────────────────────
    Notification {
        id: u64,
        level: NotificationLevel,
        message: String,
    },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// The engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Event type name for logging/filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::StepChanged { .. } => "step_changed",
            EngineEvent::FilesStaged { .. } => "files_staged",
            EngineEvent::Reset { .. } => "reset",
            EngineEvent::UploadStarted { .. } => "upload_started",
            EngineEvent::SessionCreated { .. } => "session_created",
            EngineEvent::AnalysisStarted { .. } => "analysis_started",
            EngineEvent::Progress {
                stage: ProgressStage::Upload,
                ..
            } => "upload_progress",
            EngineEvent::Progress { .. } => "analysis_progress",
            EngineEvent::AnalysisCompleted { .. } => "analysis_completed",
            EngineEvent::AnalysisFailed { .. } => "analysis_failed",
            EngineEvent::ExplorerLoaded { .. } => "explorer_loaded",
            EngineEvent::FilePreviewed { .. } => "file_previewed",
            EngineEvent::Downloaded { .. } => "downloaded",
            EngineEvent::Exported { .. } => "exported",
            EngineEvent::Notification { .. } => "notification",
            EngineEvent::Shutdown => "shutdown",
        }
    }
}
