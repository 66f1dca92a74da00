//! Message types for the application (TEA pattern)

use std::path::PathBuf;

use manus_api::{FileContent, HealthReport, StatusResponse, TaskSubmission, UploadResponse};
use manus_core::{ProjectStructure, StagedFile};

use crate::state::ViewMode;

/// A path that could not be staged, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// All possible messages/actions in the application
///
/// Messages carrying an `epoch` are responses from background tasks; they
/// are ignored when the wizard was reset after the request went out.
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // File Staging
    // ─────────────────────────────────────────────────────────
    /// User selected local paths; they are inspected in the background
    AddPaths(Vec<PathBuf>),
    /// Inspection finished
    PathsInspected {
        epoch: u64,
        files: Vec<StagedFile>,
        failures: Vec<PathFailure>,
    },
    /// Stage already-inspected files
    AddFiles(Vec<StagedFile>),
    RemoveFile(usize),
    ClearFiles,

    // ─────────────────────────────────────────────────────────
    // Upload
    // ─────────────────────────────────────────────────────────
    StartUpload,
    UploadCompleted {
        epoch: u64,
        response: Box<UploadResponse>,
    },
    UploadFailed {
        epoch: u64,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Task Submission
    // ─────────────────────────────────────────────────────────
    SetTaskDescription(String),
    /// Submit the current task description
    SubmitTask,
    /// Set the description, then submit it
    SubmitTaskWith(String),
    TaskAccepted {
        epoch: u64,
        submission: TaskSubmission,
    },
    TaskFailed {
        epoch: u64,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Status Polling
    // ─────────────────────────────────────────────────────────
    StatusReceived {
        epoch: u64,
        response: Box<StatusResponse>,
    },
    StatusFailed {
        epoch: u64,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Jump to a 1-based wizard step
    GoToStep(u8),
    /// Do whatever completes the current step
    Proceed,
    /// Start over ("new analysis")
    NewAnalysis,

    // ─────────────────────────────────────────────────────────
    // File Explorer
    // ─────────────────────────────────────────────────────────
    OpenExplorer,
    ExplorerLoaded {
        epoch: u64,
        structure: Box<ProjectStructure>,
    },
    ExplorerFailed {
        epoch: u64,
        error: String,
    },
    SearchFiles(String),
    SetViewMode(ViewMode),
    SelectFile(String),
    FileContentLoaded {
        epoch: u64,
        path: String,
        content: Box<FileContent>,
    },
    FileContentFailed {
        epoch: u64,
        error: String,
    },
    CloseExplorer,

    // ─────────────────────────────────────────────────────────
    // Download / Export
    // ─────────────────────────────────────────────────────────
    Download,
    Downloaded {
        epoch: u64,
        path: PathBuf,
        bytes: u64,
    },
    DownloadFailed {
        epoch: u64,
        error: String,
    },
    Export,
    Exported {
        path: PathBuf,
    },
    ExportFailed {
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────
    CheckHealth,
    HealthChecked(HealthReport),
    HealthFailed(String),

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Periodic tick (1s) for notification expiry and upload animation
    Tick,
    Quit,
}
