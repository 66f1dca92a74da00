//! Headless mode - JSON event output
//!
//! The client has no UI of its own: everything the wizard does is reported
//! on stdout as NDJSON (newline-delimited JSON), one event per line. Each
//! event has an "event" field indicating its type and a millisecond
//! "timestamp".
//!
//! # Example Output
//!
//! ```json
//! {"event":"files_staged","count":2,"total_size":3072,"timestamp":1704700001000}
//! {"event":"session_created","session_id":"9f1c","total_files":2,"timestamp":1704700002000}
//! {"event":"analysis_progress","percent":50,"label":"AI analysis in progress...","timestamp":1704700004000}
//! ```

pub mod runner;

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use manus_api::HealthReport;
use manus_app::{AppState, EngineEvent, ProgressStage};
use manus_core::{AnalysisResult, NotificationLevel};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    StepChanged {
        from: u8,
        to: u8,
        section: String,
        timestamp: i64,
    },

    FilesStaged {
        count: usize,
        total_size: u64,
        timestamp: i64,
    },

    UploadStarted { files: usize, timestamp: i64 },

    UploadProgress {
        percent: u8,
        label: String,
        timestamp: i64,
    },

    SessionCreated {
        session_id: String,
        total_files: u64,
        timestamp: i64,
    },

    AnalysisStarted { session_id: String, timestamp: i64 },

    AnalysisProgress {
        percent: u8,
        label: String,
        timestamp: i64,
    },

    AnalysisCompleted {
        summary: Option<String>,
        timestamp: i64,
    },

    AnalysisFailed { message: String, timestamp: i64 },

    /// Full analysis result (unattended runs only)
    Result {
        result: Box<AnalysisResult>,
        timestamp: i64,
    },

    Notification {
        id: u64,
        level: NotificationLevel,
        message: String,
        timestamp: i64,
    },

    ExplorerLoaded { files: usize, timestamp: i64 },

    FilePreviewed {
        path: String,
        size: u64,
        timestamp: i64,
    },

    Downloaded { path: PathBuf, timestamp: i64 },

    Exported { path: PathBuf, timestamp: i64 },

    ReportWritten { path: PathBuf, timestamp: i64 },

    Reset { epoch: u64, timestamp: i64 },

    /// Answer to the `status` command
    Status {
        step: u8,
        phase: String,
        staged: usize,
        session_id: Option<String>,
        has_result: bool,
        elapsed: String,
        timestamp: i64,
    },

    Health {
        healthy: bool,
        status: String,
        version: Option<String>,
        sessions: Option<u64>,
        openai_configured: Option<bool>,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    Shutdown { timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Event type name, as written in the "event" field
    pub fn name(&self) -> &'static str {
        match self {
            HeadlessEvent::StepChanged { .. } => "step_changed",
            HeadlessEvent::FilesStaged { .. } => "files_staged",
            HeadlessEvent::UploadStarted { .. } => "upload_started",
            HeadlessEvent::UploadProgress { .. } => "upload_progress",
            HeadlessEvent::SessionCreated { .. } => "session_created",
            HeadlessEvent::AnalysisStarted { .. } => "analysis_started",
            HeadlessEvent::AnalysisProgress { .. } => "analysis_progress",
            HeadlessEvent::AnalysisCompleted { .. } => "analysis_completed",
            HeadlessEvent::AnalysisFailed { .. } => "analysis_failed",
            HeadlessEvent::Result { .. } => "result",
            HeadlessEvent::Notification { .. } => "notification",
            HeadlessEvent::ExplorerLoaded { .. } => "explorer_loaded",
            HeadlessEvent::FilePreviewed { .. } => "file_previewed",
            HeadlessEvent::Downloaded { .. } => "downloaded",
            HeadlessEvent::Exported { .. } => "exported",
            HeadlessEvent::ReportWritten { .. } => "report_written",
            HeadlessEvent::Reset { .. } => "reset",
            HeadlessEvent::Status { .. } => "status",
            HeadlessEvent::Health { .. } => "health",
            HeadlessEvent::Error { .. } => "error",
            HeadlessEvent::Shutdown { .. } => "shutdown",
        }
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }

    pub fn result(result: &AnalysisResult) -> Self {
        Self::Result {
            result: Box::new(result.clone()),
            timestamp: Self::now(),
        }
    }

    pub fn report_written(path: PathBuf) -> Self {
        Self::ReportWritten {
            path,
            timestamp: Self::now(),
        }
    }

    pub fn status(state: &AppState) -> Self {
        let phase = serde_json::to_value(state.phase)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        Self::Status {
            step: state.step.number(),
            phase,
            staged: state.staged.len(),
            session_id: state.session_id().map(|id| id.to_string()),
            has_result: state.analysis_result.is_some(),
            elapsed: state.clock.display(),
            timestamp: Self::now(),
        }
    }

    pub fn health(report: &HealthReport) -> Self {
        Self::Health {
            healthy: report.is_healthy(),
            status: report.status.clone(),
            version: report.version.clone(),
            sessions: report.sessions,
            openai_configured: report.openai_configured,
            timestamp: Self::now(),
        }
    }

    /// Translate an engine event
    pub fn from_engine(event: &EngineEvent) -> Self {
        let timestamp = Self::now();
        match event.clone() {
            EngineEvent::StepChanged { from, to } => Self::StepChanged {
                from: from.number(),
                to: to.number(),
                section: to.section_name().to_string(),
                timestamp,
            },
            EngineEvent::FilesStaged { count, total_size } => Self::FilesStaged {
                count,
                total_size,
                timestamp,
            },
            EngineEvent::Reset { epoch } => Self::Reset { epoch, timestamp },
            EngineEvent::UploadStarted { files } => Self::UploadStarted { files, timestamp },
            EngineEvent::SessionCreated {
                session_id,
                total_files,
            } => Self::SessionCreated {
                session_id: session_id.to_string(),
                total_files,
                timestamp,
            },
            EngineEvent::AnalysisStarted { session_id } => Self::AnalysisStarted {
                session_id: session_id.to_string(),
                timestamp,
            },
            EngineEvent::Progress {
                stage: ProgressStage::Upload,
                percent,
                label,
            } => Self::UploadProgress {
                percent,
                label,
                timestamp,
            },
            EngineEvent::Progress { percent, label, .. } => Self::AnalysisProgress {
                percent,
                label,
                timestamp,
            },
            EngineEvent::AnalysisCompleted { summary } => {
                Self::AnalysisCompleted { summary, timestamp }
            }
            EngineEvent::AnalysisFailed { message } => Self::AnalysisFailed { message, timestamp },
            EngineEvent::ExplorerLoaded { files } => Self::ExplorerLoaded { files, timestamp },
            EngineEvent::FilePreviewed { path, size } => Self::FilePreviewed {
                path,
                size,
                timestamp,
            },
            EngineEvent::Downloaded { path } => Self::Downloaded { path, timestamp },
            EngineEvent::Exported { path } => Self::Exported { path, timestamp },
            EngineEvent::Notification { id, level, message } => Self::Notification {
                id,
                level,
                message,
                timestamp,
            },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}

/// Destination for headless events
pub trait EventSink {
    fn emit(&mut self, event: HeadlessEvent);
}

/// Writes every event to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn emit(&mut self, event: HeadlessEvent) {
        event.emit();
    }
}

/// Collects events in memory
impl EventSink for Vec<HeadlessEvent> {
    fn emit(&mut self, event: HeadlessEvent) {
        self.push(event);
    }
}
