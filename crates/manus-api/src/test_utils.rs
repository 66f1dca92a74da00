//! Test utilities for backend consumers
//!
//! Provides [`FakeBackend`], a scripted in-memory [`Backend`] that records
//! every call, plus helpers for building typical responses.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::Instant;

use manus_core::prelude::*;
use manus_core::{
    AnalysisResult, AnalysisStatus, ProjectFile, ProjectStructure, SessionId, StagedFile,
    UploadedFile,
};

use crate::backend::Backend;
use crate::contract::TaskSubmission;
use crate::protocol::{FileContent, HealthReport, StatusResponse, UploadResponse};

/// Bytes written by [`FakeBackend::download`]
pub const FAKE_ARCHIVE: &[u8] = b"PK\x03\x04fake-archive";

/// A call observed by [`FakeBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Upload { file_names: Vec<String> },
    SubmitTask { session_id: String, description: String },
    Status { session_id: String },
    SessionFiles { session_id: String },
    FileContent { session_id: String, path: String },
    Download { session_id: String, dest: PathBuf },
    Health,
}

/// Scripted response: `Err` holds a backend failure message
type Scripted<T> = VecDeque<std::result::Result<T, String>>;

#[derive(Default)]
struct FakeState {
    uploads: Scripted<UploadResponse>,
    submissions: Scripted<TaskSubmission>,
    statuses: Scripted<StatusResponse>,
    session_files: Scripted<ProjectStructure>,
    file_contents: Scripted<FileContent>,
    downloads: Scripted<()>,
    health: Scripted<HealthReport>,
    calls: Vec<FakeCall>,
    status_times: Vec<Instant>,
}

/// In-memory backend driven by queued responses.
///
/// Each operation pops the next scripted response for its kind. An empty
/// queue answers with a backend error, so a runaway poll loop fails loudly
/// instead of spinning.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        // A panicking test already failed; keep the data usable for others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push_upload(&self, response: std::result::Result<UploadResponse, String>) -> &Self {
        self.lock().uploads.push_back(response);
        self
    }

    pub fn push_submission(&self, response: std::result::Result<TaskSubmission, String>) -> &Self {
        self.lock().submissions.push_back(response);
        self
    }

    pub fn push_status(&self, response: std::result::Result<StatusResponse, String>) -> &Self {
        self.lock().statuses.push_back(response);
        self
    }

    pub fn push_session_files(
        &self,
        response: std::result::Result<ProjectStructure, String>,
    ) -> &Self {
        self.lock().session_files.push_back(response);
        self
    }

    pub fn push_file_content(&self, response: std::result::Result<FileContent, String>) -> &Self {
        self.lock().file_contents.push_back(response);
        self
    }

    pub fn push_download(&self, response: std::result::Result<(), String>) -> &Self {
        self.lock().downloads.push_back(response);
        self
    }

    pub fn push_health(&self, response: std::result::Result<HealthReport, String>) -> &Self {
        self.lock().health.push_back(response);
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<FakeCall> {
        self.lock().calls.clone()
    }

    /// Number of status requests made so far
    pub fn status_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, FakeCall::Status { .. }))
            .count()
    }

    /// Instants at which status requests arrived
    pub fn status_call_times(&self) -> Vec<Instant> {
        self.lock().status_times.clone()
    }

    fn next<T>(
        &self,
        call: FakeCall,
        pick: impl FnOnce(&mut FakeState) -> &mut Scripted<T>,
        what: &str,
    ) -> Result<T> {
        let mut state = self.lock();
        if matches!(call, FakeCall::Status { .. }) {
            state.status_times.push(Instant::now());
        }
        state.calls.push(call);
        match pick(&mut *state).pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(Error::backend(message)),
            None => Err(Error::backend(format!("no scripted {} response", what))),
        }
    }
}

impl Backend for FakeBackend {
    async fn upload(&self, files: &[StagedFile]) -> Result<UploadResponse> {
        let file_names = files.iter().map(|f| f.name.clone()).collect();
        self.next(FakeCall::Upload { file_names }, |s| &mut s.uploads, "upload")
    }

    async fn submit_task(
        &self,
        session_id: &SessionId,
        description: &str,
    ) -> Result<TaskSubmission> {
        let call = FakeCall::SubmitTask {
            session_id: session_id.to_string(),
            description: description.to_string(),
        };
        self.next(call, |s| &mut s.submissions, "submission")
    }

    async fn analysis_status(&self, session_id: &SessionId) -> Result<StatusResponse> {
        let call = FakeCall::Status {
            session_id: session_id.to_string(),
        };
        self.next(call, |s| &mut s.statuses, "status")
    }

    async fn session_files(&self, session_id: &SessionId) -> Result<ProjectStructure> {
        let call = FakeCall::SessionFiles {
            session_id: session_id.to_string(),
        };
        self.next(call, |s| &mut s.session_files, "session files")
    }

    async fn file_content(&self, session_id: &SessionId, path: &str) -> Result<FileContent> {
        let call = FakeCall::FileContent {
            session_id: session_id.to_string(),
            path: path.to_string(),
        };
        self.next(call, |s| &mut s.file_contents, "file content")
    }

    async fn download(&self, session_id: &SessionId, dest: &Path) -> Result<u64> {
        let call = FakeCall::Download {
            session_id: session_id.to_string(),
            dest: dest.to_path_buf(),
        };
        self.next(call, |s| &mut s.downloads, "download")?;
        tokio::fs::write(dest, FAKE_ARCHIVE).await?;
        Ok(FAKE_ARCHIVE.len() as u64)
    }

    async fn health(&self) -> Result<HealthReport> {
        self.next(FakeCall::Health, |s| &mut s.health, "health")
    }
}

// ─────────────────────────────────────────────────────────────────
// Response builders
// ─────────────────────────────────────────────────────────────────

/// A successful upload of `names` into session `session_id`
pub fn upload_ok(session_id: &str, names: &[&str]) -> UploadResponse {
    let mut structure = ProjectStructure {
        total_files: names.len() as u64,
        total_size: 1024 * names.len() as u64,
        ..Default::default()
    };
    for name in names {
        if let Some(ext) = manus_core::extension_of(name) {
            *structure.file_types.entry(format!(".{}", ext)).or_insert(0) += 1;
        }
    }

    UploadResponse {
        session_id: SessionId::new(session_id),
        project_structure: structure,
        uploaded_files: names
            .iter()
            .map(|name| UploadedFile {
                filename: name.to_string(),
                size: 1024,
                ..Default::default()
            })
            .collect(),
        extracted_files: Vec::new(),
        warnings: Vec::new(),
        processing_time: None,
    }
}

/// A status response with no result attached
pub fn status(analysis_status: AnalysisStatus) -> StatusResponse {
    StatusResponse {
        analysis_status,
        ..Default::default()
    }
}

/// A completed status carrying `result`
pub fn completed(result: AnalysisResult) -> StatusResponse {
    StatusResponse {
        analysis_status: AnalysisStatus::Completed,
        result: Some(result),
        error: None,
    }
}

/// A failed status with an optional server error
pub fn failed(error: Option<&str>) -> StatusResponse {
    StatusResponse {
        analysis_status: AnalysisStatus::Failed,
        result: None,
        error: error.map(str::to_string),
    }
}

/// A fairly complete analysis result
pub fn sample_result() -> AnalysisResult {
    serde_json::from_value(serde_json::json!({
        "summary": "The project is a small Flask service.",
        "recommendations": ["Add unit tests", "Pin dependencies"],
        "code_changes": [{
            "file": "app.py",
            "description": "Validate input",
            "type": "modification",
            "code": "if not data:\n    return error()"
        }],
        "security_issues": ["Debug mode enabled"],
        "performance_issues": [],
        "next_steps": ["Deploy behind gunicorn"],
        "analysis": {
            "task_type": "code_review",
            "main_language": "python",
            "complexity": "medium",
            "files_analyzed": 3
        }
    }))
    .unwrap_or_default()
}

/// A session file listing with the given paths
pub fn project_with_files(paths: &[&str]) -> ProjectStructure {
    ProjectStructure {
        total_files: paths.len() as u64,
        files: paths
            .iter()
            .map(|path| ProjectFile {
                path: path.to_string(),
                size: 100,
                extension: manus_core::extension_of(path).map(|e| format!(".{}", e)),
                kind: manus_core::FileCategory::from_name(path).to_string(),
                formatted_size: Some("100 B".to_string()),
            })
            .collect(),
        ..Default::default()
    }
}

/// A healthy report
pub fn healthy() -> HealthReport {
    HealthReport {
        status: crate::protocol::STATUS_HEALTHY.to_string(),
        version: Some("2.0.0".to_string()),
        ..Default::default()
    }
}
