//! Backend operations
//!
//! This module provides the Backend trait for talking to the analysis
//! server. The wizard engine only ever sees this trait; the HTTP client and
//! the scripted test double both implement it.

use std::path::Path;

use manus_core::prelude::*;
use manus_core::{ProjectStructure, SessionId, StagedFile};

use crate::contract::TaskSubmission;
use crate::protocol::{FileContent, HealthReport, StatusResponse, UploadResponse};

/// Analysis backend operations
#[trait_variant::make(Backend: Send)]
pub trait LocalBackend {
    /// Upload staged files as one multipart request, opening a session
    async fn upload(&self, files: &[StagedFile]) -> Result<UploadResponse>;

    /// Submit a natural-language task against an uploaded session
    async fn submit_task(&self, session_id: &SessionId, description: &str)
        -> Result<TaskSubmission>;

    /// Current status of the session's analysis
    async fn analysis_status(&self, session_id: &SessionId) -> Result<StatusResponse>;

    /// File listing of the session workspace
    async fn session_files(&self, session_id: &SessionId) -> Result<ProjectStructure>;

    /// Content of one workspace file
    async fn file_content(&self, session_id: &SessionId, path: &str) -> Result<FileContent>;

    /// Stream the session's result archive to `dest`, returning bytes written
    async fn download(&self, session_id: &SessionId, dest: &Path) -> Result<u64>;

    /// Liveness probe
    async fn health(&self) -> Result<HealthReport>;
}
