//! Response envelopes of the analysis backend
//!
//! Every JSON response carries a top-level `status` discriminator. Anything
//! other than the success sentinel is a failure whose human-readable reason
//! lives in `message` (preferred) or `error`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use manus_core::prelude::*;
use manus_core::{AnalysisResult, AnalysisStatus, ProjectStructure, SessionId, UploadedFile};

/// Success sentinel for regular endpoints
pub const STATUS_SUCCESS: &str = "success";

/// Success sentinel for the health endpoint
pub const STATUS_HEALTHY: &str = "healthy";

/// Parse a response body and check its `status` discriminator.
///
/// Returns the whole JSON object on success. Malformed bodies become
/// [`Error::Protocol`]; non-success envelopes become [`Error::Backend`] with
/// the server's message, or `fallback` when it sent none.
pub fn parse_envelope(body: &str, success_marker: &str, fallback: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::protocol(format!("invalid JSON body: {}", e)))?;

    if !value.is_object() {
        return Err(Error::protocol("response is not a JSON object"));
    }

    match value.get("status").and_then(Value::as_str) {
        Some(status) if status == success_marker => Ok(value),
        _ => Err(Error::backend(failure_message(&value, fallback))),
    }
}

/// Best available failure reason from an error envelope
pub fn failure_message(value: &Value, fallback: &str) -> String {
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Deserialize an already-validated envelope into a typed response
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::protocol(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────
// Typed responses
// ─────────────────────────────────────────────────────────────────

/// `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    pub session_id: SessionId,
    #[serde(default)]
    pub project_structure: ProjectStructure,
    #[serde(default)]
    pub uploaded_files: Vec<UploadedFile>,
    #[serde(default)]
    pub extracted_files: Vec<String>,
    /// Per-file problems the server skipped over (bad type, failed extraction)
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
}

/// `GET /api/status/{session_id}`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub analysis_status: AnalysisStatus,
    #[serde(default)]
    pub result: Option<AnalysisResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/sessions/{session_id}/files`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionFilesResponse {
    #[serde(default)]
    pub project_structure: ProjectStructure,
}

/// `GET /api/sessions/{session_id}/file/{path}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileContent {
    pub file_path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub formatted_size: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub sessions: Option<u64>,
    #[serde(default)]
    pub openai_configured: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == STATUS_HEALTHY
    }
}
