//! Core domain types for the Manus client

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::file_policy::{extension_of, FileCategory};

// ─────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────

/// Opaque server-assigned session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────
// Staged files
// ─────────────────────────────────────────────────────────────────

/// A local file selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Display name (final path component)
    pub name: String,
    /// Location on disk, read when the upload is sent
    pub path: PathBuf,
    /// Size in bytes at selection time
    pub size: u64,
    /// Last modification time, when the filesystem reports one
    pub last_modified: Option<DateTime<Utc>>,
}

impl StagedFile {
    pub fn new(path: impl Into<PathBuf>, size: u64, last_modified: Option<DateTime<Utc>>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            name,
            path,
            size,
            last_modified,
        }
    }

    /// Lowercased extension, see [`extension_of`]
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_name(&self.name)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

// ─────────────────────────────────────────────────────────────────
// Project structure (server-side summary of an upload)
// ─────────────────────────────────────────────────────────────────

/// Aggregate metadata about an uploaded file set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectStructure {
    pub total_files: u64,
    pub total_size: u64,
    pub formatted_size: Option<String>,
    pub file_categories: BTreeMap<String, u64>,
    /// Extension (with leading dot, as reported by the server) to count
    pub file_types: BTreeMap<String, u64>,
    pub code_files_count: u64,
    pub media_files_count: u64,
    pub large_files_count: u64,
    /// Per-file listing; only the file-browse endpoint fills this
    pub files: Vec<ProjectFile>,
}

impl ProjectStructure {
    /// Extensions sorted by count descending, at most `limit` entries.
    /// Ties keep alphabetical order.
    pub fn top_file_types(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut types: Vec<(&str, u64)> = self
            .file_types
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        types.sort_by(|a, b| b.1.cmp(&a.1));
        types.truncate(limit);
        types
    }
}

/// One file inside an uploaded session workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFile {
    pub path: String,
    pub size: u64,
    pub extension: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub formatted_size: Option<String>,
}

/// Server receipt for one uploaded file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadedFile {
    pub filename: String,
    pub original_name: Option<String>,
    pub size: u64,
    pub formatted_size: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Analysis
// ─────────────────────────────────────────────────────────────────

/// Lifecycle of a server-side analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    #[default]
    NotStarted,
    Pending,
    Running,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }

    /// Progress shown for this status: (percent, label)
    pub fn progress(&self) -> (u8, &'static str) {
        match self {
            AnalysisStatus::NotStarted | AnalysisStatus::Pending => (0, "Starting analysis..."),
            AnalysisStatus::Running => (50, "AI analysis in progress..."),
            AnalysisStatus::Completed => (100, "Analysis completed!"),
            AnalysisStatus::Failed => (0, "Analysis failed"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::NotStarted => "not_started",
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Running => "running",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }
}

/// Metadata block of an analysis result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisMetadata {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub task_type: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub main_language: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub complexity: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_count"
    )]
    pub files_analyzed: Option<u64>,
}

// The metadata block is written by the model, so its types drift: `"3"`,
// `3.0` and `3` all mean three files. Anything unusable becomes `None`.

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(whole_count)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_count))
        }
        _ => None,
    })
}

fn whole_count(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then(|| f as u64)
}

/// A suggested change to one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeChange {
    pub file: String,
    pub description: String,
    /// `modification`, `addition` or `deletion`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Structured AI output for a submitted task
///
/// Unknown fields are kept in `extra` so an exported result matches what the
/// server sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub recommendations: Vec<String>,
    pub code_changes: Vec<CodeChange>,
    pub security_issues: Vec<String>,
    pub performance_issues: Vec<String>,
    pub next_steps: Vec<String>,
    pub analysis: AnalysisMetadata,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AnalysisResult {
    /// Result carrying only a summary, used for plain-text solutions
    pub fn from_summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Default::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Wizard
// ─────────────────────────────────────────────────────────────────

/// Position in the 3-step wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    #[default]
    Upload,
    Task,
    Results,
}

/// Visual state of one step indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepIndicator {
    Cleared,
    Active,
    Completed,
}

/// Everything a view needs to draw the step navigator.
///
/// Always derived from a [`WizardStep`], so section visibility and
/// indicator state cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub visible_section: &'static str,
    pub indicators: [StepIndicator; 3],
    pub connectors: [bool; 2],
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Upload, WizardStep::Task, WizardStep::Results];

    /// Map a 1-based step number; anything outside 1..=3 is `None`
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(WizardStep::Upload),
            2 => Some(WizardStep::Task),
            3 => Some(WizardStep::Results),
            _ => None,
        }
    }

    /// 1-based step number
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Upload => 1,
            WizardStep::Task => 2,
            WizardStep::Results => 3,
        }
    }

    pub fn section_name(&self) -> &'static str {
        match self {
            WizardStep::Upload => "upload",
            WizardStep::Task => "task",
            WizardStep::Results => "results",
        }
    }

    pub fn view(&self) -> StepView {
        let current = self.number();
        let mut indicators = [StepIndicator::Cleared; 3];
        for (index, indicator) in indicators.iter_mut().enumerate() {
            let position = index as u8 + 1;
            *indicator = if position == current {
                StepIndicator::Active
            } else if position < current {
                StepIndicator::Completed
            } else {
                StepIndicator::Cleared
            };
        }

        let mut connectors = [false; 2];
        for (index, connector) in connectors.iter_mut().enumerate() {
            *connector = (index as u8 + 1) < current;
        }

        StepView {
            visible_section: self.section_name(),
            indicators,
            connectors,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}

// ─────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }
}
