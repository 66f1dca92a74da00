//! Template view models
//!
//! Plain serializable structs the templates read from. All formatting
//! decisions (placeholders, sizes, language tags) are made here so the
//! templates stay dumb.

use serde::Serialize;

use manus_api::FileContent;
use manus_core::{
    format_file_size, language_for_file, AnalysisMetadata, AnalysisResult, FileCategory,
    ProjectStructure, StagedFile, StepIndicator,
};

use crate::state::{AppState, ExplorerState};

/// Shown for a metric the analysis did not report
pub const PLACEHOLDER: &str = "-";

/// Extensions listed in the project overview
pub const TOP_FILE_TYPES: usize = 10;

fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MetricsView {
    pub task_type: String,
    pub main_language: String,
    pub complexity: String,
    pub files_analyzed: String,
}

impl From<&AnalysisMetadata> for MetricsView {
    fn from(meta: &AnalysisMetadata) -> Self {
        Self {
            task_type: or_placeholder(meta.task_type.as_deref()),
            main_language: or_placeholder(meta.main_language.as_deref()),
            complexity: or_placeholder(meta.complexity.as_deref()),
            // zero files is a real answer, not a missing one
            files_analyzed: meta
                .files_analyzed
                .map(|n| n.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CodeChangeView {
    pub file: String,
    pub description: String,
    pub kind: String,
    pub code: Option<String>,
    pub language: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResultsView {
    pub metrics: MetricsView,
    pub summary: Option<String>,
    pub recommendations: Vec<String>,
    pub code_changes: Vec<CodeChangeView>,
    pub security_issues: Vec<String>,
    pub performance_issues: Vec<String>,
    pub next_steps: Vec<String>,
}

impl From<&AnalysisResult> for ResultsView {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            metrics: MetricsView::from(&result.analysis),
            summary: result.summary.clone().filter(|s| !s.is_empty()),
            recommendations: result.recommendations.clone(),
            code_changes: result
                .code_changes
                .iter()
                .map(|change| CodeChangeView {
                    file: change.file.clone(),
                    description: change.description.clone(),
                    kind: change.kind.clone(),
                    code: change.code.clone().filter(|c| !c.is_empty()),
                    language: language_for_file(&change.file),
                })
                .collect(),
            security_issues: result.security_issues.clone(),
            performance_issues: result.performance_issues.clone(),
            next_steps: result.next_steps.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Staged files
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StagedFileView {
    pub name: String,
    pub size: String,
    pub category: &'static str,
    pub icon: &'static str,
    pub modified: String,
}

#[derive(Debug, Serialize)]
pub struct FileListView {
    pub items: Vec<StagedFileView>,
    pub count_label: String,
    pub total_size: String,
}

impl FileListView {
    pub fn new(files: &[StagedFile]) -> Self {
        let items = files
            .iter()
            .map(|file| {
                let category = FileCategory::from_name(&file.name);
                StagedFileView {
                    name: file.name.clone(),
                    size: format_file_size(file.size),
                    category: category.as_str(),
                    icon: FileCategory::icon_for_type(category.as_str()),
                    modified: file
                        .last_modified
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                }
            })
            .collect();

        let total: u64 = files.iter().map(|f| f.size).sum();
        let count_label = if files.len() == 1 {
            "1 file".to_string()
        } else {
            format!("{} files", files.len())
        };

        Self {
            items,
            count_label,
            total_size: format_file_size(total),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Project overview
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FileTypeCount {
    pub extension: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct OverviewView {
    pub total_files: u64,
    pub total_size: String,
    pub code_files: u64,
    pub media_files: u64,
    pub file_types: Vec<FileTypeCount>,
}

impl From<&ProjectStructure> for OverviewView {
    fn from(structure: &ProjectStructure) -> Self {
        Self {
            total_files: structure.total_files,
            total_size: structure
                .formatted_size
                .clone()
                .unwrap_or_else(|| format_file_size(structure.total_size)),
            code_files: structure.code_files_count,
            media_files: structure.media_files_count,
            file_types: structure
                .top_file_types(TOP_FILE_TYPES)
                .into_iter()
                .map(|(extension, count)| FileTypeCount {
                    extension: extension.to_string(),
                    count,
                })
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Explorer
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExplorerEntryView {
    pub path: String,
    pub size: String,
    pub icon: &'static str,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct PreviewView {
    pub path: String,
    pub content: String,
    pub size: String,
    pub kind: String,
    pub language: &'static str,
}

impl From<&FileContent> for PreviewView {
    fn from(content: &FileContent) -> Self {
        Self {
            path: content.file_path.clone(),
            content: content.content.clone(),
            size: content
                .formatted_size
                .clone()
                .unwrap_or_else(|| format_file_size(content.size)),
            kind: content.kind.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            language: language_for_file(&content.file_path),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExplorerView {
    pub view_mode: &'static str,
    pub query: String,
    pub loading: bool,
    pub total: usize,
    pub shown: usize,
    pub files: Vec<ExplorerEntryView>,
    pub preview: Option<PreviewView>,
}

impl From<&ExplorerState> for ExplorerView {
    fn from(explorer: &ExplorerState) -> Self {
        let files: Vec<ExplorerEntryView> = explorer
            .filtered()
            .into_iter()
            .map(|file| ExplorerEntryView {
                path: file.path.clone(),
                size: file
                    .formatted_size
                    .clone()
                    .unwrap_or_else(|| format_file_size(file.size)),
                icon: FileCategory::icon_for_type(&file.kind),
                selected: explorer.selected.as_deref() == Some(file.path.as_str()),
            })
            .collect();

        Self {
            view_mode: match explorer.view_mode {
                crate::state::ViewMode::List => "list",
                crate::state::ViewMode::Grid => "grid",
            },
            query: explorer.query.clone(),
            loading: explorer.loading,
            total: explorer.files.len(),
            shown: files.len(),
            files,
            preview: explorer.preview.as_ref().map(PreviewView::from),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Report page
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StepView {
    pub number: u8,
    pub name: &'static str,
    pub state: StepIndicator,
    pub connector_active: bool,
}

#[derive(Debug, Serialize)]
pub struct ReportView {
    pub title: &'static str,
    pub session_id: Option<String>,
    pub elapsed: String,
    pub steps: Vec<StepView>,
    pub task: Option<String>,
    pub overview: Option<OverviewView>,
    pub result: Option<ResultsView>,
}

impl From<&AppState> for ReportView {
    fn from(state: &AppState) -> Self {
        let view = state.step.view();
        let steps = manus_core::WizardStep::ALL
            .iter()
            .enumerate()
            .map(|(index, step)| StepView {
                number: step.number(),
                name: step.section_name(),
                state: view.indicators[index],
                connector_active: view.connectors.get(index).copied().unwrap_or(false),
            })
            .collect();

        let task = state.task_description.trim();

        Self {
            title: "Manus Analysis Report",
            session_id: state.session_id().map(|id| id.to_string()),
            elapsed: state.clock.display(),
            steps,
            task: (!task.is_empty()).then(|| task.to_string()),
            overview: state
                .session
                .as_ref()
                .map(|s| OverviewView::from(&s.structure)),
            result: state.analysis_result.as_ref().map(ResultsView::from),
        }
    }
}
