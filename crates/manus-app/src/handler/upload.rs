//! Upload submission handlers

use tokio::time::Instant;
use tracing::{info, warn};

use manus_api::UploadResponse;
use manus_core::WizardStep;

use crate::state::{AppState, ExplorerState, Phase, Progress, SessionInfo};

use super::{UpdateAction, UpdateResult};

pub fn handle_start_upload(state: &mut AppState) -> UpdateResult {
    if state.staged.is_empty() {
        state.notifications.warning("No files to upload");
        return UpdateResult::none();
    }
    if state.phase.is_busy() {
        state
            .notifications
            .warning("Please wait for the current request to finish");
        return UpdateResult::none();
    }

    info!("Uploading {} file(s)", state.staged.len());
    state.phase = Phase::Uploading;
    state.upload_started_at = Some(Instant::now());
    state.progress = Some(Progress::upload_frame(std::time::Duration::ZERO));

    UpdateResult::action(UpdateAction::Upload {
        epoch: state.epoch,
        files: state.staged.clone(),
    })
}

/// Replace the session wholesale and move on to the task step
pub fn handle_upload_completed(state: &mut AppState, response: UploadResponse) -> UpdateResult {
    let UploadResponse {
        session_id,
        project_structure,
        uploaded_files,
        warnings,
        ..
    } = response;

    info!(
        "Upload complete: session {} ({} files)",
        session_id, project_structure.total_files
    );

    state.phase = Phase::Idle;
    state.upload_started_at = None;
    state.progress = None;
    // A new session invalidates anything derived from the previous one
    state.analysis_result = None;
    state.explorer = ExplorerState::default();
    state.session = Some(SessionInfo {
        id: session_id,
        structure: project_structure,
        uploaded_files,
        warnings: warnings.clone(),
    });
    state.step = WizardStep::Task;

    state.notifications.success("Files uploaded successfully!");
    for warning in warnings {
        state.notifications.warning(warning);
    }
    UpdateResult::none()
}

pub fn handle_upload_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Upload failed: {}", error);
    state.phase = Phase::Idle;
    state.upload_started_at = None;
    state.progress = None;
    state.notifications.error(format!("Upload failed: {}", error));
    UpdateResult::none()
}
