//! Download, export and health check handlers

use std::path::PathBuf;

use tracing::{debug, info, warn};

use manus_api::HealthReport;
use manus_core::SessionId;

use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// `manus_result_{id}.zip`
pub fn download_file_name(session_id: &SessionId) -> String {
    format!("manus_result_{}.zip", session_id)
}

/// `manus_analysis_{unix_millis}.json`
pub fn export_file_name(unix_millis: i64) -> String {
    format!("manus_analysis_{}.json", unix_millis)
}

pub fn handle_download(state: &mut AppState) -> UpdateResult {
    let Some(session_id) = state.session_id().cloned() else {
        state.notifications.warning("No session to download");
        return UpdateResult::none();
    };

    let dest = state
        .settings
        .ui
        .output_dir
        .join(download_file_name(&session_id));
    UpdateResult::action(UpdateAction::Download {
        epoch: state.epoch,
        session_id,
        dest,
    })
}

pub fn handle_downloaded(state: &mut AppState, path: PathBuf, bytes: u64) -> UpdateResult {
    info!("Saved {} bytes to {}", bytes, path.display());
    state.last_download = Some(path);
    state
        .notifications
        .success("Results downloaded successfully");
    UpdateResult::none()
}

pub fn handle_download_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Download failed: {}", error);
    state.notifications.error("Download failed");
    UpdateResult::none()
}

pub fn handle_export(state: &mut AppState) -> UpdateResult {
    let Some(result) = state.analysis_result.clone() else {
        state.notifications.warning("No results to export");
        return UpdateResult::none();
    };

    let millis = chrono::Utc::now().timestamp_millis();
    let dest = state.settings.ui.output_dir.join(export_file_name(millis));
    UpdateResult::action(UpdateAction::Export {
        dest,
        result: Box::new(result),
    })
}

pub fn handle_exported(state: &mut AppState, path: PathBuf) -> UpdateResult {
    info!("Exported results to {}", path.display());
    state.last_export = Some(path);
    state
        .notifications
        .success("Results exported successfully");
    UpdateResult::none()
}

pub fn handle_export_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Export failed: {}", error);
    state.notifications.error("Export failed");
    UpdateResult::none()
}

pub fn handle_check_health() -> UpdateResult {
    UpdateResult::action(UpdateAction::CheckHealth)
}

pub fn handle_health_checked(state: &mut AppState, report: HealthReport) -> UpdateResult {
    if report.is_healthy() {
        debug!(
            "API healthy (version {})",
            report.version.as_deref().unwrap_or("unknown")
        );
    } else {
        warn!("API reported status '{}'", report.status);
        state.notifications.warning("API health check failed");
    }
    UpdateResult::none()
}

pub fn handle_health_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Health check failed: {}", error);
    state.notifications.error("Unable to connect to API");
    UpdateResult::none()
}
