//! Main update function - handles state transitions (TEA pattern)

use tokio::time::Instant;
use tracing::debug;

use crate::message::Message;
use crate::state::{AppState, Phase, Progress};

use super::{explorer, navigation, output, poll, staging, task, upload, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        // ─────────────────────────────────────────────────────────
        // File Staging
        // ─────────────────────────────────────────────────────────
        Message::AddPaths(paths) => staging::handle_add_paths(state, paths),
        Message::PathsInspected {
            epoch,
            files,
            failures,
        } => {
            if is_stale(state, epoch, "path inspection") {
                return UpdateResult::none();
            }
            staging::handle_paths_inspected(state, files, failures)
        }
        Message::AddFiles(files) => staging::handle_add_files(state, files),
        Message::RemoveFile(index) => staging::handle_remove_file(state, index),
        Message::ClearFiles => staging::handle_clear(state),

        // ─────────────────────────────────────────────────────────
        // Upload
        // ─────────────────────────────────────────────────────────
        Message::StartUpload => upload::handle_start_upload(state),
        Message::UploadCompleted { epoch, response } => {
            if is_stale(state, epoch, "upload") {
                return UpdateResult::none();
            }
            upload::handle_upload_completed(state, *response)
        }
        Message::UploadFailed { epoch, error } => {
            if is_stale(state, epoch, "upload") {
                return UpdateResult::none();
            }
            upload::handle_upload_failed(state, error)
        }

        // ─────────────────────────────────────────────────────────
        // Task Submission
        // ─────────────────────────────────────────────────────────
        Message::SetTaskDescription(text) => task::handle_set_description(state, text),
        Message::SubmitTask => task::handle_submit(state),
        Message::SubmitTaskWith(text) => {
            task::handle_set_description(state, text);
            UpdateResult::message(Message::SubmitTask)
        }
        Message::TaskAccepted { epoch, submission } => {
            if is_stale(state, epoch, "task submission") {
                return UpdateResult::none();
            }
            task::handle_task_accepted(state, submission)
        }
        Message::TaskFailed { epoch, error } => {
            if is_stale(state, epoch, "task submission") {
                return UpdateResult::none();
            }
            task::handle_task_failed(state, error)
        }

        // ─────────────────────────────────────────────────────────
        // Status Polling
        // ─────────────────────────────────────────────────────────
        Message::StatusReceived { epoch, response } => {
            if is_stale(state, epoch, "status") {
                return UpdateResult::none();
            }
            poll::handle_status_received(state, *response)
        }
        Message::StatusFailed { epoch, error } => {
            if is_stale(state, epoch, "status") {
                return UpdateResult::none();
            }
            poll::handle_status_failed(state, error)
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::GoToStep(n) => navigation::handle_go_to_step(state, n),
        Message::Proceed => navigation::handle_proceed(state),
        Message::NewAnalysis => navigation::handle_new_analysis(state),

        // ─────────────────────────────────────────────────────────
        // File Explorer
        // ─────────────────────────────────────────────────────────
        Message::OpenExplorer => explorer::handle_open(state),
        Message::ExplorerLoaded { epoch, structure } => {
            if is_stale(state, epoch, "file listing") {
                return UpdateResult::none();
            }
            explorer::handle_loaded(state, *structure)
        }
        Message::ExplorerFailed { epoch, error } => {
            if is_stale(state, epoch, "file listing") {
                return UpdateResult::none();
            }
            explorer::handle_load_failed(state, error)
        }
        Message::SearchFiles(query) => explorer::handle_search(state, query),
        Message::SetViewMode(mode) => {
            state.explorer.view_mode = mode;
            UpdateResult::none()
        }
        Message::SelectFile(path) => explorer::handle_select(state, path),
        Message::FileContentLoaded {
            epoch,
            path,
            content,
        } => {
            if is_stale(state, epoch, "file content") {
                return UpdateResult::none();
            }
            explorer::handle_content_loaded(state, path, *content)
        }
        Message::FileContentFailed { epoch, error } => {
            if is_stale(state, epoch, "file content") {
                return UpdateResult::none();
            }
            explorer::handle_content_failed(state, error)
        }
        Message::CloseExplorer => explorer::handle_close(state),

        // ─────────────────────────────────────────────────────────
        // Download / Export / Health
        // ─────────────────────────────────────────────────────────
        Message::Download => output::handle_download(state),
        Message::Downloaded { epoch, path, bytes } => {
            if is_stale(state, epoch, "download") {
                return UpdateResult::none();
            }
            output::handle_downloaded(state, path, bytes)
        }
        Message::DownloadFailed { epoch, error } => {
            if is_stale(state, epoch, "download") {
                return UpdateResult::none();
            }
            output::handle_download_failed(state, error)
        }
        Message::Export => output::handle_export(state),
        Message::Exported { path } => output::handle_exported(state, path),
        Message::ExportFailed { error } => output::handle_export_failed(state, error),
        Message::CheckHealth => output::handle_check_health(),
        Message::HealthChecked(report) => output::handle_health_checked(state, report),
        Message::HealthFailed(error) => output::handle_health_failed(state, error),

        // ─────────────────────────────────────────────────────────
        // Lifecycle
        // ─────────────────────────────────────────────────────────
        Message::Tick => {
            let now = Instant::now();
            state.notifications.prune(now);

            if state.phase == Phase::Uploading {
                if let Some(started) = state.upload_started_at {
                    state.progress = Some(Progress::upload_frame(
                        now.saturating_duration_since(started),
                    ));
                }
            }
            UpdateResult::none()
        }

        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }
    }
}

/// A response issued before the last reset
fn is_stale(state: &AppState, epoch: u64, what: &str) -> bool {
    if epoch != state.epoch {
        debug!(
            "Dropping stale {} response (epoch {} != {})",
            what, epoch, state.epoch
        );
        return true;
    }
    false
}
