//! Staged file list handlers

use std::path::PathBuf;

use tracing::debug;

use manus_core::StagedFile;

use crate::message::PathFailure;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Paths are stat'ed in the background before they can be validated
pub fn handle_add_paths(state: &mut AppState, paths: Vec<PathBuf>) -> UpdateResult {
    if paths.is_empty() {
        state.notifications.warning("No valid files selected");
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::InspectPaths {
        epoch: state.epoch,
        paths,
    })
}

pub fn handle_paths_inspected(
    state: &mut AppState,
    files: Vec<StagedFile>,
    failures: Vec<PathFailure>,
) -> UpdateResult {
    for failure in failures {
        state.notifications.error(format!(
            "Cannot read \"{}\": {}",
            failure.path.display(),
            failure.reason
        ));
    }
    handle_add_files(state, files)
}

/// Append every file that passes the policy, in arrival order
pub fn handle_add_files(state: &mut AppState, files: Vec<StagedFile>) -> UpdateResult {
    let mut added = 0usize;

    for file in files {
        match state.policy.validate(&file.name, file.size) {
            Ok(()) => {
                state.staged.push(file);
                added += 1;
            }
            Err(rejection) => {
                debug!("Rejected {}: {}", file.name, rejection);
                if rejection.is_error() {
                    state.notifications.error(rejection.to_string());
                } else {
                    state.notifications.warning(rejection.to_string());
                }
            }
        }
    }

    if added == 0 {
        state.notifications.warning("No valid files selected");
    } else {
        state
            .notifications
            .success(format!("{} file(s) added", added));
    }
    UpdateResult::none()
}

pub fn handle_remove_file(state: &mut AppState, index: usize) -> UpdateResult {
    if index >= state.staged.len() {
        debug!(
            "Ignoring remove of index {} ({} staged)",
            index,
            state.staged.len()
        );
        return UpdateResult::none();
    }

    state.staged.remove(index);
    state.notifications.info("File removed");
    UpdateResult::none()
}

pub fn handle_clear(state: &mut AppState) -> UpdateResult {
    state.staged.clear();
    state.notifications.info("All files cleared");
    UpdateResult::none()
}
