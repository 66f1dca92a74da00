//! Session file explorer handlers

use tracing::{debug, warn};

use manus_api::FileContent;
use manus_core::ProjectStructure;

use crate::state::{AppState, ExplorerState};

use super::{UpdateAction, UpdateResult};

pub fn handle_open(state: &mut AppState) -> UpdateResult {
    let Some(session_id) = state.session_id().cloned() else {
        debug!("Explorer needs a session");
        return UpdateResult::none();
    };

    state.explorer.open = true;
    state.explorer.loading = true;
    UpdateResult::action(UpdateAction::LoadSessionFiles {
        epoch: state.epoch,
        session_id,
    })
}

pub fn handle_loaded(state: &mut AppState, structure: ProjectStructure) -> UpdateResult {
    if !state.explorer.open {
        return UpdateResult::none();
    }
    debug!("Explorer loaded {} files", structure.files.len());
    state.explorer.loading = false;
    state.explorer.files = structure.files;
    UpdateResult::none()
}

pub fn handle_load_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Failed to load session files: {}", error);
    state.explorer = ExplorerState::default();
    state.notifications.error("Failed to load file explorer");
    UpdateResult::none()
}

pub fn handle_search(state: &mut AppState, query: String) -> UpdateResult {
    state.explorer.query = query;
    UpdateResult::none()
}

pub fn handle_select(state: &mut AppState, path: String) -> UpdateResult {
    let Some(session_id) = state.session_id().cloned() else {
        debug!("File preview needs a session");
        return UpdateResult::none();
    };

    state.explorer.selected = Some(path.clone());
    state.explorer.preview = None;
    UpdateResult::action(UpdateAction::LoadFileContent {
        epoch: state.epoch,
        session_id,
        path,
    })
}

pub fn handle_content_loaded(
    state: &mut AppState,
    path: String,
    content: FileContent,
) -> UpdateResult {
    // A slower response for a file the user already moved away from
    if state.explorer.selected.as_deref() != Some(path.as_str()) {
        debug!("Dropping preview for {}", path);
        return UpdateResult::none();
    }
    state.explorer.preview = Some(content);
    UpdateResult::none()
}

pub fn handle_content_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Failed to load file content: {}", error);
    state.explorer.preview = None;
    state.notifications.error("Failed to load file content");
    UpdateResult::none()
}

pub fn handle_close(state: &mut AppState) -> UpdateResult {
    state.explorer = ExplorerState::default();
    UpdateResult::none()
}
