//! Task description and submission handlers

use tracing::{info, warn};

use manus_api::TaskSubmission;

use crate::state::{AppState, Phase, Progress};

use super::{poll, UpdateAction, UpdateResult};

pub fn handle_set_description(state: &mut AppState, text: String) -> UpdateResult {
    state.task_description = text;
    UpdateResult::none()
}

/// Validate locally, then submit. Every refusal happens before any request.
pub fn handle_submit(state: &mut AppState) -> UpdateResult {
    let description = state.task_description.trim().to_string();
    let max_len = state.settings.analysis.max_task_length;

    if description.is_empty() {
        state
            .notifications
            .warning("Please provide a task description");
        return UpdateResult::none();
    }
    if state.task_over_limit() {
        state.notifications.warning(format!(
            "Task description is too long (max {} characters)",
            max_len
        ));
        return UpdateResult::none();
    }
    let Some(session_id) = state.session_id().cloned() else {
        state
            .notifications
            .warning("Please upload files before describing a task");
        return UpdateResult::none();
    };
    if state.phase.is_busy() {
        state.notifications.warning("Analysis already in progress");
        return UpdateResult::none();
    }

    info!(
        "Submitting task for session {} ({} chars)",
        session_id,
        description.chars().count()
    );
    // A rerun replaces the previous result; Results stays unreachable until it lands
    state.analysis_result = None;
    state.phase = Phase::Submitting;
    state.progress = Some(Progress::new(0, "Starting analysis..."));

    UpdateResult::action(UpdateAction::SubmitTask {
        epoch: state.epoch,
        session_id,
        description,
    })
}

pub fn handle_task_accepted(state: &mut AppState, submission: TaskSubmission) -> UpdateResult {
    if state.phase != Phase::Submitting {
        warn!("Ignoring task acknowledgement in phase {:?}", state.phase);
        return UpdateResult::none();
    }

    match submission {
        TaskSubmission::Completed(result) => {
            poll::finish_analysis(state, *result);
            UpdateResult::none()
        }
        TaskSubmission::Accepted { status } => {
            state.notifications.success("Analysis started!");
            poll::start_polling(state, status)
        }
    }
}

pub fn handle_task_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Task submission failed: {}", error);
    state.phase = Phase::Idle;
    state.progress = None;
    state
        .notifications
        .error(format!("Analysis failed: {}", error));
    UpdateResult::none()
}
