//! Analysis status polling
//!
//! The poller is a chain of `PollStatus` actions. Each response schedules
//! the next request until a terminal status, an error, the attempt ceiling,
//! or a reset (which cancels the pending timer and bumps the epoch).

use std::time::Duration;

use tracing::{debug, info, warn};

use manus_api::StatusResponse;
use manus_core::{AnalysisResult, AnalysisStatus, Error, WizardStep};

use crate::state::{ActivePoll, AppState, Phase, Progress};

use super::{UpdateAction, UpdateResult};

/// Enter the polling phase; the first request goes out immediately
pub fn start_polling(state: &mut AppState, status: AnalysisStatus) -> UpdateResult {
    state.cancel_poll();
    state.phase = Phase::Polling;
    state.progress = Some(Progress::for_status(status));
    state.poll = Some(ActivePoll::new());
    schedule_poll(state, Duration::ZERO)
}

fn schedule_poll(state: &mut AppState, delay: Duration) -> UpdateResult {
    let Some(session_id) = state.session_id().cloned() else {
        warn!("Poll requested without a session");
        state.cancel_poll();
        state.phase = Phase::Idle;
        return UpdateResult::none();
    };
    let Some(poll) = state.poll.as_mut() else {
        return UpdateResult::none();
    };

    poll.attempts += 1;
    debug!("Scheduling status check #{} in {:?}", poll.attempts, delay);

    UpdateResult::action(UpdateAction::PollStatus {
        epoch: state.epoch,
        session_id,
        delay,
        cancel_rx: poll.cancel_tx.subscribe(),
    })
}

pub fn handle_status_received(state: &mut AppState, response: StatusResponse) -> UpdateResult {
    if state.phase != Phase::Polling || state.poll.is_none() {
        debug!("Ignoring status response outside of polling");
        return UpdateResult::none();
    }

    match response.analysis_status {
        AnalysisStatus::Completed => {
            finish_analysis(state, response.result.unwrap_or_default());
            UpdateResult::none()
        }
        AnalysisStatus::Failed => {
            let reason = response
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "Analysis failed".to_string());
            fail_analysis(state, reason);
            UpdateResult::none()
        }
        status => {
            state.progress = Some(Progress::for_status(status));

            let max_attempts = state.settings.analysis.max_poll_attempts;
            let attempts = state.poll.as_ref().map(|p| p.attempts).unwrap_or(0);
            if attempts >= max_attempts {
                warn!("Giving up after {} status checks", attempts);
                stop_polling(state);
                state.progress = None;
                state
                    .notifications
                    .error(Error::PollTimeout { attempts }.to_string());
                return UpdateResult::none();
            }

            let interval = state.settings.analysis.poll_interval();
            schedule_poll(state, interval)
        }
    }
}

/// Transport errors and error envelopes end polling at once; no retry
pub fn handle_status_failed(state: &mut AppState, error: String) -> UpdateResult {
    if state.phase != Phase::Polling {
        debug!("Ignoring status error outside of polling");
        return UpdateResult::none();
    }
    fail_analysis(state, error);
    UpdateResult::none()
}

/// Store the result and show it
pub fn finish_analysis(state: &mut AppState, result: AnalysisResult) {
    info!("Analysis completed");
    stop_polling(state);
    state.analysis_result = Some(result);
    state.progress = Some(Progress::for_status(AnalysisStatus::Completed));
    state.step = WizardStep::Results;
    state.notifications.success("Analysis completed!");
}

fn fail_analysis(state: &mut AppState, reason: String) {
    warn!("Analysis failed: {}", reason);
    stop_polling(state);
    state.progress = None;
    state
        .notifications
        .error(format!("Analysis error: {}", reason));
}

fn stop_polling(state: &mut AppState) {
    state.cancel_poll();
    state.phase = Phase::Idle;
}
