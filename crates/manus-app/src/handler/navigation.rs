//! Step navigation, proceed shortcut and reset

use tracing::{debug, info};

use manus_core::WizardStep;

use crate::message::Message;
use crate::state::AppState;

use super::UpdateResult;

/// Jump to a 1-based step. Out-of-range numbers are ignored; forward jumps
/// need the target step's precondition.
pub fn handle_go_to_step(state: &mut AppState, n: u8) -> UpdateResult {
    let Some(target) = WizardStep::from_number(n) else {
        debug!("Ignoring jump to step {}", n);
        return UpdateResult::none();
    };

    if target == state.step {
        return UpdateResult::none();
    }

    if target > state.step && !state.step_reachable(target) {
        state
            .notifications
            .warning("Complete the current step first");
        return UpdateResult::none();
    }

    debug!("Step {} -> {}", state.step, target);
    state.step = target;
    UpdateResult::none()
}

/// Complete the current step if it has what it needs
pub fn handle_proceed(state: &mut AppState) -> UpdateResult {
    match state.step {
        WizardStep::Upload if !state.staged.is_empty() => {
            UpdateResult::message(Message::StartUpload)
        }
        WizardStep::Task if !state.task_description.trim().is_empty() => {
            UpdateResult::message(Message::SubmitTask)
        }
        _ => UpdateResult::none(),
    }
}

pub fn handle_new_analysis(state: &mut AppState) -> UpdateResult {
    info!("Starting new analysis (epoch {})", state.epoch + 1);
    state.reset();
    state.notifications.info("Ready for new analysis");
    UpdateResult::none()
}
