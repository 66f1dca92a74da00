//! Tests for handler module

use std::path::PathBuf;

use super::*;
use crate::message::{Message, PathFailure};
use crate::state::{AppState, Phase, ViewMode};
use manus_api::test_utils::{
    completed, failed, healthy, project_with_files, sample_result, status, upload_ok,
};
use manus_api::{FileContent, HealthReport, TaskSubmission};
use manus_core::{AnalysisStatus, NotificationLevel, StagedFile, WizardStep};

fn staged(name: &str, size: u64) -> StagedFile {
    StagedFile::new(PathBuf::from("/work").join(name), size, None)
}

fn last_message(state: &AppState) -> Option<(NotificationLevel, String)> {
    state
        .notifications
        .latest()
        .map(|n| (n.level, n.message.clone()))
}

/// State right after a successful upload of `a.py` and `b.py` into `s1`
fn uploaded_state() -> AppState {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::AddFiles(vec![staged("a.py", 10), staged("b.py", 20)]),
    );
    let result = update(&mut state, Message::StartUpload);
    assert!(matches!(result.action, Some(UpdateAction::Upload { .. })));
    let epoch = state.epoch;
    update(
        &mut state,
        Message::UploadCompleted {
            epoch,
            response: Box::new(upload_ok("s1", &["a.py", "b.py", "c.md"])),
        },
    );
    state
}

/// State with a submitted task, waiting for the async acknowledgement
fn submitted_state() -> AppState {
    let mut state = uploaded_state();
    let result = update(&mut state, Message::SubmitTaskWith("Review".into()));
    // SubmitTaskWith forwards to SubmitTask
    let follow = result.message.expect("follow-up submit");
    let result = update(&mut state, follow);
    assert!(matches!(result.action, Some(UpdateAction::SubmitTask { .. })));
    state
}

/// State polling session `s1`, with one status request issued
fn polling_state() -> AppState {
    let mut state = submitted_state();
    let epoch = state.epoch;
    let result = update(
        &mut state,
        Message::TaskAccepted {
            epoch,
            submission: TaskSubmission::Accepted {
                status: AnalysisStatus::Pending,
            },
        },
    );
    assert!(matches!(
        result.action,
        Some(UpdateAction::PollStatus { delay, .. }) if delay.is_zero()
    ));
    state
}

// ─────────────────────────────────────────────────────────
// Staging
// ─────────────────────────────────────────────────────────

#[test]
fn test_add_files_keeps_order_and_reports_count() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::AddFiles(vec![staged("a.py", 1), staged("b.js", 2)]),
    );

    let names: Vec<_> = state.staged.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.py", "b.js"]);
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Success, "2 file(s) added".into()))
    );
}

#[test]
fn test_add_files_rejects_invalid_and_keeps_sequence() {
    let mut state = AppState::new();
    update(&mut state, Message::AddFiles(vec![staged("a.py", 1)]));

    update(
        &mut state,
        Message::AddFiles(vec![staged("setup.exe", 5), staged("huge.py", 600 * 1024 * 1024)]),
    );

    assert_eq!(state.staged.len(), 1);
    assert_eq!(state.staged[0].name, "a.py");

    let levels: Vec<_> = state.notifications.iter().map(|n| n.level).collect();
    assert!(levels.contains(&NotificationLevel::Warning));
    assert!(levels.contains(&NotificationLevel::Error));
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Warning, "No valid files selected".into()))
    );
}

#[test]
fn test_add_paths_spawns_inspection() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::AddPaths(vec![PathBuf::from("x.py")]));
    assert!(matches!(
        result.action,
        Some(UpdateAction::InspectPaths { epoch: 0, ref paths }) if paths.len() == 1
    ));

    let result = update(&mut state, Message::AddPaths(Vec::new()));
    assert!(result.action.is_none());
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Warning, "No valid files selected".into()))
    );
}

#[test]
fn test_paths_inspected_reports_failures() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::PathsInspected {
            epoch: 0,
            files: vec![staged("ok.py", 3)],
            failures: vec![PathFailure {
                path: PathBuf::from("gone.py"),
                reason: "not found".into(),
            }],
        },
    );

    assert_eq!(state.staged.len(), 1);
    assert!(state
        .notifications
        .iter()
        .any(|n| n.message == "Cannot read \"gone.py\": not found"));
}

#[test]
fn test_remove_file_preserves_order() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::AddFiles(vec![staged("a.py", 1), staged("b.py", 1), staged("c.py", 1)]),
    );

    update(&mut state, Message::RemoveFile(1));

    let names: Vec<_> = state.staged.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.py", "c.py"]);
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Info, "File removed".into()))
    );
}

#[test]
fn test_remove_out_of_range_is_noop() {
    let mut state = AppState::new();
    update(&mut state, Message::AddFiles(vec![staged("a.py", 1)]));
    let before = state.notifications.len();

    update(&mut state, Message::RemoveFile(5));

    assert_eq!(state.staged.len(), 1);
    assert_eq!(state.notifications.len(), before);
}

#[test]
fn test_clear_files() {
    let mut state = AppState::new();
    update(&mut state, Message::AddFiles(vec![staged("a.py", 1)]));
    update(&mut state, Message::ClearFiles);
    assert!(state.staged.is_empty());
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Info, "All files cleared".into()))
    );
}

// ─────────────────────────────────────────────────────────
// Upload
// ─────────────────────────────────────────────────────────

#[test]
fn test_upload_with_nothing_staged_issues_no_request() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::StartUpload);

    assert!(result.action.is_none());
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Warning, "No files to upload".into()))
    );
}

#[test]
fn test_upload_success_moves_to_task_step() {
    let state = uploaded_state();

    assert_eq!(state.step, WizardStep::Task);
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.progress.is_none());
    let session = state.session.as_ref().unwrap();
    assert_eq!(session.id.as_str(), "s1");
    assert_eq!(session.structure.total_files, 3);
    // Staged files stay listed after upload
    assert_eq!(state.staged.len(), 2);
    assert!(state
        .notifications
        .iter()
        .any(|n| n.message == "Files uploaded successfully!"));
}

#[test]
fn test_upload_warnings_become_notifications() {
    let mut state = AppState::new();
    update(&mut state, Message::AddFiles(vec![staged("a.py", 1)]));
    update(&mut state, Message::StartUpload);

    let mut response = upload_ok("s2", &["a.py"]);
    response.warnings = vec!["Skipped notes.bin".into()];
    update(
        &mut state,
        Message::UploadCompleted {
            epoch: 0,
            response: Box::new(response),
        },
    );

    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Warning, "Skipped notes.bin".into()))
    );
}

#[test]
fn test_upload_while_busy_is_refused() {
    let mut state = AppState::new();
    update(&mut state, Message::AddFiles(vec![staged("a.py", 1)]));
    update(&mut state, Message::StartUpload);

    let result = update(&mut state, Message::StartUpload);
    assert!(result.action.is_none());
    assert_eq!(
        last_message(&state),
        Some((
            NotificationLevel::Warning,
            "Please wait for the current request to finish".into()
        ))
    );
}

#[test]
fn test_upload_failure_keeps_step() {
    let mut state = AppState::new();
    update(&mut state, Message::AddFiles(vec![staged("a.py", 1)]));
    update(&mut state, Message::StartUpload);

    update(
        &mut state,
        Message::UploadFailed {
            epoch: 0,
            error: "Invalid file type".into(),
        },
    );

    assert_eq!(state.step, WizardStep::Upload);
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.session.is_none());
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Error, "Upload failed: Invalid file type".into()))
    );
}

#[test]
fn test_stale_upload_response_is_dropped() {
    let mut state = AppState::new();
    update(&mut state, Message::AddFiles(vec![staged("a.py", 1)]));
    update(&mut state, Message::StartUpload);
    update(&mut state, Message::NewAnalysis);

    update(
        &mut state,
        Message::UploadCompleted {
            epoch: 0,
            response: Box::new(upload_ok("late", &["a.py"])),
        },
    );

    assert!(state.session.is_none());
    assert_eq!(state.step, WizardStep::Upload);
}

// ─────────────────────────────────────────────────────────
// Task submission
// ─────────────────────────────────────────────────────────

#[test]
fn test_submit_requires_description() {
    let mut state = uploaded_state();
    update(&mut state, Message::SetTaskDescription("   ".into()));

    let result = update(&mut state, Message::SubmitTask);

    assert!(result.action.is_none());
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(
        last_message(&state),
        Some((
            NotificationLevel::Warning,
            "Please provide a task description".into()
        ))
    );
}

#[test]
fn test_submit_rejects_overlong_description() {
    let mut state = uploaded_state();
    update(&mut state, Message::SetTaskDescription("x".repeat(2001)));

    let result = update(&mut state, Message::SubmitTask);

    assert!(result.action.is_none());
    assert_eq!(
        last_message(&state),
        Some((
            NotificationLevel::Warning,
            "Task description is too long (max 2000 characters)".into()
        ))
    );
}

#[test]
fn test_submit_requires_session() {
    let mut state = AppState::new();
    update(&mut state, Message::SetTaskDescription("Review".into()));

    let result = update(&mut state, Message::SubmitTask);

    assert!(result.action.is_none());
    assert_eq!(
        last_message(&state),
        Some((
            NotificationLevel::Warning,
            "Please upload files before describing a task".into()
        ))
    );
}

#[test]
fn test_submit_sends_trimmed_description() {
    let mut state = uploaded_state();
    update(&mut state, Message::SetTaskDescription("  Find bugs \n".into()));

    let result = update(&mut state, Message::SubmitTask);

    match result.action {
        Some(UpdateAction::SubmitTask {
            session_id,
            description,
            ..
        }) => {
            assert_eq!(session_id.as_str(), "s1");
            assert_eq!(description, "Find bugs");
        }
        other => panic!("expected SubmitTask, got {:?}", other),
    }
    assert_eq!(state.phase, Phase::Submitting);
}

#[test]
fn test_second_submit_while_busy_is_refused() {
    let mut state = submitted_state();
    let result = update(&mut state, Message::SubmitTask);
    assert!(result.action.is_none());
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Warning, "Analysis already in progress".into()))
    );
}

#[test]
fn test_resubmit_drops_previous_result() {
    let mut state = uploaded_state();
    state.analysis_result = Some(sample_result());
    state.step = WizardStep::Results;

    update(&mut state, Message::GoToStep(2));
    update(&mut state, Message::SetTaskDescription("Second pass".into()));
    let result = update(&mut state, Message::SubmitTask);

    assert!(matches!(result.action, Some(UpdateAction::SubmitTask { .. })));
    assert_eq!(state.phase, Phase::Submitting);
    assert!(state.analysis_result.is_none());

    update(&mut state, Message::GoToStep(3));
    assert_eq!(state.step, WizardStep::Task);
}

#[test]
fn test_sync_completion_shows_results() {
    let mut state = submitted_state();
    let epoch = state.epoch;
    update(
        &mut state,
        Message::TaskAccepted {
            epoch,
            submission: TaskSubmission::Completed(Box::new(sample_result())),
        },
    );

    assert_eq!(state.step, WizardStep::Results);
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.poll.is_none());
    assert_eq!(state.analysis_result, Some(sample_result()));
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Success, "Analysis completed!".into()))
    );
}

#[test]
fn test_task_failure_reports_server_message() {
    let mut state = submitted_state();
    let epoch = state.epoch;
    update(
        &mut state,
        Message::TaskFailed {
            epoch,
            error: "Invalid session".into(),
        },
    );

    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.step, WizardStep::Task);
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Error, "Analysis failed: Invalid session".into()))
    );
}

// ─────────────────────────────────────────────────────────
// Polling
// ─────────────────────────────────────────────────────────

#[test]
fn test_running_status_schedules_next_poll() {
    let mut state = polling_state();
    assert!(state
        .notifications
        .iter()
        .any(|n| n.message == "Analysis started!"));

    let epoch = state.epoch;
    let result = update(
        &mut state,
        Message::StatusReceived {
            epoch,
            response: Box::new(status(AnalysisStatus::Running)),
        },
    );

    assert!(matches!(
        result.action,
        Some(UpdateAction::PollStatus { delay, .. }) if delay == std::time::Duration::from_millis(2000)
    ));
    let progress = state.progress.as_ref().unwrap();
    assert_eq!(progress.percent, 50);
    assert_eq!(progress.label, "AI analysis in progress...");
    assert_eq!(state.poll.as_ref().map(|p| p.attempts), Some(2));
}

#[test]
fn test_completed_status_stores_result() {
    let mut state = polling_state();
    let epoch = state.epoch;
    update(
        &mut state,
        Message::StatusReceived {
            epoch,
            response: Box::new(completed(sample_result())),
        },
    );

    assert_eq!(state.step, WizardStep::Results);
    assert!(state.poll.is_none());
    assert_eq!(state.progress.as_ref().map(|p| p.percent), Some(100));
}

#[test]
fn test_failed_status_without_error_uses_fallback() {
    let mut state = polling_state();
    let epoch = state.epoch;
    update(
        &mut state,
        Message::StatusReceived {
            epoch,
            response: Box::new(failed(None)),
        },
    );

    assert_eq!(state.phase, Phase::Idle);
    assert!(state.poll.is_none());
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Error, "Analysis error: Analysis failed".into()))
    );
}

#[test]
fn test_status_transport_error_stops_polling() {
    let mut state = polling_state();
    let epoch = state.epoch;
    let result = update(
        &mut state,
        Message::StatusFailed {
            epoch,
            error: "Request failed: connection refused".into(),
        },
    );

    assert!(result.action.is_none());
    assert!(state.poll.is_none());
    assert_eq!(
        last_message(&state),
        Some((
            NotificationLevel::Error,
            "Analysis error: Request failed: connection refused".into()
        ))
    );
}

#[test]
fn test_poll_gives_up_after_max_attempts() {
    let mut state = polling_state();
    state.settings.analysis.max_poll_attempts = 3;

    let mut requests = 1;
    loop {
        let epoch = state.epoch;
        let result = update(
            &mut state,
            Message::StatusReceived {
                epoch,
                response: Box::new(status(AnalysisStatus::Running)),
            },
        );
        if result.action.is_none() {
            break;
        }
        requests += 1;
        assert!(requests <= 3, "poller kept going");
    }

    assert_eq!(requests, 3);
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.progress.is_none());
    assert_eq!(
        last_message(&state),
        Some((
            NotificationLevel::Error,
            "Analysis timed out after 3 status checks".into()
        ))
    );
}

#[test]
fn test_stale_status_after_reset_is_ignored() {
    let mut state = polling_state();
    let old_epoch = state.epoch;
    update(&mut state, Message::NewAnalysis);

    let result = update(
        &mut state,
        Message::StatusReceived {
            epoch: old_epoch,
            response: Box::new(completed(sample_result())),
        },
    );

    assert!(result.action.is_none());
    assert!(state.analysis_result.is_none());
    assert_eq!(state.step, WizardStep::Upload);
}

#[test]
fn test_reset_cancels_pending_poll() {
    let mut state = uploaded_state();
    update(&mut state, Message::SetTaskDescription("Review".into()));
    update(&mut state, Message::SubmitTask);
    let epoch = state.epoch;
    let result = update(
        &mut state,
        Message::TaskAccepted {
            epoch,
            submission: TaskSubmission::Accepted {
                status: AnalysisStatus::Running,
            },
        },
    );
    let Some(UpdateAction::PollStatus { mut cancel_rx, .. }) = result.action else {
        panic!("expected a poll");
    };
    assert!(!*cancel_rx.borrow_and_update());

    update(&mut state, Message::NewAnalysis);

    assert!(*cancel_rx.borrow_and_update());
}

// ─────────────────────────────────────────────────────────
// Navigation
// ─────────────────────────────────────────────────────────

#[test]
fn test_go_to_invalid_step_is_noop() {
    let mut state = AppState::new();
    update(&mut state, Message::GoToStep(0));
    update(&mut state, Message::GoToStep(4));
    assert_eq!(state.step, WizardStep::Upload);
    assert!(state.notifications.is_empty());
}

#[test]
fn test_forward_jump_without_session_is_refused() {
    let mut state = AppState::new();
    update(&mut state, Message::GoToStep(3));

    assert_eq!(state.step, WizardStep::Upload);
    assert_eq!(
        last_message(&state),
        Some((
            NotificationLevel::Warning,
            "Complete the current step first".into()
        ))
    );
}

#[test]
fn test_backward_jump_is_allowed() {
    let mut state = uploaded_state();
    update(&mut state, Message::GoToStep(1));
    assert_eq!(state.step, WizardStep::Upload);

    // And forward again, since the session exists
    update(&mut state, Message::GoToStep(2));
    assert_eq!(state.step, WizardStep::Task);
}

#[test]
fn test_step_view_follows_step() {
    let mut state = uploaded_state();
    let epoch = state.epoch;
    update(
        &mut state,
        Message::TaskAccepted {
            epoch,
            submission: TaskSubmission::Completed(Box::new(sample_result())),
        },
    );
    // Not submitting, so the acknowledgement is ignored
    assert_eq!(state.step, WizardStep::Task);

    let view = state.step.view();
    assert_eq!(view.visible_section, "task");
    assert_eq!(view.connectors, [true, false]);
}

#[test]
fn test_proceed_uploads_then_submits() {
    let mut state = AppState::new();
    assert!(update(&mut state, Message::Proceed).message.is_none());

    update(&mut state, Message::AddFiles(vec![staged("a.py", 1)]));
    let result = update(&mut state, Message::Proceed);
    assert!(matches!(result.message, Some(Message::StartUpload)));

    let mut state = uploaded_state();
    assert!(update(&mut state, Message::Proceed).message.is_none());
    update(&mut state, Message::SetTaskDescription("Review".into()));
    let result = update(&mut state, Message::Proceed);
    assert!(matches!(result.message, Some(Message::SubmitTask)));
}

#[test]
fn test_new_analysis_clears_everything() {
    let mut state = polling_state();
    state.explorer.open = true;

    update(&mut state, Message::NewAnalysis);

    assert_eq!(state.step, WizardStep::Upload);
    assert_eq!(state.epoch, 1);
    assert!(state.staged.is_empty());
    assert!(state.session.is_none());
    assert!(state.task_description.is_empty());
    assert!(state.analysis_result.is_none());
    assert!(state.poll.is_none());
    assert!(state.progress.is_none());
    assert!(!state.explorer.open);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Info, "Ready for new analysis".into()))
    );
}

// ─────────────────────────────────────────────────────────
// Explorer
// ─────────────────────────────────────────────────────────

#[test]
fn test_explorer_needs_session() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::OpenExplorer);
    assert!(result.action.is_none());
    assert!(!state.explorer.open);

    let result = update(&mut state, Message::SelectFile("a.py".into()));
    assert!(result.action.is_none());
}

#[test]
fn test_explorer_load_search_and_preview() {
    let mut state = uploaded_state();
    let result = update(&mut state, Message::OpenExplorer);
    assert!(matches!(
        result.action,
        Some(UpdateAction::LoadSessionFiles { ref session_id, .. }) if session_id.as_str() == "s1"
    ));
    assert!(state.explorer.loading);

    let epoch = state.epoch;
    update(
        &mut state,
        Message::ExplorerLoaded {
            epoch,
            structure: Box::new(project_with_files(&["src/app.py", "README.md"])),
        },
    );
    assert!(!state.explorer.loading);
    assert_eq!(state.explorer.files.len(), 2);

    update(&mut state, Message::SearchFiles("APP".into()));
    assert_eq!(state.explorer.filtered().len(), 1);

    update(&mut state, Message::SetViewMode(ViewMode::Grid));
    assert_eq!(state.explorer.view_mode, ViewMode::Grid);

    let result = update(&mut state, Message::SelectFile("src/app.py".into()));
    assert!(matches!(
        result.action,
        Some(UpdateAction::LoadFileContent { ref path, .. }) if path == "src/app.py"
    ));

    let content = FileContent {
        file_path: "src/app.py".into(),
        content: "print()".into(),
        size: 7,
        ..Default::default()
    };
    let epoch = state.epoch;
    update(
        &mut state,
        Message::FileContentLoaded {
            epoch,
            path: "src/app.py".into(),
            content: Box::new(content.clone()),
        },
    );
    assert_eq!(state.explorer.preview, Some(content));

    update(&mut state, Message::CloseExplorer);
    assert!(!state.explorer.open);
    assert!(state.explorer.files.is_empty());
}

#[test]
fn test_preview_for_deselected_file_is_dropped() {
    let mut state = uploaded_state();
    update(&mut state, Message::OpenExplorer);
    update(&mut state, Message::SelectFile("a.py".into()));
    update(&mut state, Message::SelectFile("b.py".into()));

    let epoch = state.epoch;
    update(
        &mut state,
        Message::FileContentLoaded {
            epoch,
            path: "a.py".into(),
            content: Box::default(),
        },
    );

    assert!(state.explorer.preview.is_none());
}

#[test]
fn test_explorer_failures_notify() {
    let mut state = uploaded_state();
    update(&mut state, Message::OpenExplorer);
    let epoch = state.epoch;
    update(
        &mut state,
        Message::ExplorerFailed {
            epoch,
            error: "boom".into(),
        },
    );
    assert!(!state.explorer.open);
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Error, "Failed to load file explorer".into()))
    );

    let epoch = state.epoch;
    update(
        &mut state,
        Message::FileContentFailed {
            epoch,
            error: "boom".into(),
        },
    );
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Error, "Failed to load file content".into()))
    );
}

// ─────────────────────────────────────────────────────────
// Download / Export / Health
// ─────────────────────────────────────────────────────────

#[test]
fn test_download_requires_session() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::Download);
    assert!(result.action.is_none());
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Warning, "No session to download".into()))
    );
}

#[test]
fn test_download_targets_output_dir() {
    let mut state = uploaded_state();
    state.settings.ui.output_dir = PathBuf::from("out");

    let result = update(&mut state, Message::Download);

    match result.action {
        Some(UpdateAction::Download { dest, .. }) => {
            assert_eq!(dest, PathBuf::from("out").join("manus_result_s1.zip"));
        }
        other => panic!("expected Download, got {:?}", other),
    }

    let epoch = state.epoch;
    update(
        &mut state,
        Message::Downloaded {
            epoch,
            path: PathBuf::from("out/manus_result_s1.zip"),
            bytes: 42,
        },
    );
    assert_eq!(
        state.last_download,
        Some(PathBuf::from("out/manus_result_s1.zip"))
    );
    assert_eq!(
        last_message(&state),
        Some((
            NotificationLevel::Success,
            "Results downloaded successfully".into()
        ))
    );
}

#[test]
fn test_download_failure() {
    let mut state = uploaded_state();
    let epoch = state.epoch;
    update(
        &mut state,
        Message::DownloadFailed {
            epoch,
            error: "HTTP 404: Session not found".into(),
        },
    );
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Error, "Download failed".into()))
    );
}

#[test]
fn test_export_requires_result() {
    let mut state = uploaded_state();
    let result = update(&mut state, Message::Export);
    assert!(result.action.is_none());
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Warning, "No results to export".into()))
    );
}

#[test]
fn test_export_file_name() {
    let mut state = AppState::new();
    state.analysis_result = Some(sample_result());

    let result = update(&mut state, Message::Export);

    match result.action {
        Some(UpdateAction::Export { dest, result }) => {
            let name = dest.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("manus_analysis_"));
            assert!(name.ends_with(".json"));
            assert_eq!(*result, sample_result());
        }
        other => panic!("expected Export, got {:?}", other),
    }
}

#[test]
fn test_health_results() {
    let mut state = AppState::new();
    assert!(matches!(
        update(&mut state, Message::CheckHealth).action,
        Some(UpdateAction::CheckHealth)
    ));

    update(&mut state, Message::HealthChecked(healthy()));
    assert!(state.notifications.is_empty());

    update(
        &mut state,
        Message::HealthChecked(HealthReport {
            status: "degraded".into(),
            ..Default::default()
        }),
    );
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Warning, "API health check failed".into()))
    );

    update(&mut state, Message::HealthFailed("refused".into()));
    assert_eq!(
        last_message(&state),
        Some((NotificationLevel::Error, "Unable to connect to API".into()))
    );
}

// ─────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_requests_quit() {
    let mut state = AppState::new();
    assert!(!state.should_quit());
    update(&mut state, Message::Quit);
    assert!(state.should_quit());
}

#[tokio::test(start_paused = true)]
async fn test_tick_expires_notifications_and_animates_upload() {
    let mut state = AppState::new();
    update(&mut state, Message::AddFiles(vec![staged("a.py", 1)]));
    update(&mut state, Message::StartUpload);
    assert_eq!(state.progress.as_ref().map(|p| p.percent), Some(0));

    tokio::time::advance(std::time::Duration::from_millis(1500)).await;
    update(&mut state, Message::Tick);
    assert_eq!(state.progress.as_ref().map(|p| p.percent), Some(50));
    assert!(!state.notifications.is_empty());

    tokio::time::advance(std::time::Duration::from_secs(5)).await;
    update(&mut state, Message::Tick);
    assert!(state.notifications.is_empty());
    assert_eq!(state.progress.as_ref().map(|p| p.percent), Some(100));
}
