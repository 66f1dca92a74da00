//! End-to-end wizard runs against a scripted backend

use std::path::{Path, PathBuf};

use manus_api::test_utils::{
    completed, failed, healthy, sample_result, status, upload_ok, FakeBackend, FakeCall,
    FAKE_ARCHIVE,
};
use manus_api::{AnalysisContract, TaskSubmission};
use manus_app::{Engine, Settings};
use manus_client::headless::runner::{analyze, handle_line};
use manus_client::{AnalyzeOptions, HeadlessEvent};
use manus_core::{AnalysisStatus, Error, WizardStep};
use tempfile::{tempdir, TempDir};

fn settings(output_dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.analysis.poll_interval_ms = 100;
    settings.ui.output_dir = output_dir.to_path_buf();
    settings
}

fn project() -> (TempDir, Vec<PathBuf>) {
    let dir = tempdir().unwrap();
    let main = dir.path().join("main.py");
    let readme = dir.path().join("README.md");
    std::fs::write(&main, "print('hello')\n").unwrap();
    std::fs::write(&readme, "# Demo\n").unwrap();
    (dir, vec![main, readme])
}

fn names(events: &[HeadlessEvent]) -> Vec<&'static str> {
    events.iter().map(HeadlessEvent::name).collect()
}

#[tokio::test]
async fn test_full_analysis_with_outputs() {
    let (project_dir, files) = project();
    let out = tempdir().unwrap();
    let report = out.path().join("report.html");

    let backend = FakeBackend::new();
    backend
        .push_upload(Ok(upload_ok("s1", &["main.py", "README.md"])))
        .push_submission(Ok(TaskSubmission::Accepted {
            status: AnalysisStatus::Pending,
        }))
        .push_status(Ok(status(AnalysisStatus::Running)))
        .push_status(Ok(completed(sample_result())))
        .push_download(Ok(()))
        .push_health(Ok(healthy()));

    let mut engine = Engine::new(backend.clone(), settings(out.path()));
    let mut sink = Vec::new();
    let options = AnalyzeOptions {
        files,
        task: "  Review the code  ".into(),
        download: true,
        export: true,
        report: Some(report.clone()),
    };

    let result = analyze(&mut engine, &options, &mut sink).await.unwrap();
    assert_eq!(result, sample_result());
    assert_eq!(engine.state.step, WizardStep::Results);

    let calls = backend.calls();
    assert_eq!(
        calls[0],
        FakeCall::Upload {
            file_names: vec!["main.py".into(), "README.md".into()]
        }
    );
    assert_eq!(
        calls[1],
        FakeCall::SubmitTask {
            session_id: "s1".into(),
            description: "Review the code".into(),
        }
    );
    assert_eq!(backend.status_calls(), 2);

    // Outputs
    let archive = out.path().join("manus_result_s1.zip");
    assert_eq!(std::fs::read(&archive).unwrap(), FAKE_ARCHIVE);
    let export = engine.state.last_export.clone().unwrap();
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(export).unwrap()).unwrap();
    assert_eq!(exported["summary"], "The project is a small Flask service.");

    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.contains("Session s1"));
    assert!(html.contains("The project is a small Flask service."));

    // Event stream, in order
    let seen = names(&sink);
    let position = |name: &str| {
        seen.iter()
            .position(|n| *n == name)
            .unwrap_or_else(|| panic!("missing {} in {:?}", name, seen))
    };
    assert!(position("files_staged") < position("upload_started"));
    assert!(position("upload_started") < position("session_created"));
    assert!(position("session_created") < position("analysis_started"));
    assert!(position("analysis_progress") < position("analysis_completed"));
    assert!(position("analysis_completed") < position("result"));
    assert!(position("result") < position("downloaded"));
    assert!(position("downloaded") < position("exported"));
    assert!(position("exported") < position("report_written"));

    drop(project_dir);
}

#[tokio::test]
async fn test_failed_analysis_reports_server_error() {
    let (_project_dir, files) = project();
    let out = tempdir().unwrap();

    let backend = FakeBackend::new();
    backend
        .push_upload(Ok(upload_ok("s2", &["main.py", "README.md"])))
        .push_submission(Ok(TaskSubmission::Accepted {
            status: AnalysisStatus::Running,
        }))
        .push_status(Ok(failed(Some("model unavailable"))));

    let mut engine = Engine::new(backend.clone(), settings(out.path()));
    let mut sink = Vec::new();
    let options = AnalyzeOptions {
        files,
        task: "Find bugs".into(),
        report: Some(out.path().join("report.html")),
        ..Default::default()
    };

    let err = analyze(&mut engine, &options, &mut sink).await.unwrap_err();
    assert_eq!(err.to_string(), "Analysis error: model unavailable");
    assert_eq!(engine.state.step, WizardStep::Task);
    assert!(names(&sink).contains(&"analysis_failed"));
    assert!(!out.path().join("report.html").exists());
}

#[tokio::test]
async fn test_unwritable_report_fails_after_result() {
    let (_project_dir, files) = project();
    let out = tempdir().unwrap();
    let report = out.path().join("missing").join("report.html");

    let backend = FakeBackend::new();
    backend
        .push_upload(Ok(upload_ok("s5", &["main.py", "README.md"])))
        .push_submission(Ok(TaskSubmission::Completed(Box::new(sample_result()))));

    let mut settings = settings(out.path());
    settings.analysis.contract = AnalysisContract::Sync;
    let mut engine = Engine::new(backend, settings);
    let mut sink = Vec::new();
    let options = AnalyzeOptions {
        files,
        task: "Summarize".into(),
        report: Some(report.clone()),
        ..Default::default()
    };

    let err = analyze(&mut engine, &options, &mut sink).await.unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got {:?}", err);
    assert!(names(&sink).contains(&"result"));
    assert!(!names(&sink).contains(&"report_written"));
    assert!(!report.exists());
}

#[tokio::test]
async fn test_upload_failure_stops_before_task() {
    let (_project_dir, files) = project();
    let out = tempdir().unwrap();

    let backend = FakeBackend::new();
    backend.push_upload(Err("Disk full".into()));

    let mut engine = Engine::new(backend.clone(), settings(out.path()));
    let mut sink = Vec::new();
    let options = AnalyzeOptions {
        files,
        task: "Find bugs".into(),
        ..Default::default()
    };

    let err = analyze(&mut engine, &options, &mut sink).await.unwrap_err();
    assert!(err.to_string().contains("Disk full"), "got {}", err);
    assert!(engine.state.session.is_none());
    assert!(!backend
        .calls()
        .iter()
        .any(|c| matches!(c, FakeCall::SubmitTask { .. })));
}

#[tokio::test]
async fn test_sync_contract_skips_polling() {
    let (_project_dir, files) = project();
    let out = tempdir().unwrap();

    let backend = FakeBackend::new();
    backend
        .push_upload(Ok(upload_ok("s3", &["main.py", "README.md"])))
        .push_submission(Ok(TaskSubmission::Completed(Box::new(sample_result()))));

    let mut settings = settings(out.path());
    settings.analysis.contract = AnalysisContract::Sync;
    let mut engine = Engine::new(backend.clone(), settings);
    let mut sink = Vec::new();
    let options = AnalyzeOptions {
        files,
        task: "Summarize".into(),
        ..Default::default()
    };

    let result = analyze(&mut engine, &options, &mut sink).await.unwrap();
    assert_eq!(result.summary, sample_result().summary);
    assert_eq!(backend.status_calls(), 0);
}

#[tokio::test]
async fn test_interactive_lines_drive_the_wizard() {
    let (_project_dir, files) = project();
    let out = tempdir().unwrap();

    let backend = FakeBackend::new();
    backend.push_upload(Ok(upload_ok("s4", &["main.py", "README.md"])));

    let mut engine = Engine::new(backend.clone(), settings(out.path()));
    let mut sink = Vec::new();

    let add = format!("add {} {}", files[0].display(), files[1].display());
    handle_line(&mut engine, &add, &mut sink);
    engine.run_until(|s| s.staged.len() == 2).await;

    handle_line(&mut engine, "remove 2", &mut sink);
    assert_eq!(engine.state.staged.len(), 1);

    handle_line(&mut engine, "upload", &mut sink);
    engine.run_until(|s| s.session.is_some()).await;
    assert_eq!(engine.state.step, WizardStep::Task);

    handle_line(&mut engine, "status", &mut sink);
    match sink.last() {
        Some(HeadlessEvent::Status {
            step, session_id, ..
        }) => {
            assert_eq!(*step, 2);
            assert_eq!(session_id.as_deref(), Some("s4"));
        }
        other => panic!("expected status, got {:?}", other),
    }

    handle_line(&mut engine, "new", &mut sink);
    assert_eq!(engine.state.step, WizardStep::Upload);
    assert!(engine.state.staged.is_empty());
}
