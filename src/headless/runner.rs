//! Headless runner
//!
//! Drives the [`Engine`] without a terminal UI. Two modes share the same
//! event plumbing:
//! - interactive: one command per stdin line, events on stdout
//! - analyze: stage, upload, submit and wait, then optionally write outputs

use std::io::BufRead;
use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use manus_api::Backend;
use manus_app::actions::files::inspect_paths;
use manus_app::input::help_text;
use manus_app::{parse_command, AppState, Command, Engine, EngineEvent, Message, Renderer, Settings};
use manus_core::prelude::*;
use manus_core::{AnalysisResult, NotificationLevel};

use super::{EventSink, HeadlessEvent, StdoutSink};

/// What an unattended run should do
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub files: Vec<PathBuf>,
    pub task: String,
    /// Fetch the session archive afterwards
    pub download: bool,
    /// Write the result as JSON afterwards
    pub export: bool,
    /// Write an HTML report to this path
    pub report: Option<PathBuf>,
}

/// Run the client reading commands from stdin
pub async fn run_interactive<B>(backend: B, settings: Settings) -> Result<()>
where
    B: Backend + Clone + Sync + 'static,
{
    info!("═══════════════════════════════════════════════════════");
    info!("Manus client starting in interactive mode");
    info!("Server: {}", settings.server.base_url);
    info!("═══════════════════════════════════════════════════════");

    let mut engine = Engine::new(backend, settings);
    let mut events = engine.subscribe();
    let mut sink = StdoutSink;
    let ticker = engine.start();

    let (line_tx, mut line_rx) = mpsc::channel::<String>(64);
    spawn_stdin_reader(line_tx);
    let mut stdin_open = true;
    let mut outcome = Ok(());

    loop {
        forward_events(&mut events, &mut sink);

        if engine.should_quit() {
            info!("Quit requested, exiting");
            break;
        }
        // Scripts piped on stdin end without `quit`; let in-flight work finish first
        if !stdin_open && !engine.state.phase.is_busy() {
            info!("stdin closed, exiting");
            break;
        }

        tokio::select! {
            msg = engine.msg_rx.recv() => match msg {
                Some(msg) => engine.process_message(msg),
                None => {
                    let err = Error::ChannelClosed;
                    sink.emit(HeadlessEvent::error(err.to_string(), err.is_fatal()));
                    outcome = Err(err);
                    break;
                }
            },
            line = line_rx.recv(), if stdin_open => match line {
                Some(line) => handle_line(&mut engine, &line, &mut sink),
                None => stdin_open = false,
            },
        }
    }

    ticker.abort();
    engine.shutdown();
    forward_events(&mut events, &mut sink);
    outcome
}

/// Apply one line of interactive input
pub fn handle_line<B, S>(engine: &mut Engine<B>, line: &str, sink: &mut S)
where
    B: Backend + Clone + Sync + 'static,
    S: EventSink,
{
    match parse_command(line) {
        Ok(None) => {}
        Ok(Some(Command::Message(msg))) => engine.process_message(msg),
        Ok(Some(Command::Status)) => sink.emit(HeadlessEvent::status(&engine.state)),
        Ok(Some(Command::Help)) => eprintln!("Commands:\n{}", help_text()),
        Err(e) => sink.emit(HeadlessEvent::error(e.to_string(), e.is_fatal())),
    }
}

/// Spawn a thread that forwards stdin lines until EOF
fn spawn_stdin_reader(tx: mpsc::Sender<String>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
        debug!("stdin reader finished");
    });
}

/// One unattended analysis, events on stdout
pub async fn run_analyze<B>(backend: B, settings: Settings, options: AnalyzeOptions) -> Result<()>
where
    B: Backend + Clone + Sync + 'static,
{
    info!("═══════════════════════════════════════════════════════");
    info!("Manus client: analyzing {} path(s)", options.files.len());
    info!("Server: {}", settings.server.base_url);
    info!("═══════════════════════════════════════════════════════");

    let mut engine = Engine::new(backend, settings);
    let mut events = engine.subscribe();
    let mut sink = StdoutSink;
    let ticker = engine.start();

    let outcome = analyze(&mut engine, &options, &mut sink).await;
    if let Err(e) = &outcome {
        sink.emit(HeadlessEvent::error(e.to_string(), true));
    }

    ticker.abort();
    engine.shutdown();
    forward_events(&mut events, &mut sink);
    outcome.map(|_| ())
}

/// Walk the wizard from staging to results on an existing engine
///
/// Fails with the last error the wizard reported when a step does not
/// produce what the next one needs.
pub async fn analyze<B, S>(
    engine: &mut Engine<B>,
    options: &AnalyzeOptions,
    sink: &mut S,
) -> Result<AnalysisResult>
where
    B: Backend + Clone + Sync + 'static,
    S: EventSink,
{
    let mut events = engine.subscribe();

    // Step 1: stage and upload
    let mark = engine.state.notifications.next_id();
    let (files, failures) = inspect_paths(options.files.clone()).await;
    let epoch = engine.state.epoch;
    engine.process_message(Message::PathsInspected {
        epoch,
        files,
        failures,
    });
    forward_events(&mut events, sink);
    if engine.state.staged.is_empty() {
        return Err(Error::validation("No valid files selected"));
    }

    engine.process_message(Message::StartUpload);
    pump_until(engine, &mut events, sink, |s| !s.phase.is_busy()).await?;
    if engine.state.session.is_none() {
        return Err(last_error(&engine.state, mark, "Upload failed"));
    }

    // Step 2: task
    let mark = engine.state.notifications.next_id();
    engine.process_message(Message::SubmitTaskWith(options.task.clone()));
    pump_until(engine, &mut events, sink, |s| !s.phase.is_busy()).await?;
    let result = match &engine.state.analysis_result {
        Some(result) => result.clone(),
        None => return Err(last_error(&engine.state, mark, "Analysis failed")),
    };
    sink.emit(HeadlessEvent::result(&result));

    // Step 3: outputs
    if options.download {
        let mark = engine.state.notifications.next_id();
        let before = engine.state.last_download.clone();
        engine.process_message(Message::Download);
        pump_until(engine, &mut events, sink, |s| {
            s.last_download != before || failed_since(s, mark, "Download failed")
        })
        .await?;
        if engine.state.last_download == before {
            return Err(last_error(&engine.state, mark, "Download failed"));
        }
    }

    if options.export {
        let mark = engine.state.notifications.next_id();
        let before = engine.state.last_export.clone();
        engine.process_message(Message::Export);
        pump_until(engine, &mut events, sink, |s| {
            s.last_export != before || failed_since(s, mark, "Export failed")
        })
        .await?;
        if engine.state.last_export == before {
            return Err(last_error(&engine.state, mark, "Export failed"));
        }
    }

    if let Some(path) = &options.report {
        let html = Renderer::new()
            .and_then(|renderer| renderer.report(&engine.state))
            .context("Rendering report")?;
        tokio::fs::write(path, html)
            .await
            .with_context(|| format!("Writing report to {}", path.display()))?;
        info!("Report written to {}", path.display());
        sink.emit(HeadlessEvent::report_written(path.clone()));
    }

    Ok(result)
}

/// Process engine messages until `done` holds, forwarding events as they come
async fn pump_until<B, S, F>(
    engine: &mut Engine<B>,
    events: &mut broadcast::Receiver<EngineEvent>,
    sink: &mut S,
    mut done: F,
) -> Result<()>
where
    B: Backend + Clone + Sync + 'static,
    S: EventSink,
    F: FnMut(&AppState) -> bool,
{
    forward_events(events, sink);
    while !done(&engine.state) {
        if engine.should_quit() {
            return Err(Error::Cancelled);
        }
        if !engine.process_next().await {
            return Err(Error::ChannelClosed);
        }
        forward_events(events, sink);
    }
    Ok(())
}

fn forward_events<S: EventSink>(events: &mut broadcast::Receiver<EngineEvent>, sink: &mut S) {
    loop {
        match events.try_recv() {
            Ok(event) => sink.emit(HeadlessEvent::from_engine(&event)),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Event receiver lagged, skipped {} events", skipped);
            }
            Err(_) => break,
        }
    }
}

fn failed_since(state: &AppState, mark: u64, message: &str) -> bool {
    state
        .notifications
        .since(mark)
        .any(|n| n.level == NotificationLevel::Error && n.message == message)
}

/// Latest error notification since `mark`, or `fallback`
fn last_error(state: &AppState, mark: u64, fallback: &str) -> Error {
    let message = state
        .notifications
        .since(mark)
        .filter(|n| n.level == NotificationLevel::Error)
        .last()
        .map(|n| n.message.clone())
        .unwrap_or_else(|| fallback.to_string());
    Error::backend(message)
}

/// Query the health endpoint once and print the report
pub async fn run_health<B: Backend>(backend: &B) -> Result<bool> {
    let report = backend.health().await?;
    HeadlessEvent::health(&report).emit();
    Ok(report.is_healthy())
}
