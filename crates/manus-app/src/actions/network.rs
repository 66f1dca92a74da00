//! Backend request tasks

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use manus_api::Backend;
use manus_core::{SessionId, StagedFile};

use crate::message::Message;

async fn send(msg_tx: &mpsc::Sender<Message>, msg: Message) {
    if msg_tx.send(msg).await.is_err() {
        debug!("Message channel closed; dropping result");
    }
}

pub(super) fn spawn_upload<B>(
    backend: B,
    epoch: u64,
    files: Vec<StagedFile>,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match backend.upload(&files).await {
            Ok(response) => Message::UploadCompleted {
                epoch,
                response: Box::new(response),
            },
            Err(e) => Message::UploadFailed {
                epoch,
                error: e.to_string(),
            },
        };
        send(&msg_tx, msg).await;
    });
}

pub(super) fn spawn_submit_task<B>(
    backend: B,
    epoch: u64,
    session_id: SessionId,
    description: String,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match backend.submit_task(&session_id, &description).await {
            Ok(submission) => Message::TaskAccepted { epoch, submission },
            Err(e) => Message::TaskFailed {
                epoch,
                error: e.to_string(),
            },
        };
        send(&msg_tx, msg).await;
    });
}

/// One poll step: wait, then ask for the status once.
///
/// Cancellation wins over both the timer and an in-flight request; a
/// cancelled poll sends nothing back.
pub(super) fn spawn_status_poll<B>(
    backend: B,
    epoch: u64,
    session_id: SessionId,
    delay: Duration,
    mut cancel_rx: watch::Receiver<bool>,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        if *cancel_rx.borrow() {
            return;
        }

        let request = async {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            backend.analysis_status(&session_id).await
        };

        let outcome = tokio::select! {
            // Err means the poll owner was dropped, which also ends the poll
            _ = cancel_rx.changed() => {
                debug!("Status poll for {} cancelled", session_id);
                return;
            }
            outcome = request => outcome,
        };

        let msg = match outcome {
            Ok(response) => Message::StatusReceived {
                epoch,
                response: Box::new(response),
            },
            Err(e) => {
                warn!("Status check for {} failed: {}", session_id, e);
                Message::StatusFailed {
                    epoch,
                    error: e.to_string(),
                }
            }
        };
        send(&msg_tx, msg).await;
    });
}

pub(super) fn spawn_load_session_files<B>(
    backend: B,
    epoch: u64,
    session_id: SessionId,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match backend.session_files(&session_id).await {
            Ok(structure) => Message::ExplorerLoaded {
                epoch,
                structure: Box::new(structure),
            },
            Err(e) => Message::ExplorerFailed {
                epoch,
                error: e.to_string(),
            },
        };
        send(&msg_tx, msg).await;
    });
}

pub(super) fn spawn_load_file_content<B>(
    backend: B,
    epoch: u64,
    session_id: SessionId,
    path: String,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match backend.file_content(&session_id, &path).await {
            Ok(content) => Message::FileContentLoaded {
                epoch,
                path,
                content: Box::new(content),
            },
            Err(e) => Message::FileContentFailed {
                epoch,
                error: e.to_string(),
            },
        };
        send(&msg_tx, msg).await;
    });
}

pub(super) fn spawn_download<B>(
    backend: B,
    epoch: u64,
    session_id: SessionId,
    dest: PathBuf,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                let error = format!("cannot create {}: {}", parent.display(), e);
                send(&msg_tx, Message::DownloadFailed { epoch, error }).await;
                return;
            }
        }

        let msg = match backend.download(&session_id, &dest).await {
            Ok(bytes) => Message::Downloaded {
                epoch,
                path: dest,
                bytes,
            },
            Err(e) => Message::DownloadFailed {
                epoch,
                error: e.to_string(),
            },
        };
        send(&msg_tx, msg).await;
    });
}

pub(super) fn spawn_health_check<B>(backend: B, msg_tx: mpsc::Sender<Message>)
where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match backend.health().await {
            Ok(report) => Message::HealthChecked(report),
            Err(e) => Message::HealthFailed(e.to_string()),
        };
        send(&msg_tx, msg).await;
    });
}
