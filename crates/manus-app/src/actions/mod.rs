//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every action runs as its own tokio task and reports back with a
//! [`Message`]. A closed message channel means the engine is shutting down;
//! tasks then finish quietly.

use tokio::sync::mpsc;

use manus_api::Backend;

use crate::handler::UpdateAction;
use crate::message::Message;

pub mod files;
pub(crate) mod network;

/// Execute an action by spawning a background task
pub fn handle_action<B>(action: UpdateAction, msg_tx: mpsc::Sender<Message>, backend: &B)
where
    B: Backend + Clone + Sync + 'static,
{
    match action {
        UpdateAction::InspectPaths { epoch, paths } => {
            files::spawn_inspect_paths(epoch, paths, msg_tx);
        }

        UpdateAction::Upload { epoch, files } => {
            network::spawn_upload(backend.clone(), epoch, files, msg_tx);
        }

        UpdateAction::SubmitTask {
            epoch,
            session_id,
            description,
        } => {
            network::spawn_submit_task(backend.clone(), epoch, session_id, description, msg_tx);
        }

        UpdateAction::PollStatus {
            epoch,
            session_id,
            delay,
            cancel_rx,
        } => {
            network::spawn_status_poll(backend.clone(), epoch, session_id, delay, cancel_rx, msg_tx);
        }

        UpdateAction::LoadSessionFiles { epoch, session_id } => {
            network::spawn_load_session_files(backend.clone(), epoch, session_id, msg_tx);
        }

        UpdateAction::LoadFileContent {
            epoch,
            session_id,
            path,
        } => {
            network::spawn_load_file_content(backend.clone(), epoch, session_id, path, msg_tx);
        }

        UpdateAction::Download {
            epoch,
            session_id,
            dest,
        } => {
            network::spawn_download(backend.clone(), epoch, session_id, dest, msg_tx);
        }

        UpdateAction::Export { dest, result } => {
            files::spawn_export(dest, *result, msg_tx);
        }

        UpdateAction::CheckHealth => {
            network::spawn_health_check(backend.clone(), msg_tx);
        }
    }
}
