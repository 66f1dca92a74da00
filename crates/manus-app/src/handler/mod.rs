//! Handler module - TEA update function and message handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `staging`: Staged file list (add/remove/clear)
//! - `upload`: Upload submission and its responses
//! - `task`: Task description and submission
//! - `poll`: Analysis status polling
//! - `navigation`: Step navigation, proceed, reset
//! - `explorer`: Session file explorer
//! - `output`: Download, export and health check

pub(crate) mod explorer;
pub(crate) mod navigation;
pub(crate) mod output;
pub(crate) mod poll;
pub(crate) mod staging;
pub(crate) mod task;
pub(crate) mod update;
pub(crate) mod upload;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::watch;

use manus_core::{AnalysisResult, SessionId, StagedFile};

use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Stat local paths into staged files
    InspectPaths { epoch: u64, paths: Vec<PathBuf> },

    /// Send the staged files as one multipart upload
    Upload { epoch: u64, files: Vec<StagedFile> },

    /// Submit the task description for the session
    SubmitTask {
        epoch: u64,
        session_id: SessionId,
        description: String,
    },

    /// Wait `delay`, then request the analysis status.
    ///
    /// The wait ends early, without a request, once `cancel_rx` observes
    /// `true` or its sender is dropped.
    PollStatus {
        epoch: u64,
        session_id: SessionId,
        delay: Duration,
        cancel_rx: watch::Receiver<bool>,
    },

    /// Fetch the session's file listing
    LoadSessionFiles { epoch: u64, session_id: SessionId },

    /// Fetch one file's content
    LoadFileContent {
        epoch: u64,
        session_id: SessionId,
        path: String,
    },

    /// Stream the result archive to `dest`
    Download {
        epoch: u64,
        session_id: SessionId,
        dest: PathBuf,
    },

    /// Write the result as pretty JSON to `dest`
    Export {
        dest: PathBuf,
        result: Box<AnalysisResult>,
    },

    /// Probe `/api/health`
    CheckHealth,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
