//! Local filesystem tasks: path inspection and result export

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::debug;

use manus_core::prelude::*;
use manus_core::{AnalysisResult, StagedFile};

use crate::message::{Message, PathFailure};

pub(super) fn spawn_inspect_paths(epoch: u64, paths: Vec<PathBuf>, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let (files, failures) = inspect_paths(paths).await;
        let _ = msg_tx
            .send(Message::PathsInspected {
                epoch,
                files,
                failures,
            })
            .await;
    });
}

/// Stat every path; directories and unreadable entries become failures
pub async fn inspect_paths(paths: Vec<PathBuf>) -> (Vec<StagedFile>, Vec<PathFailure>) {
    let mut files = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();

    for path in paths {
        match inspect_path(&path).await {
            Ok(file) => files.push(file),
            Err(reason) => {
                debug!("Cannot stage {}: {}", path.display(), reason);
                failures.push(PathFailure { path, reason });
            }
        }
    }
    (files, failures)
}

async fn inspect_path(path: &Path) -> std::result::Result<StagedFile, String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| e.to_string())?;
    if !metadata.is_file() {
        return Err("not a regular file".to_string());
    }
    let last_modified = metadata.modified().ok().map(DateTime::<Utc>::from);
    Ok(StagedFile::new(path, metadata.len(), last_modified))
}

pub(super) fn spawn_export(dest: PathBuf, result: AnalysisResult, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let msg = match write_export(&dest, &result).await {
            Ok(()) => Message::Exported { path: dest },
            Err(e) => Message::ExportFailed {
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Write `result` as pretty-printed JSON
pub async fn write_export(dest: &Path, result: &AnalysisResult) -> Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(result)?;
    tokio::fs::write(dest, json).await?;
    Ok(())
}
