//! Analysis submission contracts
//!
//! Two backend generations answer a task submission differently:
//!
//! - **Sync** (`POST /api/process`): the response already holds the
//!   solution, under `result` or `solution`.
//! - **Async** (`POST /api/analyze`): the response only acknowledges the
//!   task; the client then polls `/api/status/{id}`.
//!
//! Both are folded into one [`TaskSubmission`] so the wizard runs a single
//! state machine regardless of which contract is configured.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use manus_core::prelude::*;
use manus_core::{AnalysisResult, AnalysisStatus};

use crate::protocol::{decode, STATUS_SUCCESS};

/// Which submission contract the backend speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisContract {
    /// Result returned inline
    Sync,
    /// Acknowledgement now, result via status polling
    #[default]
    Async,
}

/// Outcome of submitting a task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskSubmission {
    /// The analysis finished within the request
    Completed(Box<AnalysisResult>),
    /// The backend accepted the task; poll for the result
    Accepted { status: AnalysisStatus },
}

/// JSON body of a task submission
#[derive(Debug, Serialize)]
pub struct TaskRequest<'a> {
    pub session_id: &'a str,
    pub task_description: &'a str,
}

impl AnalysisContract {
    /// Endpoint path, relative to the API base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            AnalysisContract::Sync => "api/process",
            AnalysisContract::Async => "api/analyze",
        }
    }

    /// Interpret a successful submission envelope
    pub fn interpret(&self, envelope: Value) -> Result<TaskSubmission> {
        match self {
            AnalysisContract::Sync => interpret_sync(envelope),
            AnalysisContract::Async => interpret_async(envelope),
        }
    }
}

impl fmt::Display for AnalysisContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisContract::Sync => write!(f, "sync"),
            AnalysisContract::Async => write!(f, "async"),
        }
    }
}

impl FromStr for AnalysisContract {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sync" => Ok(AnalysisContract::Sync),
            "async" => Ok(AnalysisContract::Async),
            other => Err(Error::config(format!(
                "unknown analysis contract '{}', expected 'sync' or 'async'",
                other
            ))),
        }
    }
}

fn interpret_sync(mut envelope: Value) -> Result<TaskSubmission> {
    let payload = ["result", "solution"]
        .iter()
        .find_map(|key| {
            envelope
                .get_mut(*key)
                .map(Value::take)
                .filter(|value| !value.is_null())
        })
        .ok_or_else(|| Error::protocol("response carried no result"))?;

    let result = match payload {
        Value::String(text) => AnalysisResult::from_summary(text),
        other => decode(other)?,
    };
    Ok(TaskSubmission::Completed(Box::new(result)))
}

fn interpret_async(mut envelope: Value) -> Result<TaskSubmission> {
    let status = match envelope.get_mut("analysis_status").map(Value::take) {
        Some(Value::Null) | None => AnalysisStatus::Running,
        Some(raw) => decode(raw)?,
    };

    // A backend may finish quickly enough to answer with the result inline
    if status == AnalysisStatus::Completed {
        if let Some(raw) = envelope.get_mut("result").map(Value::take) {
            if !raw.is_null() {
                return Ok(TaskSubmission::Completed(Box::new(decode(raw)?)));
            }
        }
    }

    debug_assert_eq!(
        envelope.get("status").and_then(Value::as_str),
        Some(STATUS_SUCCESS)
    );
    Ok(TaskSubmission::Accepted { status })
}
