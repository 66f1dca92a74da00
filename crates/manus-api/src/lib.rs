//! # manus-api - Backend Client
//!
//! Everything that crosses the wire to the analysis server.
//!
//! ## Public API
//!
//! - [`Backend`] - Async trait the engine drives (upload, submit, poll, browse, download)
//! - [`HttpBackend`] - reqwest implementation
//! - [`AnalysisContract`] - Sync (`/api/process`) vs async (`/api/analyze`) submission
//! - [`TaskSubmission`] - Contract-independent submission outcome
//! - [`protocol`] - Response envelopes and typed responses
//!
//! With the `test-helpers` feature, [`test_utils`] provides a scripted
//! `FakeBackend`.

pub mod backend;
pub mod client;
pub mod contract;
pub mod protocol;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use backend::{Backend, LocalBackend};
pub use client::{encode_component, HttpBackend, HttpBackendConfig};
pub use contract::{AnalysisContract, TaskRequest, TaskSubmission};
pub use protocol::{
    parse_envelope, FileContent, HealthReport, SessionFilesResponse, StatusResponse,
    UploadResponse, STATUS_HEALTHY, STATUS_SUCCESS,
};
