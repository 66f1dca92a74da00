//! # manus-core - Core Domain Types
//!
//! Foundation crate for the Manus client. Provides domain types, the file
//! staging policy, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`StagedFile`] - A local file selected for upload
//! - [`SessionId`] - Server-assigned session identifier
//! - [`ProjectStructure`], [`ProjectFile`], [`UploadedFile`] - Upload summaries
//! - [`AnalysisResult`], [`CodeChange`], [`AnalysisMetadata`] - AI output
//! - [`AnalysisStatus`] - Server-side analysis lifecycle
//! - [`WizardStep`], [`StepView`] - Wizard position and its derived view
//!
//! ### File Policy (`file_policy`)
//! - [`FilePolicy`] - Size ceiling + extension allow-list
//! - [`FileCategory`] - code/data/media/archive/other
//! - [`language_for_file()`], [`format_file_size()`]
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use manus_core::prelude::*;
//! ```

pub mod error;
pub mod file_policy;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all Manus crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use file_policy::{
    extension_of, format_file_size, language_for_file, FileCategory, FilePolicy, Rejection,
    ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_TASK_LENGTH,
};
pub use types::{
    AnalysisMetadata, AnalysisResult, AnalysisStatus, CodeChange, NotificationLevel, ProjectFile,
    ProjectStructure, SessionId, StagedFile, StepIndicator, StepView, UploadedFile, WizardStep,
};
