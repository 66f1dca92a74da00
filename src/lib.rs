//! Manus Client Library
//!
//! Headless client for the Manus upload-and-analysis service: stage files,
//! upload them, submit a task and follow the analysis to its results.

// Module declarations
pub mod app;
pub mod headless;

// Re-export main entry points
pub use app::{resolve_settings, run_analyze, run_health, run_interactive, ClientOptions};
pub use headless::runner::AnalyzeOptions;
pub use headless::{EventSink, HeadlessEvent};
