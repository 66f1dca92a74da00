//! manus-app - Wizard state and orchestration for the Manus client
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! upload → task → results wizard, the Engine that drives it against a
//! [`manus_api::Backend`], configuration loading and HTML rendering.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input;
pub mod message;
pub mod notifications;
pub mod process;
pub mod render;
pub mod session_clock;
pub mod signals;
pub mod state;

// Re-export primary types
pub use config::Settings;
pub use engine::Engine;
pub use engine_event::{EngineEvent, ProgressStage};
pub use handler::{UpdateAction, UpdateResult};
pub use input::{parse_command, Command};
pub use message::Message;
pub use notifications::{Notification, Notifications};
pub use render::Renderer;
pub use state::{AppState, Phase, ViewMode};
