//! Configuration file parsing for the Manus client
//!
//! Supports:
//! - `.manus/config.toml` - Global settings (or an explicit `--config` path)

pub mod settings;
pub mod types;

pub use settings::{config_path, init_config_dir, load_settings, load_settings_from, save_settings};
pub use types::*;
