//! Settings parser for .manus/config.toml

use std::path::{Path, PathBuf};

use manus_core::prelude::*;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const MANUS_DIR: &str = ".manus";

/// Default location of the config file for a working directory
pub fn config_path(project_path: &Path) -> PathBuf {
    project_path.join(MANUS_DIR).join(CONFIG_FILENAME)
}

/// Load settings from .manus/config.toml under `project_path`
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(project_path: &Path) -> Settings {
    load_settings_from(&config_path(project_path))
}

/// Load settings from an explicit file, with the same fallbacks
pub fn load_settings_from(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Write settings back to .manus/config.toml
pub fn save_settings(project_path: &Path, settings: &Settings) -> Result<()> {
    let manus_dir = project_path.join(MANUS_DIR);
    std::fs::create_dir_all(&manus_dir)
        .map_err(|e| Error::config(format!("Failed to create .manus dir: {}", e)))?;

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    std::fs::write(manus_dir.join(CONFIG_FILENAME), content)
        .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
    Ok(())
}

/// Create .manus/config.toml with commented defaults if missing
pub fn init_config_dir(project_path: &Path) -> Result<PathBuf> {
    let manus_dir = project_path.join(MANUS_DIR);

    if !manus_dir.exists() {
        std::fs::create_dir_all(&manus_dir)
            .map_err(|e| Error::config(format!("Failed to create .manus dir: {}", e)))?;
        info!("Created .manus directory");
    }

    let config_path = manus_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, generate_default_config())
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config.toml");
    }

    Ok(config_path)
}

fn generate_default_config() -> &'static str {
    r#"# Manus Client Configuration

[server]
base_url = "http://localhost:5001"
request_timeout_secs = 300   # Analysis requests can take minutes
connect_timeout_secs = 10

[upload]
max_file_size_mb = 500       # 0 = no size limit

[analysis]
contract = "async"           # "async" polls /api/status, "sync" waits on /api/process
poll_interval_ms = 2000
max_poll_attempts = 300
max_task_length = 2000

[ui]
notification_timeout_ms = 5000
output_dir = "."             # Where downloads and exports are written
"#
}
