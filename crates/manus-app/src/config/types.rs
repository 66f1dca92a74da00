//! Configuration types for .manus/config.toml

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use manus_api::{AnalysisContract, HttpBackendConfig};
use manus_core::FilePolicy;

/// Application settings (.manus/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub upload: UploadSettings,

    #[serde(default)]
    pub analysis: AnalysisSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

impl Settings {
    /// Staging policy derived from `[upload]`
    pub fn file_policy(&self) -> FilePolicy {
        FilePolicy::new(self.upload.max_file_size())
    }

    /// Connection settings for the HTTP backend
    pub fn backend_config(&self) -> HttpBackendConfig {
        HttpBackendConfig {
            base_url: self.server.base_url.clone(),
            contract: self.analysis.contract,
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.server.connect_timeout_secs),
        }
    }
}

/// Backend server settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Base URL of the analysis backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout; analysis requests can run for minutes
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// File staging settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadSettings {
    /// Per-file ceiling in MiB; 0 disables the size check
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

impl UploadSettings {
    pub fn max_file_size(&self) -> Option<u64> {
        match self.max_file_size_mb {
            0 => None,
            mb => Some(mb.saturating_mul(1024 * 1024)),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

fn default_max_file_size_mb() -> u64 {
    500
}

/// Task submission and polling settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisSettings {
    /// `async` polls `/api/status`, `sync` waits on `/api/process`
    #[serde(default)]
    pub contract: AnalysisContract,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Maximum task description length, in characters
    #[serde(default = "default_max_task_length")]
    pub max_task_length: usize,
}

impl AnalysisSettings {
    /// Poll interval, clamped to at least 100ms
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            contract: AnalysisContract::default(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            max_task_length: default_max_task_length(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_poll_attempts() -> u32 {
    300
}

fn default_max_task_length() -> usize {
    manus_core::DEFAULT_MAX_TASK_LENGTH
}

/// Feedback and output settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// How long a notification stays visible
    #[serde(default = "default_notification_timeout_ms")]
    pub notification_timeout_ms: u64,

    /// Where downloads and exports are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl UiSettings {
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            notification_timeout_ms: default_notification_timeout_ms(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_notification_timeout_ms() -> u64 {
    5000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
