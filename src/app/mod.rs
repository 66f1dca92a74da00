//! Application entry points: error reporting, logging, settings and backend setup

use std::path::{Path, PathBuf};

use manus_api::{AnalysisContract, HttpBackend};
use manus_app::config::{load_settings, load_settings_from};
use manus_app::Settings;
use manus_core::prelude::*;

use crate::headless::runner::{self, AnalyzeOptions};

/// Overrides given on the command line
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Explicit config file instead of `.manus/config.toml`
    pub config: Option<PathBuf>,
    pub server: Option<String>,
    /// Use the synchronous analysis contract
    pub sync: bool,
    pub output_dir: Option<PathBuf>,
    /// Log level for the client crates when `MANUS_LOG` is unset
    pub log_level: Option<String>,
}

/// Load settings for `project_path` and apply command-line overrides
pub fn resolve_settings(project_path: &Path, options: &ClientOptions) -> Settings {
    let mut settings = match &options.config {
        Some(path) => load_settings_from(path),
        None => load_settings(project_path),
    };

    if let Some(server) = &options.server {
        settings.server.base_url = server.clone();
    }
    if options.sync {
        settings.analysis.contract = AnalysisContract::Sync;
    }
    if let Some(dir) = &options.output_dir {
        settings.ui.output_dir = dir.clone();
    }
    settings
}

fn init(options: &ClientOptions) -> Result<()> {
    color_eyre::install().map_err(|e| Error::config(e.to_string()))?;

    // stdout carries the event stream, so logs go to a file
    manus_core::logging::init(options.log_level.as_deref())?;
    Ok(())
}

fn prepare(options: &ClientOptions) -> Result<(Settings, HttpBackend)> {
    init(options)?;

    let project_path = std::env::current_dir()?;
    let settings = resolve_settings(&project_path, options);
    info!(
        "Using {} with the {:?} contract",
        settings.server.base_url, settings.analysis.contract
    );

    let backend = HttpBackend::new(&settings.backend_config()).context("Building HTTP client")?;
    Ok((settings, backend))
}

/// Interactive session: commands on stdin, events on stdout
pub async fn run_interactive(options: &ClientOptions) -> Result<()> {
    let (settings, backend) = prepare(options)?;

    let result = runner::run_interactive(backend, settings).await;
    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("Manus client exiting");
    result
}

/// One unattended analysis
pub async fn run_analyze(options: &ClientOptions, analyze: AnalyzeOptions) -> Result<()> {
    let (settings, backend) = prepare(options)?;

    let result = runner::run_analyze(backend, settings, analyze).await;
    if let Err(ref e) = result {
        error!("Analysis run failed: {:?}", e);
    }

    info!("Manus client exiting");
    result
}

/// Returns whether the backend reported itself healthy
pub async fn run_health(options: &ClientOptions) -> Result<bool> {
    let (_, backend) = prepare(options)?;
    runner::run_health(&backend).await
}
