//! Logging configuration using tracing

use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Crates whose logs the level override applies to
const CLIENT_TARGETS: &[&str] = &["manus", "manus_client", "manus_app", "manus_api", "manus_core"];

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/manus-client/logs/` so that stdout
/// stays reserved for headless NDJSON events.
/// `MANUS_LOG` takes precedence; otherwise `level` (e.g. from `--log-level`)
/// sets the level for the client crates, defaulting to `info`.
///
/// # Examples
/// ```bash
/// MANUS_LOG=debug manus analyze src/ --task "review"
/// MANUS_LOG=manus_api=trace manus health
/// manus --log-level debug health
/// ```
pub fn init(level: Option<&str>) -> Result<()> {
    let env_filter = match EnvFilter::try_from_env("MANUS_LOG") {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(client_filter(level)?),
    };

    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "manus.log");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("Manus client starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Filter directives for the client crates at `level`, everything else at `warn`
fn client_filter(level: Option<&str>) -> Result<String> {
    let level = match level {
        Some(raw) => Level::from_str(raw.trim())
            .map_err(|_| Error::config(format!("Unknown log level '{}'", raw)))?,
        None => Level::INFO,
    };
    let level = level.to_string().to_lowercase();

    let mut directives: Vec<String> = CLIENT_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("warn".to_string());
    Ok(directives.join(","))
}

fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("manus-client").join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_is_client_specific() {
        assert!(get_log_directory().ends_with("manus-client/logs"));
    }

    #[test]
    fn test_default_filter_is_info() {
        let filter = client_filter(None).unwrap();
        assert!(filter.starts_with("manus=info,"));
        assert!(filter.contains("manus_api=info"));
        assert!(filter.ends_with(",warn"));
    }

    #[test]
    fn test_level_override_applies_to_client_crates() {
        let filter = client_filter(Some("DEBUG")).unwrap();
        for target in CLIENT_TARGETS {
            assert!(filter.contains(&format!("{}=debug", target)), "{}", filter);
        }
        assert!(filter.ends_with(",warn"));
    }

    #[test]
    fn test_unknown_level_is_config_error() {
        let err = client_filter(Some("loud")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: Unknown log level 'loud'");
    }
}
