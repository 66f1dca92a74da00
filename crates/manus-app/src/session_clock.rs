//! Elapsed session time

use std::time::Duration;

use tokio::time::Instant;

/// Wall time since the current wizard session began
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    started_at: Instant,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    pub fn restart(&mut self) {
        self.started_at = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Elapsed time as `m:ss`
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed())
    }
}

/// Format a duration as `m:ss`; minutes are not wrapped into hours
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
