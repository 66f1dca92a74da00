//! Transient user notifications (toasts)

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use manus_core::NotificationLevel;

/// A single notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    #[serde(skip)]
    pub created_at: Instant,
}

/// Visible notifications, oldest first
#[derive(Debug, Clone)]
pub struct Notifications {
    items: VecDeque<Notification>,
    next_id: u64,
    timeout: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}

impl Notifications {
    pub fn new(timeout: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            next_id: 1,
            timeout,
        }
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push_back(Notification {
            id,
            level,
            message: message.into(),
            created_at: Instant::now(),
        });
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Info, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Success, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Warning, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Error, message)
    }

    /// Drop notifications older than the timeout. Returns how many went.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        let timeout = self.timeout;
        self.items
            .retain(|n| now.saturating_duration_since(n.created_at) < timeout);
        before - self.items.len()
    }

    /// Id the next notification will get
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Notifications created at or after `id`, still visible
    pub fn since(&self, id: u64) -> impl Iterator<Item = &Notification> {
        self.items.iter().filter(move |n| n.id >= id)
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
