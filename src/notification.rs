//! Single-slot toast notification.

use std::time::{Duration, Instant};

/// Default display time of a notification.
pub const DEFAULT_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone)]
struct Posted {
    message: String,
    at: Instant,
}

/// Holds at most one message. Posting replaces the current one.
#[derive(Debug, Clone)]
pub struct NotificationSlot {
    current: Option<Posted>,
    ttl: Duration,
}

impl Default for NotificationSlot {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationSlot {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn post(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!(message = %message, "Notification posted");
        self.current = Some(Posted { message, at: now });
    }

    /// The message still on screen at `now`, if any.
    #[must_use]
    pub fn active(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|p| now.saturating_duration_since(p.at) < self.ttl)
            .map(|p| p.message.as_str())
    }

    /// Time left before the current message expires.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|p| self.ttl.saturating_sub(now.saturating_duration_since(p.at)))
            .filter(|d| !d.is_zero())
    }

    /// Clear an expired message.
    pub fn tick(&mut self, now: Instant) {
        if self.active(now).is_none() {
            self.current = None;
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
