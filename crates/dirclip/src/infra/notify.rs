//! Fire-and-forget user notifications.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl NotificationLevel {
    pub fn title(self) -> &'static str {
        match self {
            NotificationLevel::Info => "Info",
            NotificationLevel::Success => "Success",
            NotificationLevel::Error => "Error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: Instant,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.level.title()
    }

    pub fn is_older_than(&self, age: Duration) -> bool {
        self.raised_at.elapsed() >= age
    }
}

/// Receives notifications. No acknowledgement is expected.
pub trait Notifier {
    fn notify(&mut self, level: NotificationLevel, message: String);

    fn success(&mut self, message: String) {
        self.notify(NotificationLevel::Success, message);
    }

    fn error(&mut self, message: String) {
        self.notify(NotificationLevel::Error, message);
    }
}

/// Bounded history of notifications; the newest one drives the status line.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: Vec<Notification>,
    capacity: usize,
}

impl NotificationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|n| n.message.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, level: NotificationLevel, message: String) {
        match level {
            NotificationLevel::Error => tracing::warn!(title = level.title(), "{message}"),
            _ => tracing::info!(title = level.title(), "{message}"),
        }
        if self.entries.len() == self.capacity {
            self.entries.remove(0);
        }
        self.entries.push(Notification::new(level, message));
    }
}
