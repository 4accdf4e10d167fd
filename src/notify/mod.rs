//! User-facing notifications raised by the domain contexts.

use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: Level::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into() }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps every notification in memory so a front end can drain and display them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        match self.entries.lock() {
            Ok(mut entries) => std::mem::take(&mut *entries),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_buffer() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::success("Budget saved successfully!"));
        notifier.notify(Notification::error("Failed to load goals"));

        assert_eq!(notifier.snapshot().len(), 2);
        let drained = notifier.drain();
        assert_eq!(drained[1], Notification::error("Failed to load goals"));
        assert!(notifier.drain().is_empty());
    }
}
