// file: src/notify.rs
// description: user-visible notifications raised by the dispatcher

use crate::utils::logging::{format_error, format_info};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, description)
    }

    /// Terminal rendering with the level's colour and glyph
    pub fn render(&self) -> String {
        let line = if self.description.is_empty() {
            self.title.clone()
        } else {
            format!("{}: {}", self.title, self.description)
        };

        match self.level {
            NotificationLevel::Info => format_info(&line),
            NotificationLevel::Error => format_error(&line),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Pending notifications, drained by whoever displays them.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    queue: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.queue.push(notification);
    }

    pub fn pending(&self) -> &[Notification] {
        &self.queue
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::plain;

    #[test]
    fn test_drain_empties_queue() {
        let mut center = NotificationCenter::new();
        center.push(Notification::info("Searching...", "Found 2 results"));
        center.push(Notification::error("Search failed", "connection refused"));

        let drained = center.drain();
        let levels: Vec<_> = drained.iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![NotificationLevel::Info, NotificationLevel::Error]);
        assert!(center.pending().is_empty());
    }

    #[test]
    fn test_render_contains_text() {
        let rendered = plain(&Notification::error("Search failed", "timeout").render());
        assert!(rendered.contains("Search failed: timeout"));
        assert!(rendered.contains('✗'));
    }
}
