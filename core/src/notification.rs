//! Transient user-facing messages, described as values and shown by a sink.

use log::{error, info, warn};
use std::time::Duration;

/// How long a notification stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub ttl: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    /// Whether a notification shown `elapsed` ago should be gone by now.
    pub fn is_expired(&self, elapsed: Duration) -> bool {
        elapsed >= self.ttl
    }
}

/// Presents notifications; swappable per front-end.
pub trait NotificationSink {
    fn show(&mut self, notification: Notification);
}

/// Sink that only writes to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn show(&mut self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => error!("{}", notification.message),
            NotificationKind::Warning => warn!("{}", notification.message),
            NotificationKind::Info | NotificationKind::Success => info!("{}", notification.message),
        }
    }
}

impl NotificationSink for Vec<Notification> {
    fn show(&mut self, notification: Notification) {
        self.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_is_five_seconds() {
        let n = Notification::success("Saved");
        assert_eq!(n.ttl, Duration::from_secs(5));
        assert_eq!(n.kind, NotificationKind::Success);
    }

    #[test]
    fn test_expiry() {
        let n = Notification::error("Boom");
        assert!(!n.is_expired(Duration::from_millis(4999)));
        assert!(n.is_expired(Duration::from_secs(5)));
    }

    #[test]
    fn test_vec_sink_records() {
        let mut sink: Vec<Notification> = Vec::new();
        sink.show(Notification::new("hello", NotificationKind::Info));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind.as_str(), "info");
    }
}
