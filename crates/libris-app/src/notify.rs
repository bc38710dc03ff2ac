//! # Notification Channel
//!
//! A process-wide queue of transient `{severity, message}` pairs. Components
//! push onto it whenever a step succeeds or fails; the presentation layer
//! drains it. It is a sink only: nothing in the core reads it back.

use serde::Serialize;
use tokio::sync::mpsc;

/// How a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A step completed.
    Success,
    /// A step was refused locally.
    Warning,
    /// A step failed.
    Error,
}

impl Severity {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Sending half. Cheap to clone; every component holds one.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

/// Receiving half, owned by the presentation layer.
#[derive(Debug)]
pub struct Notifications {
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl Notifier {
    /// Create a connected pair.
    pub fn channel() -> (Notifier, Notifications) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Notifier { tx }, Notifications { rx })
    }

    /// Push a notification. Never blocks. A dropped receiver is not an
    /// error for the sender.
    pub fn send(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        if self.tx.send(Notification { severity, message }).is_err() {
            tracing::debug!(%severity, "notification dropped: receiver closed");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.send(Severity::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.send(Severity::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Severity::Error, message);
    }
}

impl Notifications {
    /// Wait for the next notification. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Take everything queued right now without waiting.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.rx.try_recv() {
            out.push(n);
        }
        out
    }
}
