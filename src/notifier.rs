//! Result notification sinks.
//!
//! The store reports the outcome of every operation to a [`ResultNotifier`].
//! Delivery is best-effort: a notifier never returns an error and never
//! panics, so a broken display channel cannot stall the store.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// A single user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub outcome: Outcome,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure,
            message: message.into(),
        }
    }
}

/// One-way sink for operation outcomes.
pub trait ResultNotifier: Send + Sync {
    fn notify_success(&self, message: &str);

    fn notify_failure(&self, message: &str);
}

/// Logs outcomes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl ResultNotifier for TracingNotifier {
    fn notify_success(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn notify_failure(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Prints successes to stdout and failures to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ResultNotifier for ConsoleNotifier {
    fn notify_success(&self, message: &str) {
        let _ = writeln!(std::io::stdout().lock(), "✓ {}", message);
    }

    fn notify_failure(&self, message: &str) {
        let _ = writeln!(std::io::stderr().lock(), "✗ {}", message);
    }
}

/// Forwards notifications to a receiver owned by the display layer.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification dropped: receiver closed");
        }
    }
}

impl ResultNotifier for ChannelNotifier {
    fn notify_success(&self, message: &str) {
        self.send(Notification::success(message));
    }

    fn notify_failure(&self, message: &str) {
        self.send(Notification::failure(message));
    }
}

/// Keeps every notification in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    log: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(Outcome::Success)
    }

    pub fn failures(&self) -> Vec<String> {
        self.messages(Outcome::Failure)
    }

    pub fn clear(&self) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn messages(&self, outcome: Outcome) -> Vec<String> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|n| n.outcome == outcome)
            .map(|n| n.message.clone())
            .collect()
    }

    fn push(&self, notification: Notification) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

impl ResultNotifier for RecordingNotifier {
    fn notify_success(&self, message: &str) {
        self.push(Notification::success(message));
    }

    fn notify_failure(&self, message: &str) {
        self.push(Notification::failure(message));
    }
}
