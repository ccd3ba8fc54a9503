//! # Notifications
//!
//! Out-of-band failure reports. A request that fails can be reported to a
//! caller-supplied sink in addition to (or instead of) the returned error.
//! Nothing is reported on success.

use crate::error::SagaError;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::warn;

/// Chain tag used by the intent bridge
pub const SERVER_INTENT_CHAIN: &str = "server intent";

/// Event name used when a notification is emitted to UI listeners
pub const VERIFY_EVENT: &str = "verify";

/// A single failure report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Which step of the flow failed
    pub chain: String,
    pub error: bool,
    pub data: serde_json::Value,
}

impl NotificationEvent {
    /// Build a failure event carrying `err` as `{kind, message}`
    pub fn failure(chain: impl Into<String>, err: &SagaError) -> Self {
        Self {
            chain: chain.into(),
            error: true,
            data: serde_json::json!({
                "kind": err.kind(),
                "message": err.to_string(),
            }),
        }
    }

    /// Failure event for the intent bridge
    pub fn server_intent(err: &SagaError) -> Self {
        Self::failure(SERVER_INTENT_CHAIN, err)
    }

    /// Error message carried in `data`, if any
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(|v| v.as_str())
    }
}

/// Sink for failure notifications
pub trait Notifier {
    fn notify(&self, event: NotificationEvent);
}

impl<F> Notifier for F
where
    F: Fn(NotificationEvent),
{
    fn notify(&self, event: NotificationEvent) {
        self(event)
    }
}

/// Notifier that writes events to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, event: NotificationEvent) {
        warn!(
            chain = %event.chain,
            data = %event.data,
            "Request failed"
        );
    }
}

/// Notifier that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: NotificationEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
