//! Notification sink boundary.
//!
//! The core reports outcomes fire-and-forget: a message and a severity.
//! Rendering, stacking and auto-dismiss timing are presentation concerns
//! that live in the host shell, outside this crate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// Where the core pushes user-facing messages. Implementations must not
/// block; callers are often mid-interaction when a message is emitted.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Collects notifications in memory, for tests and for hosts that render
/// their own toast stack from the accumulated list.
#[derive(Debug, Default)]
pub struct MemorySink {
    next_id: AtomicU64,
    messages: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently visible notifications, oldest first.
    pub fn messages(&self) -> Vec<Notification> {
        self.messages.lock().expect("sink lock poisoned").clone()
    }

    /// Remove one notification. Unknown ids are ignored.
    pub fn dismiss(&self, id: u64) {
        self.messages
            .lock()
            .expect("sink lock poisoned")
            .retain(|n| n.id != id);
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, message: &str, severity: Severity) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, ?severity, "notification emitted");
        self.messages
            .lock()
            .expect("sink lock poisoned")
            .push(Notification {
                id,
                message: message.to_string(),
                severity,
            });
    }
}
