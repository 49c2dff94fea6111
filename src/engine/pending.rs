use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::strategies::LinkStrategy;

/// A deferred link awaiting readiness or authentication
///
/// Holds the strategy that claimed the link (owning reference, not a
/// re-match) so the re-check path executes exactly what matching decided.
pub struct PendingLink {
    pub uri: String,
    pub data: Option<Value>,
    pub strategy: Arc<dyn LinkStrategy>,
    pub received_at: DateTime<Utc>,
}

impl PendingLink {
    pub fn new(uri: impl Into<String>, data: Option<Value>, strategy: Arc<dyn LinkStrategy>) -> Self {
        Self {
            uri: uri.into(),
            data,
            strategy,
            received_at: Utc::now(),
        }
    }

    /// Age of the link since it was received
    pub fn age(&self) -> Duration {
        (Utc::now() - self.received_at).to_std().unwrap_or_default()
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

/// Single-item storage for at most one deferred link
///
/// A slot, not a queue: storing while occupied replaces the previous link
/// (last wins). The engine serializes access through its dispatch guard; the
/// mutex here only protects against host calls like `clear_pending_link`
/// racing a dispatch.
#[derive(Default)]
pub struct PendingSlot {
    slot: Mutex<Option<PendingLink>>,
}

impl PendingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a link, replacing any existing one. Returns the replaced link.
    pub fn store(&self, link: PendingLink) -> Option<PendingLink> {
        self.lock().replace(link)
    }

    pub fn take(&self) -> Option<PendingLink> {
        self.lock().take()
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn is_occupied(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<PendingLink>> {
        self.slot.lock().expect("pending slot lock poisoned")
    }
}
