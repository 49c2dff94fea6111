//! Observability (counters, host hooks)

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::strategies::StrategyError;

/// Metrics handle for recording dispatch counters
#[derive(Debug, Default)]
pub struct Metrics {
    links_received: AtomicU64,
    links_dispatched: AtomicU64,
    links_deferred: AtomicU64,
    links_dropped: AtomicU64,
    links_unmatched: AtomicU64,
    links_expired: AtomicU64,
    dispatch_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_received(&self) {
        self.links_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_dispatched(&self) {
        self.links_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_deferred(&self) {
        self.links_deferred.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_dropped(&self) {
        self.links_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_unmatched(&self) {
        self.links_unmatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link_expired(&self) {
        self.links_expired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dispatch_failed(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            links_received: self.links_received.load(Ordering::Relaxed),
            links_dispatched: self.links_dispatched.load(Ordering::Relaxed),
            links_deferred: self.links_deferred.load(Ordering::Relaxed),
            links_dropped: self.links_dropped.load(Ordering::Relaxed),
            links_unmatched: self.links_unmatched.load(Ordering::Relaxed),
            links_expired: self.links_expired.load(Ordering::Relaxed),
            dispatch_failures: self.dispatch_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub links_received: u64,
    pub links_dispatched: u64,
    pub links_deferred: u64,
    pub links_dropped: u64,
    pub links_unmatched: u64,
    pub links_expired: u64,
    pub dispatch_failures: u64,
}

/// A failed strategy execution, as delivered to the host error hook
#[derive(Debug)]
pub struct DispatchFailure {
    pub uri: String,
    pub strategy: String,
    pub error: StrategyError,
}

pub type LogHook = Arc<dyn Fn(&str) + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(&DispatchFailure) + Send + Sync>;

/// Optional host-provided log/error callbacks
///
/// Both are fire-and-forget. Tracing output is always emitted regardless;
/// hooks exist so hosts can forward dispatch events into their own reporting
/// (crash reporters, analytics) without a tracing subscriber.
#[derive(Clone, Default)]
pub struct DispatchHooks {
    pub on_log: Option<LogHook>,
    pub on_error: Option<ErrorHook>,
}

impl DispatchHooks {
    pub fn log(&self, message: &str) {
        if let Some(hook) = &self.on_log {
            hook(message);
        }
    }

    pub fn error(&self, failure: &DispatchFailure) {
        if let Some(hook) = &self.on_error {
            hook(failure);
        }
    }
}

impl fmt::Debug for DispatchHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchHooks")
            .field("on_log", &self.on_log.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
