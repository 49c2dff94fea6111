//! Authentication observer boundary
//!
//! The engine never owns or mutates auth state. It polls
//! [`AuthObserver::is_authenticated`] at each auth gate, fires
//! `on_auth_required` when it defers an auth-gated link, and optionally
//! watches a change channel so pending links re-check on login and are
//! forgotten on logout.

use tokio::sync::watch;

/// Read-only view of the host's authentication state
pub trait AuthObserver: Send + Sync {
    /// Current authentication status, polled on demand and never cached
    fn is_authenticated(&self) -> bool;

    /// Fired once when an auth-gated link is deferred; typical hosts redirect
    /// to a login screen here. Fire-and-forget.
    fn on_auth_required(&self, _uri: &str) {}

    /// Optional change notifications. When present, the engine subscribes at
    /// initialization and drops the receiver on dispose.
    fn auth_changes(&self) -> Option<watch::Receiver<bool>> {
        None
    }
}

/// Watch-channel-backed auth flag for hosts and tests
pub struct WatchAuthState {
    state: watch::Sender<bool>,
}

impl WatchAuthState {
    pub fn new(authenticated: bool) -> Self {
        let (state, _rx) = watch::channel(authenticated);
        Self { state }
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        // send_replace keeps working with no live receivers
        self.state.send_replace(authenticated);
    }
}

impl AuthObserver for WatchAuthState {
    fn is_authenticated(&self) -> bool {
        *self.state.borrow()
    }

    fn auth_changes(&self) -> Option<watch::Receiver<bool>> {
        Some(self.state.subscribe())
    }
}
