use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth::AuthObserver;
use crate::config::{ConfigWarning, DispatchConfig, inspect};
use crate::navigation::{NavigationProvider, Navigator};
use crate::observability::{DispatchFailure, DispatchHooks, Metrics, MetricsSnapshot};
use crate::sources::LinkSource;
use crate::strategies::{LinkStrategy, StrategyRegistry};

use super::pending::{PendingLink, PendingSlot};

/// RAII re-entrancy guard
///
/// Only one caller may run matching/dispatch logic at a time; a failed
/// acquire means another dispatch is in flight and the attempt is dropped,
/// never queued.
struct DispatchGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> DispatchGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| Self { flag })
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The deep-link dispatch engine
///
/// Receives link URIs from a [`LinkSource`], matches them against registered
/// strategies, and either dispatches immediately, defers into the single
/// pending slot until readiness/auth allow it, or drops the link. Owned by
/// the host's composition root; construct with [`DispatchEngine::new`] and
/// call [`initialize`](DispatchEngine::initialize) once the runtime is up.
pub struct DispatchEngine {
    registry: Mutex<StrategyRegistry>,
    pending: PendingSlot,
    dispatching: AtomicBool,
    app_ready: AtomicBool,
    init: OnceCell<()>,
    source: Arc<dyn LinkSource>,
    navigation: Arc<dyn NavigationProvider>,
    auth: Option<Arc<dyn AuthObserver>>,
    link_ttl: Duration,
    auto_ready: bool,
    hooks: DispatchHooks,
    metrics: Metrics,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl DispatchEngine {
    pub fn new(config: DispatchConfig) -> Self {
        for warning in inspect(&config) {
            warn!(%warning, "configuration warning");
            config.hooks.log(&warning.to_string());
        }

        let mut registry = StrategyRegistry::new();
        for strategy in &config.strategies {
            registry.register(Arc::clone(strategy));
        }

        Self {
            registry: Mutex::new(registry),
            pending: PendingSlot::new(),
            dispatching: AtomicBool::new(false),
            app_ready: AtomicBool::new(false),
            init: OnceCell::new(),
            source: config.source,
            navigation: config.navigation,
            auth: config.auth,
            link_ttl: config.link_ttl,
            auto_ready: config.auto_ready,
            hooks: config.hooks,
            metrics: Metrics::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Resolve the initial link and subscribe to the live stream
    ///
    /// Idempotent: concurrent callers share a single setup run, so the link
    /// stream and auth notifier are never subscribed twice. The initial link
    /// is fully processed before the stream subscription is created; links
    /// arriving meanwhile sit in the source's channel until then.
    pub async fn initialize(self: &Arc<Self>) {
        self.init.get_or_init(|| self.run_setup()).await;
    }

    pub fn is_initialized(&self) -> bool {
        self.init.initialized()
    }

    async fn run_setup(self: &Arc<Self>) {
        info!("initializing link dispatch engine");

        match self.source.initial_link().await {
            Ok(Some(uri)) => {
                debug!(%uri, "initial link resolved");
                self.handle_link(&uri).await;
            }
            Ok(None) => debug!("no initial link"),
            Err(err) => warn!(error = %err, "failed to resolve initial link"),
        }

        let mut stream = self.source.link_stream();
        let engine = Arc::clone(self);
        let stream_task = tokio::spawn(async move {
            while let Some(event) = stream.recv().await {
                match event {
                    Ok(uri) => engine.handle_link(&uri).await,
                    Err(err) => {
                        warn!(error = %err, "link stream delivered an error, continuing")
                    }
                }
            }
            debug!("link stream closed");
        });

        let auth_task = self
            .auth
            .as_ref()
            .and_then(|auth| auth.auth_changes())
            .map(|mut changes| {
                let engine = Arc::clone(self);
                tokio::spawn(async move {
                    while changes.changed().await.is_ok() {
                        let authenticated = *changes.borrow();
                        if authenticated {
                            debug!("authenticated, re-checking pending link");
                            engine.check_pending_links().await;
                        } else {
                            debug!("logged out, forgetting pending link");
                            engine.clear_pending_link();
                        }
                    }
                })
            });

        let mut tasks = self.tasks.lock().expect("task list lock poisoned");
        tasks.push(stream_task);
        tasks.extend(auth_task);

        info!(
            strategies = self.registry.lock().expect("registry lock poisoned").len(),
            "link dispatch engine initialized"
        );
    }

    /// Entry point for a received link (initial, streamed, or host-injected)
    ///
    /// Never fails from the caller's perspective: every outcome degrades to a
    /// log line and a counter.
    pub async fn handle_link(&self, uri: &str) {
        self.metrics.link_received();

        let Some(_guard) = DispatchGuard::try_acquire(&self.dispatching) else {
            warn!(%uri, "dispatch already in flight, dropping link");
            self.hooks.log(&format!("dropped re-entrant link: {uri}"));
            self.metrics.link_dropped();
            return;
        };

        self.process(uri).await;
    }

    async fn process(&self, uri: &str) {
        let trace_id = Uuid::new_v4();

        let matched = {
            let registry = self.registry.lock().expect("registry lock poisoned");
            registry.match_strategy(uri)
        };
        let Some(strategy) = matched else {
            info!(%uri, %trace_id, "no strategy matched, dropping link");
            self.hooks.log(&format!("no strategy matched link: {uri}"));
            self.metrics.link_unmatched();
            return;
        };
        debug!(%uri, %trace_id, strategy = strategy.identifier(), "strategy matched");

        let data = strategy.extract_data(uri);

        if strategy.requires_auth() && !self.is_authenticated() {
            info!(
                %uri, %trace_id,
                strategy = strategy.identifier(),
                "auth required, deferring link"
            );
            self.defer(PendingLink::new(uri, data, Arc::clone(&strategy)));
            if let Some(auth) = &self.auth {
                auth.on_auth_required(uri);
            }
            return;
        }

        if !self.can_handle_now() {
            info!(%uri, %trace_id, "app not ready, deferring link");
            self.defer(PendingLink::new(uri, data, strategy));
            return;
        }

        self.execute_now(strategy, uri, data, trace_id).await;
    }

    /// Mark the navigation surface as existing and re-check the pending link
    pub async fn set_app_ready(&self) {
        if !self.app_ready.swap(true, Ordering::SeqCst) {
            info!("app marked ready");
        }
        self.check_pending_links().await;
    }

    /// Re-evaluate the pending link against current readiness/auth state
    ///
    /// Invoked automatically on readiness and auth-change signals; hosts may
    /// also call it directly (e.g. after a login flow completes).
    pub async fn check_pending_links(&self) {
        let Some(_guard) = DispatchGuard::try_acquire(&self.dispatching) else {
            debug!("dispatch in flight, pending re-check skipped");
            return;
        };

        let Some(link) = self.pending.take() else {
            return;
        };
        let trace_id = Uuid::new_v4();

        if link.is_expired(self.link_ttl) {
            info!(
                uri = %link.uri, %trace_id,
                age_secs = link.age().as_secs(),
                "pending link expired, discarding"
            );
            self.hooks.log(&format!("pending link expired: {}", link.uri));
            self.metrics.link_expired();
            return;
        }

        if link.strategy.requires_auth() && !self.is_authenticated() {
            debug!(uri = %link.uri, %trace_id, "still unauthenticated, leaving link pending");
            self.pending.store(link);
            return;
        }

        if !self.can_handle_now() {
            debug!(uri = %link.uri, %trace_id, "app not ready, leaving link pending");
            self.pending.store(link);
            return;
        }

        let PendingLink {
            uri, data, strategy, ..
        } = link;
        self.execute_now(strategy, &uri, data, trace_id).await;
    }

    /// Discard any deferred link (e.g. on logout without an auth notifier)
    pub fn clear_pending_link(&self) {
        self.pending.clear();
    }

    pub fn has_pending_link(&self) -> bool {
        self.pending.is_occupied()
    }

    /// Register an additional strategy after construction
    pub fn register_strategy(&self, strategy: Arc<dyn LinkStrategy>) {
        if strategy.requires_auth() && self.auth.is_none() {
            let warning = ConfigWarning::AuthStrategyWithoutObserver {
                identifier: strategy.identifier().to_string(),
            };
            warn!(%warning, "configuration warning");
            self.hooks.log(&warning.to_string());
        }
        self.registry
            .lock()
            .expect("registry lock poisoned")
            .register(strategy);
    }

    /// Unsubscribe from the link stream and auth notifier
    ///
    /// Safe to call before, after, or without completed initialization, and
    /// safe to call twice.
    pub fn dispose(&self) {
        let mut tasks = self.tasks.lock().expect("task list lock poisoned");
        if tasks.is_empty() {
            return;
        }
        for task in tasks.drain(..) {
            task.abort();
        }
        info!("link dispatch engine disposed");
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn is_authenticated(&self) -> bool {
        self.auth.as_ref().is_some_and(|auth| auth.is_authenticated())
    }

    /// App ready and a navigation surface currently resolvable
    ///
    /// With `auto_ready`, the first resolvable surface doubles as the
    /// readiness signal so hosts without an explicit first-render hook still
    /// dispatch.
    fn can_handle_now(&self) -> bool {
        let context_live = self.navigation.current_context().is_some();
        if context_live && self.auto_ready && !self.app_ready.load(Ordering::SeqCst) {
            info!("navigation surface resolvable, marking app ready");
            self.app_ready.store(true, Ordering::SeqCst);
        }
        self.app_ready.load(Ordering::SeqCst) && context_live
    }

    async fn execute_now(
        &self,
        strategy: Arc<dyn LinkStrategy>,
        uri: &str,
        data: Option<Value>,
        trace_id: Uuid,
    ) {
        // re-resolved at execution time, not matching time; the surface may
        // have gone away since the readiness check
        let Some(navigator) = self.navigation.current_context() else {
            info!(%uri, %trace_id, "navigation context lost before execution, re-deferring");
            self.defer(PendingLink::new(uri, data, strategy));
            return;
        };
        self.execute_and_report(strategy, uri, navigator, data, trace_id)
            .await;
    }

    async fn execute_and_report(
        &self,
        strategy: Arc<dyn LinkStrategy>,
        uri: &str,
        navigator: Arc<dyn Navigator>,
        data: Option<Value>,
        trace_id: Uuid,
    ) {
        info!(%uri, %trace_id, strategy = strategy.identifier(), "dispatching link");
        match strategy.handle(uri, navigator, data).await {
            Ok(()) => {
                debug!(%uri, %trace_id, "link dispatched");
                self.metrics.link_dispatched();
            }
            Err(err) => {
                error!(
                    %uri, %trace_id,
                    strategy = strategy.identifier(),
                    error = %err,
                    "strategy execution failed"
                );
                let failure = DispatchFailure {
                    uri: uri.to_string(),
                    strategy: strategy.identifier().to_string(),
                    error: err,
                };
                self.hooks.error(&failure);
                // a persistently-failing link must not retry forever
                self.pending.clear();
                self.metrics.dispatch_failed();
            }
        }
    }

    fn defer(&self, link: PendingLink) {
        self.metrics.link_deferred();
        if let Some(replaced) = self.pending.store(link) {
            debug!(replaced = %replaced.uri, "pending link overwritten, last wins");
        }
    }
}
