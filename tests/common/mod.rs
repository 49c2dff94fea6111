//! Shared fixtures for the integration tests: scripted strategies and fake
//! collaborators standing in for the host application.

#![allow(dead_code)] // each test binary uses a subset of the fixtures

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, mpsc, watch};

use linkbox::auth::AuthObserver;
use linkbox::config::DispatchConfig;
use linkbox::engine::DispatchEngine;
use linkbox::navigation::{NavigationError, NavigationProvider, Navigator};
use linkbox::observability::DispatchHooks;
use linkbox::sources::{ChannelLinkSource, LinkEmitter, LinkEvent, LinkSource, SourceError};
use linkbox::strategies::{LinkStrategy, StrategyError};

/// Records every route a strategy navigates to
#[derive(Default)]
pub struct TestNavigator {
    pub routes: Mutex<Vec<String>>,
}

impl Navigator for TestNavigator {
    fn navigate(&self, route: &str) -> Result<(), NavigationError> {
        self.routes.lock().unwrap().push(route.to_string());
        Ok(())
    }
}

/// Fake navigation surface with a controllable availability switch and an
/// optional resolution budget (for exercising the lost-context path)
pub struct TestSurface {
    available: AtomicBool,
    budget: Mutex<Option<usize>>,
    pub navigator: Arc<TestNavigator>,
}

impl TestSurface {
    pub fn new(available: bool) -> Arc<Self> {
        Arc::new(Self {
            available: AtomicBool::new(available),
            budget: Mutex::new(None),
            navigator: Arc::new(TestNavigator::default()),
        })
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Resolve successfully only `n` more times, then report no surface
    pub fn limit_resolutions(&self, n: usize) {
        *self.budget.lock().unwrap() = Some(n);
    }

    pub fn routes(&self) -> Vec<String> {
        self.navigator.routes.lock().unwrap().clone()
    }
}

impl NavigationProvider for TestSurface {
    fn current_context(&self) -> Option<Arc<dyn Navigator>> {
        if !self.available.load(Ordering::SeqCst) {
            return None;
        }
        let mut budget = self.budget.lock().unwrap();
        if let Some(remaining) = budget.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        Some(self.navigator.clone())
    }
}

/// Watch-backed auth fake recording `on_auth_required` redirects
pub struct TestAuth {
    state: watch::Sender<bool>,
    pub redirects: Mutex<Vec<String>>,
}

impl TestAuth {
    pub fn new(authenticated: bool) -> Arc<Self> {
        let (state, _rx) = watch::channel(authenticated);
        Arc::new(Self {
            state,
            redirects: Mutex::new(Vec::new()),
        })
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.state.send_replace(authenticated);
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.lock().unwrap().len()
    }
}

impl AuthObserver for TestAuth {
    fn is_authenticated(&self) -> bool {
        *self.state.borrow()
    }

    fn on_auth_required(&self, uri: &str) {
        self.redirects.lock().unwrap().push(uri.to_string());
    }

    fn auth_changes(&self) -> Option<watch::Receiver<bool>> {
        Some(self.state.subscribe())
    }
}

/// Configurable strategy recording its `handle` invocations
pub struct ScriptedStrategy {
    id: String,
    prefix: String,
    priority: i32,
    requires_auth: bool,
    fail: bool,
    gate: Option<Arc<Notify>>,
    pub handled: Mutex<Vec<(String, Option<Value>)>>,
}

impl ScriptedStrategy {
    pub fn new(id: &str, prefix: &str) -> Self {
        Self {
            id: id.to_string(),
            prefix: prefix.to_string(),
            priority: 0,
            requires_auth: false,
            fail: false,
            gate: None,
            handled: Mutex::new(Vec::new()),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_auth_required(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Make `handle` park until the gate is notified
    pub fn gated_on(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn handled_uris(&self) -> Vec<String> {
        self.handled
            .lock()
            .unwrap()
            .iter()
            .map(|(uri, _)| uri.clone())
            .collect()
    }

    pub fn handle_count(&self) -> usize {
        self.handled.lock().unwrap().len()
    }
}

#[async_trait]
impl LinkStrategy for ScriptedStrategy {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    fn can_handle(&self, uri: &str) -> bool {
        uri.starts_with(&self.prefix)
    }

    fn extract_data(&self, uri: &str) -> Option<Value> {
        Some(json!({ "echo": uri }))
    }

    async fn handle(
        &self,
        uri: &str,
        _navigator: Arc<dyn Navigator>,
        data: Option<Value>,
    ) -> Result<(), StrategyError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.handled.lock().unwrap().push((uri.to_string(), data));
        if self.fail {
            return Err(StrategyError::Fatal(format!("scripted failure: {uri}")));
        }
        Ok(())
    }
}

/// Link source wrapper counting stream subscriptions and optionally failing
/// the initial link
pub struct TestSource {
    inner: ChannelLinkSource,
    fail_initial: bool,
    pub stream_calls: AtomicUsize,
}

impl TestSource {
    pub fn channel(initial: Option<String>) -> (Arc<Self>, LinkEmitter) {
        let (inner, emitter) = ChannelLinkSource::channel(initial);
        (
            Arc::new(Self {
                inner,
                fail_initial: false,
                stream_calls: AtomicUsize::new(0),
            }),
            emitter,
        )
    }

    pub fn failing_initial() -> (Arc<Self>, LinkEmitter) {
        let (inner, emitter) = ChannelLinkSource::channel(None);
        (
            Arc::new(Self {
                inner,
                fail_initial: true,
                stream_calls: AtomicUsize::new(0),
            }),
            emitter,
        )
    }
}

#[async_trait]
impl LinkSource for TestSource {
    async fn initial_link(&self) -> Result<Option<String>, SourceError> {
        if self.fail_initial {
            return Err(SourceError::InitialLink("platform channel down".to_string()));
        }
        self.inner.initial_link().await
    }

    fn link_stream(&self) -> mpsc::UnboundedReceiver<LinkEvent> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.link_stream()
    }
}

/// Everything a test needs to drive one engine instance
pub struct Harness {
    pub engine: Arc<DispatchEngine>,
    pub emitter: LinkEmitter,
    pub auth: Arc<TestAuth>,
    pub surface: Arc<TestSurface>,
    pub source: Arc<TestSource>,
}

pub struct HarnessBuilder {
    strategies: Vec<Arc<dyn LinkStrategy>>,
    initial_link: Option<String>,
    surface_available: bool,
    authenticated: bool,
    use_auth: bool,
    fail_initial: bool,
    link_ttl: Duration,
    auto_ready: bool,
    hooks: DispatchHooks,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            initial_link: None,
            surface_available: true,
            authenticated: false,
            use_auth: true,
            fail_initial: false,
            link_ttl: Duration::from_secs(300),
            auto_ready: false,
            hooks: DispatchHooks::default(),
        }
    }

    pub fn strategy(mut self, strategy: Arc<dyn LinkStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn initial_link(mut self, uri: &str) -> Self {
        self.initial_link = Some(uri.to_string());
        self
    }

    pub fn failing_initial_link(mut self) -> Self {
        self.fail_initial = true;
        self
    }

    pub fn surface_available(mut self, available: bool) -> Self {
        self.surface_available = available;
        self
    }

    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    pub fn without_auth_observer(mut self) -> Self {
        self.use_auth = false;
        self
    }

    pub fn link_ttl(mut self, ttl: Duration) -> Self {
        self.link_ttl = ttl;
        self
    }

    pub fn auto_ready(mut self, auto_ready: bool) -> Self {
        self.auto_ready = auto_ready;
        self
    }

    pub fn hooks(mut self, hooks: DispatchHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> Harness {
        let (source, emitter) = if self.fail_initial {
            TestSource::failing_initial()
        } else {
            TestSource::channel(self.initial_link)
        };
        let auth = TestAuth::new(self.authenticated);
        let surface = TestSurface::new(self.surface_available);

        let config = DispatchConfig::builder()
            .strategies(self.strategies)
            .source(source.clone() as Arc<dyn LinkSource>)
            .navigation(surface.clone() as Arc<dyn NavigationProvider>)
            .maybe_auth(self.use_auth.then(|| auth.clone() as Arc<dyn AuthObserver>))
            .link_ttl(self.link_ttl)
            .auto_ready(self.auto_ready)
            .hooks(self.hooks)
            .build();

        Harness {
            engine: Arc::new(DispatchEngine::new(config)),
            emitter,
            auth,
            surface,
            source,
        }
    }
}

/// Yield long enough for spawned consumer tasks to drain
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
