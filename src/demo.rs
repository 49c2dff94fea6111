//! Scripted demo session: a fake link source and navigation surface wired to
//! a real engine, driven from CLI arguments.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use linkbox::auth::{AuthObserver, WatchAuthState};
use linkbox::config::{DispatchConfig, Settings};
use linkbox::engine::DispatchEngine;
use linkbox::navigation::{NavigationError, NavigationProvider, Navigator};
use linkbox::sources::ChannelLinkSource;
use linkbox::strategies::{LinkStrategy, PathPrefixStrategy};

use crate::cli::DemoArgs;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: &str) -> Result<(), NavigationError> {
        info!(route, "navigating");
        Ok(())
    }
}

struct AlwaysLive;

impl NavigationProvider for AlwaysLive {
    fn current_context(&self) -> Option<Arc<dyn Navigator>> {
        Some(Arc::new(LoggingNavigator))
    }
}

pub async fn run(args: DemoArgs) -> Result<(), AnyError> {
    let settings = Settings::load()?;

    let (source, emitter) = ChannelLinkSource::channel(args.initial_link.clone());
    let auth = Arc::new(WatchAuthState::new(args.authenticated));

    let strategies: Vec<Arc<dyn LinkStrategy>> = vec![
        Arc::new(PathPrefixStrategy::new("profiles", "/profile").with_priority(10)),
        Arc::new(PathPrefixStrategy::new("settings", "/settings").with_auth_required(true)),
        Arc::new(PathPrefixStrategy::new("catch-all", "/")),
    ];

    let config = DispatchConfig::builder()
        .strategies(strategies)
        .source(Arc::new(source))
        .navigation(Arc::new(AlwaysLive))
        .auth(auth.clone() as Arc<dyn AuthObserver>)
        .link_ttl(settings.engine.link_ttl())
        .auto_ready(settings.engine.auto_ready)
        .build();

    let engine = Arc::new(DispatchEngine::new(config));
    engine.initialize().await;

    engine.set_app_ready().await;

    for link in &args.links {
        emitter.emit(link.clone());
    }
    // let the stream consumer drain before inspecting state
    tokio::time::sleep(Duration::from_millis(50)).await;

    if !args.authenticated && engine.has_pending_link() {
        info!("simulating login to release the auth-gated pending link");
        auth.set_authenticated(true);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let metrics = engine.metrics();
    info!(?metrics, "demo session finished");

    engine.dispose();
    Ok(())
}
