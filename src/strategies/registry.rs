use std::cmp::Reverse;
use std::sync::Arc;

use super::traits::LinkStrategy;

/// Priority-ordered set of link strategies
///
/// The registry keeps strategies sorted by descending priority after every
/// registration. The one ordering guarantee: a higher-priority strategy is
/// always consulted before a lower-priority one; equal priorities keep their
/// registration order (the sort is stable). There is no unregister operation;
/// strategies live for the lifetime of the engine.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn LinkStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, strategy: Arc<dyn LinkStrategy>) {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|s| Reverse(s.priority()));
    }

    /// First strategy (in priority order) that claims the URI
    ///
    /// First match wins: no further strategy is consulted, regardless of how
    /// many others could also handle the link.
    pub fn match_strategy(&self, uri: &str) -> Option<Arc<dyn LinkStrategy>> {
        self.strategies.iter().find(|s| s.can_handle(uri)).cloned()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategies in consultation order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn LinkStrategy>> {
        self.strategies.iter()
    }
}
