//! Strategy system for linkbox
//!
//! Strategies are the pluggable handlers that claim and process classes of
//! deep links. The engine consults them through a [`StrategyRegistry`] in
//! descending priority order; the first strategy whose `can_handle` returns
//! true owns the link.
//!
//! ## Key components
//!
//! - [`LinkStrategy`] - trait implemented by host strategies
//! - [`StrategyRegistry`] - priority-ordered registry, first match wins
//! - [`PathPrefixStrategy`] - built-in path-prefix convenience strategy

mod prefix;
mod registry;
mod traits;

pub use prefix::PathPrefixStrategy;
pub use registry::StrategyRegistry;
pub use traits::{LinkStrategy, StrategyError};
