//! Dispatch engine
//!
//! The pending-link state machine: a received link is matched, then either
//! dispatched immediately, deferred into the single pending slot until the
//! app is ready and (if required) the user is authenticated, or dropped.
//! Deferred links expire lazily after a configurable window and are forgotten
//! on logout.

mod dispatcher;
mod pending;

pub use dispatcher::DispatchEngine;
pub use pending::{PendingLink, PendingSlot};
