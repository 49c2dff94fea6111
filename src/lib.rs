//! Deep-link dispatch for host applications: prioritized strategies, a
//! single-slot pending link with lazy expiration, auth gating, and
//! at-most-one dispatch at a time.

pub mod auth;
pub mod config;
pub mod engine;
pub mod navigation;
pub mod observability;
pub mod sources;
pub mod strategies;
