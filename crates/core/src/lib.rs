//! `relaybus-core` — correlation-context foundation.
//!
//! This crate contains **pure domain** primitives (no transport concerns).

pub mod context;

pub use context::{CONTEXT_KEY, CorrelationIdStore, CorrelationIds};
