//! Event-bus client implementations.
//!
//! The client abstraction lives in `relaybus-events` as pure mechanics. This
//! module provides concrete implementations; a real cloud transport would
//! slot in alongside the in-memory one.

pub mod in_memory;

pub use in_memory::InMemoryEventBusClient;
