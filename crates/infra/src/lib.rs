//! Infrastructure layer: publish pipeline + transport implementations.
//!
//! The data shapes and the `EventBusClient` abstraction live in
//! `relaybus-events` as pure mechanics. This crate composes them with the
//! correlation-id store from `relaybus-core`.

pub mod event_bus;
pub mod publisher;


pub use event_bus::InMemoryEventBusClient;
pub use publisher::{CorrelatedPublisher, MalformedPayload, PublishError, decorate_batch};
