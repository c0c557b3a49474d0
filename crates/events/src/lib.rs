//! `relaybus-events` — event-bus data shapes and the transport trait.

pub mod ack;
pub mod client;
pub mod entry;

pub use ack::{AckEntry, PutEventsAck};
pub use client::EventBusClient;
pub use entry::{EventBatch, EventEntry};
