//! In-memory event-bus client for tests/dev.

use std::convert::Infallible;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use relaybus_events::{AckEntry, EventBatch, EventBusClient, PutEventsAck};

/// Recording client.
///
/// - No IO
/// - Accepts every entry; acks carry minted UUIDv7 event ids
/// - Keeps every submitted batch for later inspection
#[derive(Debug, Default)]
pub struct InMemoryEventBusClient {
    recorded: Mutex<Vec<EventBatch>>,
}

impl InMemoryEventBusClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every batch submitted so far, in call order.
    pub fn recorded(&self) -> Vec<EventBatch> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl EventBusClient for InMemoryEventBusClient {
    type Error = Infallible;

    async fn put_events(&self, batch: EventBatch) -> Result<PutEventsAck, Self::Error> {
        let entries = batch
            .entries()
            .iter()
            .map(|_| AckEntry::accepted(Uuid::now_v7()))
            .collect();

        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(batch);

        Ok(PutEventsAck::new(0, entries))
    }
}
