//! Correlation-aware publish pipeline (application-level orchestration).
//!
//! `CorrelatedPublisher` is the contract callers use instead of a raw
//! `EventBusClient`: it stamps every outgoing entry's detail payload with the
//! current correlation context under the reserved `__context__` field, then
//! forwards the batch in a single call.
//!
//! ## Publish Flow
//!
//! ```text
//! Batch
//!   ↓
//! 1. Snapshot correlation context (store, or caller-supplied)
//!   ↓
//! 2. Decorate every entry (parse detail → insert __context__ → reserialize)
//!   ↓
//! 3. One put_events call; ack/failure returned unmodified
//! ```
//!
//! Decoration is all-or-nothing: the first malformed payload aborts the call
//! before anything is sent, so a partial batch never reaches the bus.

use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

use relaybus_core::{CONTEXT_KEY, CorrelationIdStore, CorrelationIds};
use relaybus_events::{EventBatch, EventBusClient, EventEntry, PutEventsAck};

/// An entry's detail payload could not be reshaped to carry the context.
///
/// Raised before any external call is issued; `index` is the entry's position
/// in the submitted batch.
#[derive(Debug, Error)]
#[error("entry {index}: detail payload is not a JSON object: {source}")]
pub struct MalformedPayload {
    index: usize,
    #[source]
    source: serde_json::Error,
}

impl MalformedPayload {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Failure of one publish call.
#[derive(Debug, Error)]
pub enum PublishError<E>
where
    E: core::fmt::Debug,
{
    /// Decoration failed; the external operation was never invoked.
    #[error(transparent)]
    MalformedPayload(#[from] MalformedPayload),

    /// The external put-events call failed. Carried verbatim: no retry, no
    /// swallowing, whatever the transport attached is preserved.
    #[error("event bus put_events failed: {0:?}")]
    Bus(E),
}

/// Decorator around an [`EventBusClient`] that injects the correlation
/// context into every outgoing entry.
///
/// ## Context Sources
///
/// - [`put_events`](Self::put_events) snapshots the store's ambient context
///   once per call. Concurrent replacement of the ambient context cannot
///   corrupt a call already in flight.
/// - [`put_events_with_correlation_ids`](Self::put_events_with_correlation_ids)
///   uses a caller-supplied context and bypasses the store entirely.
///
/// ## Guarantees
///
/// - Exactly one transport invocation per call, same entries, same order.
/// - Every forwarded entry's detail carries `__context__` — an empty object
///   when no context is established, never absent, never null.
/// - The acknowledgement (or failure) comes back unmodified.
///
/// The store is injectable so tests and embedders can use private instances;
/// [`new`](Self::new) wires the process-wide default.
#[derive(Debug)]
pub struct CorrelatedPublisher<C> {
    client: C,
    store: Arc<CorrelationIdStore>,
}

impl<C> CorrelatedPublisher<C> {
    /// Publisher backed by the process-wide correlation-id store.
    pub fn new(client: C) -> Self {
        Self::with_store(client, CorrelationIdStore::global())
    }

    pub fn with_store(client: C, store: Arc<CorrelationIdStore>) -> Self {
        Self { client, store }
    }

    pub fn into_client(self) -> C {
        self.client
    }
}

impl<C> CorrelatedPublisher<C>
where
    C: EventBusClient,
{
    /// Publish a batch stamped with the ambient correlation context.
    pub async fn put_events(
        &self,
        batch: EventBatch,
    ) -> Result<PutEventsAck, PublishError<C::Error>> {
        // Snapshot once; not re-read mid-operation.
        let ids = self.store.current();
        self.put_events_with_correlation_ids(&ids, batch).await
    }

    /// Publish a batch stamped with an explicit correlation context.
    ///
    /// Identical to [`put_events`](Self::put_events) except the ambient store
    /// is never consulted.
    pub async fn put_events_with_correlation_ids(
        &self,
        ids: &CorrelationIds,
        batch: EventBatch,
    ) -> Result<PutEventsAck, PublishError<C::Error>> {
        // 1) Decorate up front; nothing is sent if any payload is bad.
        let decorated = decorate_batch(ids, batch)?;

        // 2) One external call. Entry count only, payloads are never logged.
        tracing::debug!(entries = decorated.len(), "putting events");
        self.client
            .put_events(decorated)
            .await
            .map_err(PublishError::Bus)
    }
}

/// Decorate every entry of `batch` with a snapshot of `ids`.
///
/// Applied independently per entry, order preserved:
/// 1. Parse the detail payload as a JSON object.
/// 2. Insert `__context__` = the context as a nested object (empty object for
///    an empty context). A pre-existing field of that name is overwritten.
/// 3. Reserialize; all other entry fields pass through unchanged.
pub fn decorate_batch(
    ids: &CorrelationIds,
    batch: EventBatch,
) -> Result<EventBatch, MalformedPayload> {
    let context = context_value(ids);
    batch
        .into_entries()
        .into_iter()
        .enumerate()
        .map(|(index, entry)| decorate_entry(&context, entry, index))
        .collect()
}

fn context_value(ids: &CorrelationIds) -> JsonValue {
    JsonValue::Object(
        ids.iter()
            .map(|(k, v)| (k.to_string(), JsonValue::String(v.to_string())))
            .collect(),
    )
}

fn decorate_entry(
    context: &JsonValue,
    entry: EventEntry,
    index: usize,
) -> Result<EventEntry, MalformedPayload> {
    let mut detail: JsonMap<String, JsonValue> = serde_json::from_str(entry.detail())
        .map_err(|source| MalformedPayload { index, source })?;

    // Last-writer-wins: a pre-existing __context__ is replaced, not merged.
    detail.insert(CONTEXT_KEY.to_string(), context.clone());

    let detail = serde_json::to_string(&JsonValue::Object(detail))
        .map_err(|source| MalformedPayload { index, source })?;

    Ok(entry.with_detail(detail))
}
