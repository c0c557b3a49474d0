//! Event-bus transport abstraction (mechanics only).
//!
//! The publisher needs exactly one thing from a transport: "submit this
//! batch, hand back an awaitable acknowledgement". Everything a real client
//! does beyond that (connections, auth, retries, size limits) stays behind
//! this trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::ack::PutEventsAck;
use crate::entry::EventBatch;

/// A client for the external "put events" operation.
///
/// Contract:
/// - One call submits the whole batch; implementations must not reorder,
///   drop, or split entries.
/// - Failures surface through `Error`; callers decide what to do with them.
/// - `Send + Sync` so a single client can be shared across tasks.
#[async_trait]
pub trait EventBusClient: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    async fn put_events(&self, batch: EventBatch) -> Result<PutEventsAck, Self::Error>;
}

#[async_trait]
impl<C> EventBusClient for Arc<C>
where
    C: EventBusClient + ?Sized,
{
    type Error = C::Error;

    async fn put_events(&self, batch: EventBatch) -> Result<PutEventsAck, Self::Error> {
        (**self).put_events(batch).await
    }
}
