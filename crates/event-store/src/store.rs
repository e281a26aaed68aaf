use std::sync::Arc;

use async_trait::async_trait;
use message_bus::{Event, EventBus};

use crate::{AggregateId, EventDescriptor, EventStoreError, ExpectedVersion, Result, Version};

/// Core trait for event store implementations.
///
/// An event store keeps one append-only journal per aggregate and publishes
/// every newly persisted event on an [`EventBus`].
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait EventStore<E: Event>: Send + Sync {
    /// Retrieves all events for a specific aggregate, oldest first.
    ///
    /// Fails with `AggregateNotFound` if nothing has been recorded for the
    /// aggregate and with `Corrupted` if stored data cannot be read back.
    async fn get_events_for_aggregate(&self, aggregate_id: &AggregateId) -> Result<Vec<E>>;

    /// Appends events to an aggregate's journal.
    ///
    /// The write happens only if the last recorded version matches
    /// `expected`; otherwise it fails with `ConcurrencyConflict` and nothing
    /// is written. New events are numbered after `expected`, persisted, and
    /// then published in order.
    ///
    /// Returns the aggregate's version after the append.
    async fn save_events(
        &self,
        aggregate_id: &AggregateId,
        events: Vec<E>,
        expected: ExpectedVersion,
    ) -> Result<Version>;

    /// Gets the last recorded version of an aggregate.
    ///
    /// Returns None if the aggregate has no events.
    async fn get_aggregate_version(&self, aggregate_id: &AggregateId) -> Result<Option<Version>>;

    /// Lists every aggregate with at least one recorded event.
    async fn aggregate_ids(&self) -> Result<Vec<AggregateId>>;
}

#[async_trait]
impl<E, S> EventStore<E> for Arc<S>
where
    E: Event,
    S: EventStore<E> + ?Sized,
{
    async fn get_events_for_aggregate(&self, aggregate_id: &AggregateId) -> Result<Vec<E>> {
        (**self).get_events_for_aggregate(aggregate_id).await
    }

    async fn save_events(
        &self,
        aggregate_id: &AggregateId,
        events: Vec<E>,
        expected: ExpectedVersion,
    ) -> Result<Version> {
        (**self).save_events(aggregate_id, events, expected).await
    }

    async fn get_aggregate_version(&self, aggregate_id: &AggregateId) -> Result<Option<Version>> {
        (**self).get_aggregate_version(aggregate_id).await
    }

    async fn aggregate_ids(&self) -> Result<Vec<AggregateId>> {
        (**self).aggregate_ids().await
    }
}

/// Validates a batch before it is appended.
///
/// Every event must belong to the aggregate it is saved under.
pub fn validate_events_for_append<E: Event>(
    aggregate_id: &AggregateId,
    events: &[E],
) -> Result<()> {
    match events.iter().find(|e| e.aggregate_id() != aggregate_id) {
        Some(stray) => Err(EventStoreError::MismatchedAggregate {
            expected: aggregate_id.clone(),
            found: stray.aggregate_id().clone(),
        }),
        None => Ok(()),
    }
}

/// Rejects the write unless `expected` matches the last recorded version.
pub(crate) fn check_expected_version(
    aggregate_id: &AggregateId,
    current: Option<Version>,
    expected: ExpectedVersion,
) -> Result<()> {
    if expected.matches(current) {
        return Ok(());
    }

    let actual = current.unwrap_or_default();
    tracing::warn!(%aggregate_id, %expected, %actual, "concurrency conflict");
    metrics::counter!("event_store_concurrency_conflicts").increment(1);
    Err(EventStoreError::ConcurrencyConflict {
        aggregate_id: aggregate_id.clone(),
        expected,
        actual,
    })
}

/// Publishes freshly persisted events in order.
pub(crate) fn publish_persisted<E: Event>(
    bus: &EventBus<E>,
    aggregate_id: &AggregateId,
    descriptors: &[EventDescriptor<E>],
    version: Version,
) -> Result<()> {
    for descriptor in descriptors {
        bus.publish(&descriptor.event)
            .map_err(|source| EventStoreError::PublishFailed {
                aggregate_id: aggregate_id.clone(),
                version,
                source,
            })?;
    }
    Ok(())
}
