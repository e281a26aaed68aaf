use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use message_bus::{Event, EventBus};
use tokio::sync::RwLock;

use crate::{
    AggregateId, EventDescriptor, EventStoreError, ExpectedVersion, Result, Version,
    store::{EventStore, check_expected_version, publish_persisted, validate_events_for_append},
};

/// In-memory event store implementation.
///
/// Events are grouped by aggregate ID. The version check, the append and the
/// publication of a batch all happen under one write lock, so concurrent
/// writers to the same aggregate are serialized.
pub struct InMemoryEventStore<E: Event> {
    streams: Arc<RwLock<HashMap<AggregateId, Vec<EventDescriptor<E>>>>>,
    bus: Arc<EventBus<E>>,
}

impl<E: Event> InMemoryEventStore<E> {
    /// Creates a new empty store publishing on `bus`.
    pub fn new(bus: Arc<EventBus<E>>) -> Self {
        Self {
            streams: Arc::new(RwLock::new(HashMap::new())),
            bus,
        }
    }

    /// Returns the total number of events stored.
    pub async fn event_count(&self) -> usize {
        self.streams.read().await.values().map(Vec::len).sum()
    }

    /// Returns the stored descriptors of one aggregate.
    pub async fn descriptors(&self, aggregate_id: &AggregateId) -> Vec<EventDescriptor<E>> {
        self.streams
            .read()
            .await
            .get(aggregate_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl<E: Event> Clone for InMemoryEventStore<E> {
    fn clone(&self) -> Self {
        Self {
            streams: Arc::clone(&self.streams),
            bus: Arc::clone(&self.bus),
        }
    }
}

#[async_trait]
impl<E: Event> EventStore<E> for InMemoryEventStore<E> {
    async fn get_events_for_aggregate(&self, aggregate_id: &AggregateId) -> Result<Vec<E>> {
        let streams = self.streams.read().await;
        match streams.get(aggregate_id) {
            Some(stream) if !stream.is_empty() => {
                Ok(stream.iter().map(|d| d.event.clone()).collect())
            }
            _ => Err(EventStoreError::AggregateNotFound(aggregate_id.clone())),
        }
    }

    #[tracing::instrument(skip(self, events), fields(count = events.len()))]
    async fn save_events(
        &self,
        aggregate_id: &AggregateId,
        events: Vec<E>,
        expected: ExpectedVersion,
    ) -> Result<Version> {
        validate_events_for_append(aggregate_id, &events)?;

        let mut streams = self.streams.write().await;

        let current = streams
            .get(aggregate_id)
            .and_then(|stream| stream.last())
            .map(|d| d.version);
        check_expected_version(aggregate_id, current, expected)?;

        if events.is_empty() {
            return Ok(current.unwrap_or_default());
        }

        let descriptors = EventDescriptor::sequence(aggregate_id, events, expected);
        let last_version = descriptors
            .last()
            .map(|d| d.version)
            .unwrap_or_else(|| expected.base());

        streams
            .entry(aggregate_id.clone())
            .or_default()
            .extend(descriptors.iter().cloned());
        metrics::counter!("event_store_events_appended").increment(descriptors.len() as u64);
        tracing::debug!(version = %last_version, "events appended");

        publish_persisted(&self.bus, aggregate_id, &descriptors, last_version)?;

        Ok(last_version)
    }

    async fn get_aggregate_version(&self, aggregate_id: &AggregateId) -> Result<Option<Version>> {
        let streams = self.streams.read().await;
        Ok(streams
            .get(aggregate_id)
            .and_then(|stream| stream.last())
            .map(|d| d.version))
    }

    async fn aggregate_ids(&self) -> Result<Vec<AggregateId>> {
        let streams = self.streams.read().await;
        let mut ids: Vec<_> = streams
            .iter()
            .filter(|(_, stream)| !stream.is_empty())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestEvent, failing_bus, recording_bus};

    fn store() -> InMemoryEventStore<TestEvent> {
        InMemoryEventStore::new(Arc::new(EventBus::new()))
    }

    #[tokio::test]
    async fn save_and_load_events() {
        let store = store();
        let id = AggregateId::new("R1");
        let events = vec![TestEvent::created("R1"), TestEvent::renamed("R1", "suite")];

        let version = store
            .save_events(&id, events.clone(), ExpectedVersion::New)
            .await
            .unwrap();

        assert_eq!(version, Version::new(2));
        assert_eq!(store.get_events_for_aggregate(&id).await.unwrap(), events);
    }

    #[tokio::test]
    async fn missing_aggregate_is_not_found() {
        let store = store();

        let result = store
            .get_events_for_aggregate(&AggregateId::new("missing"))
            .await;

        assert!(matches!(result, Err(EventStoreError::AggregateNotFound(_))));
    }

    #[tokio::test]
    async fn descriptors_carry_increasing_versions() {
        let store = store();
        let id = AggregateId::new("R1");
        store
            .save_events(&id, vec![TestEvent::created("R1")], ExpectedVersion::New)
            .await
            .unwrap();
        store
            .save_events(
                &id,
                vec![TestEvent::renamed("R1", "a"), TestEvent::renamed("R1", "b")],
                ExpectedVersion::Exact(Version::first()),
            )
            .await
            .unwrap();

        let versions: Vec<_> = store
            .descriptors(&id)
            .await
            .iter()
            .map(|d| d.version.as_i64())
            .collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn stale_version_is_rejected_without_partial_write() {
        let store = store();
        let id = AggregateId::new("R1");
        store
            .save_events(&id, vec![TestEvent::created("R1")], ExpectedVersion::New)
            .await
            .unwrap();

        let first = store
            .save_events(
                &id,
                vec![TestEvent::renamed("R1", "first")],
                ExpectedVersion::Exact(Version::first()),
            )
            .await;
        let second = store
            .save_events(
                &id,
                vec![TestEvent::renamed("R1", "second"), TestEvent::renamed("R1", "third")],
                ExpectedVersion::Exact(Version::first()),
            )
            .await;

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(EventStoreError::ConcurrencyConflict { actual, .. }) if actual == Version::new(2)
        ));
        assert_eq!(
            store.get_events_for_aggregate(&id).await.unwrap(),
            vec![TestEvent::created("R1"), TestEvent::renamed("R1", "first")]
        );
    }

    #[tokio::test]
    async fn new_expectation_fails_for_existing_aggregate() {
        let store = store();
        let id = AggregateId::new("R1");
        store
            .save_events(&id, vec![TestEvent::created("R1")], ExpectedVersion::New)
            .await
            .unwrap();

        let result = store
            .save_events(&id, vec![TestEvent::created("R1")], ExpectedVersion::New)
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::ConcurrencyConflict { .. })
        ));
        assert_eq!(store.event_count().await, 1);
    }

    #[tokio::test]
    async fn exact_version_fails_for_unknown_aggregate() {
        let store = store();

        let result = store
            .save_events(
                &AggregateId::new("R1"),
                vec![TestEvent::created("R1")],
                ExpectedVersion::Exact(Version::new(3)),
            )
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::ConcurrencyConflict { .. })
        ));
    }

    #[tokio::test]
    async fn events_are_published_in_order_after_saving() {
        let (bus, published) = recording_bus();
        let store = InMemoryEventStore::new(bus);
        let id = AggregateId::new("R1");
        let events = vec![TestEvent::created("R1"), TestEvent::renamed("R1", "suite")];

        store
            .save_events(&id, events.clone(), ExpectedVersion::New)
            .await
            .unwrap();

        assert_eq!(*published.lock().unwrap(), events);
    }

    #[tokio::test]
    async fn rejected_write_publishes_nothing() {
        let (bus, published) = recording_bus();
        let store = InMemoryEventStore::new(bus);
        let id = AggregateId::new("R1");

        let _ = store
            .save_events(
                &id,
                vec![TestEvent::created("R1")],
                ExpectedVersion::Exact(Version::new(5)),
            )
            .await;

        assert!(published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn publish_failure_keeps_persisted_events() {
        let store = InMemoryEventStore::new(failing_bus());
        let id = AggregateId::new("R1");

        let result = store
            .save_events(&id, vec![TestEvent::created("R1")], ExpectedVersion::New)
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::PublishFailed { version, .. }) if version == Version::first()
        ));
        assert_eq!(
            store.get_aggregate_version(&id).await.unwrap(),
            Some(Version::first())
        );
    }

    #[tokio::test]
    async fn foreign_events_are_rejected() {
        let store = store();

        let result = store
            .save_events(
                &AggregateId::new("R1"),
                vec![TestEvent::created("R2")],
                ExpectedVersion::New,
            )
            .await;

        assert!(matches!(
            result,
            Err(EventStoreError::MismatchedAggregate { .. })
        ));
        assert_eq!(store.event_count().await, 0);
    }

    #[tokio::test]
    async fn empty_batch_checks_version_and_writes_nothing() {
        let store = store();
        let id = AggregateId::new("R1");

        let version = store
            .save_events(&id, Vec::new(), ExpectedVersion::New)
            .await
            .unwrap();

        assert_eq!(version, Version::initial());
        assert!(store.aggregate_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_aggregate_version() {
        let store = store();
        let id = AggregateId::new("R1");

        assert!(store.get_aggregate_version(&id).await.unwrap().is_none());

        store
            .save_events(
                &id,
                vec![TestEvent::created("R1"), TestEvent::renamed("R1", "x")],
                ExpectedVersion::New,
            )
            .await
            .unwrap();

        assert_eq!(
            store.get_aggregate_version(&id).await.unwrap(),
            Some(Version::new(2))
        );
    }

    #[tokio::test]
    async fn aggregate_ids_are_sorted() {
        let store = store();
        for id in ["R2", "R1"] {
            store
                .save_events(
                    &AggregateId::new(id),
                    vec![TestEvent::created(id)],
                    ExpectedVersion::New,
                )
                .await
                .unwrap();
        }

        let ids = store.aggregate_ids().await.unwrap();
        assert_eq!(ids, vec![AggregateId::new("R1"), AggregateId::new("R2")]);
    }

    #[tokio::test]
    async fn concurrent_writers_cannot_both_win() {
        let store = store();
        let id = AggregateId::new("R1");
        store
            .save_events(&id, vec![TestEvent::created("R1")], ExpectedVersion::New)
            .await
            .unwrap();

        let writers = (0..8).map(|n| {
            let store = store.clone();
            let id = id.clone();
            tokio::spawn(async move {
                store
                    .save_events(
                        &id,
                        vec![TestEvent::renamed("R1", &n.to_string())],
                        ExpectedVersion::Exact(Version::first()),
                    )
                    .await
            })
        });

        let mut successes = 0;
        for writer in writers.collect::<Vec<_>>() {
            if writer.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.event_count().await, 2);
    }
}
