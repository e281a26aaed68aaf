//! Loading and saving typed aggregates through an event store.

use common::{AggregateId, ExpectedVersion, Version};
use event_store::{EventStore, EventStoreError};

use crate::aggregate::Aggregate;
use crate::error::DomainError;
use crate::factory::AggregateFactory;

type EventOf<F> = <<F as AggregateFactory>::Aggregate as Aggregate>::Event;

/// Pairs an aggregate factory with the event store holding its events.
pub struct Repository<F, S> {
    factory: F,
    store: S,
}

impl<F, S> Repository<F, S>
where
    F: AggregateFactory,
    S: EventStore<EventOf<F>>,
{
    /// Creates a repository over `store`.
    pub fn new(factory: F, store: S) -> Self {
        Self { factory, store }
    }

    /// Returns the factory used to build aggregates.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Returns a reference to the underlying event store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists the aggregate's uncommitted changes.
    ///
    /// Changes are marked committed once the store has made them durable,
    /// which includes a `PublishFailed` outcome. A concurrency conflict
    /// leaves them pending.
    pub async fn save(
        &self,
        aggregate: &mut F::Aggregate,
        expected: ExpectedVersion,
    ) -> Result<Version, DomainError> {
        let Some(id) = aggregate.id().cloned() else {
            return Ok(aggregate.version());
        };
        let changes = aggregate.uncommitted_changes().to_vec();

        tracing::debug!(
            aggregate_type = F::Aggregate::aggregate_type(),
            aggregate_id = %id,
            %expected,
            changes = changes.len(),
            "saving aggregate"
        );

        match self.store.save_events(&id, changes, expected).await {
            Ok(version) => {
                aggregate.mark_changes_as_committed();
                Ok(version)
            }
            Err(e @ EventStoreError::PublishFailed { .. }) => {
                aggregate.mark_changes_as_committed();
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Loads an aggregate by replaying its history.
    #[tracing::instrument(skip(self), fields(aggregate_type = F::Aggregate::aggregate_type()))]
    pub async fn get_by_id(&self, id: &AggregateId) -> Result<F::Aggregate, DomainError> {
        let history = self.store.get_events_for_aggregate(id).await?;
        tracing::debug!(events = history.len(), "replaying history");
        self.factory.load_from_history(history)
    }
}
