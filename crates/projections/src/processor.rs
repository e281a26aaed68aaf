//! Projection processor for replaying stored events into projections.

use std::marker::PhantomData;
use std::sync::Arc;

use event_store::EventStore;
use message_bus::Event;

use crate::Result;
use crate::projection::Projection;

/// Replays the event store into projections.
///
/// Live events reach projections through the event bus; the processor only
/// brings them up to date with what was persisted before the bus was wired,
/// such as after a restart on the file backend. Aggregates are replayed one
/// at a time in ID order, each stream oldest first.
pub struct ProjectionProcessor<E, S> {
    store: S,
    projections: Vec<Arc<dyn Projection<E>>>,
    _events: PhantomData<fn() -> E>,
}

impl<E, S> ProjectionProcessor<E, S>
where
    E: Event,
    S: EventStore<E>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            projections: Vec::new(),
            _events: PhantomData,
        }
    }

    pub fn register(&mut self, projection: Arc<dyn Projection<E>>) {
        self.projections.push(projection);
    }

    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    /// Delivers every stored event to each projection that has not seen it yet.
    ///
    /// A projection's position counts the events it subscribes to, so events
    /// up to that position are skipped and running catch-up twice is harmless.
    /// Returns the number of events read from the store.
    #[tracing::instrument(skip(self))]
    pub async fn run_catch_up(&self) -> Result<u64> {
        let mut seen = vec![0u64; self.projections.len()];
        let mut events_read: u64 = 0;

        for aggregate_id in self.store.aggregate_ids().await? {
            for event in self.store.get_events_for_aggregate(&aggregate_id).await? {
                events_read += 1;
                let name = event.name();

                for (projection, seen) in self.projections.iter().zip(seen.iter_mut()) {
                    if !projection.subscriptions().contains(&name) {
                        continue;
                    }
                    *seen += 1;
                    if projection.position().events_processed < *seen {
                        projection.handle(&event)?;
                        metrics::counter!(
                            "projections_events_processed",
                            "projection" => projection.name()
                        )
                        .increment(1);
                    }
                }
            }
        }

        tracing::info!(events_read, projections = self.projections.len(), "catch-up complete");

        Ok(events_read)
    }

    /// Resets all projections and replays all events from the store.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild_all(&self) -> Result<u64> {
        for projection in &self.projections {
            projection.reset();
        }
        self.run_catch_up().await
    }
}
