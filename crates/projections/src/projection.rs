use std::fmt;
use std::sync::Arc;

use message_bus::{Event, EventBus, HandlerError};

use crate::error::Result;

/// Number of events a projection has applied since its last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ProjectionPosition {
    pub events_processed: u64,
}

impl ProjectionPosition {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn advance(self) -> Self {
        Self {
            events_processed: self.events_processed + 1,
        }
    }
}

impl fmt::Display for ProjectionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position({})", self.events_processed)
    }
}

/// A view kept up to date from published events.
///
/// Projections are fed synchronously from the [`EventBus`], so `handle` runs
/// while the event store still holds its write lock and must not block on
/// I/O. Only events named in [`subscriptions`](Projection::subscriptions) are
/// delivered.
pub trait Projection<E: Event>: Send + Sync {
    /// Returns the projection name, used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Returns the event names this projection consumes.
    fn subscriptions(&self) -> &'static [&'static str];

    /// Applies one event and advances the position.
    fn handle(&self, event: &E) -> Result<()>;

    fn position(&self) -> ProjectionPosition;

    /// Drops all state so the projection can be rebuilt from scratch.
    fn reset(&self);
}

/// Subscribes a projection to every event it consumes.
pub fn subscribe<E, P>(projection: &Arc<P>, bus: &mut EventBus<E>)
where
    E: Event,
    P: Projection<E> + 'static,
{
    for &event_name in projection.subscriptions() {
        let projection = Arc::clone(projection);
        bus.register_handler(event_name, move |event: &E| {
            projection
                .handle(event)
                .map_err(|e| Box::new(e) as HandlerError)?;
            metrics::counter!("projections_events_processed", "projection" => projection.name())
                .increment(1);
            Ok(())
        });
    }
    tracing::debug!(
        projection = projection.name(),
        events = projection.subscriptions().len(),
        "projection subscribed"
    );
}
