//! Domain error types.

use event_store::EventStoreError;
use message_bus::BusError;
use thiserror::Error;

use crate::reservation::ReservationError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// A message could not be routed.
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    /// The aggregate has no apply arm for this event.
    #[error("{aggregate_type} cannot apply {event}")]
    UnhandledEventType {
        aggregate_type: &'static str,
        event: &'static str,
    },

    /// A reservation business rule was violated.
    #[error("Reservation error: {0}")]
    Reservation(#[from] ReservationError),
}

impl DomainError {
    /// Returns true if the write was rejected because the aggregate moved on.
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::EventStore(EventStoreError::ConcurrencyConflict { .. })
        )
    }
}
