use event_store::EventStoreError;
use message_bus::BusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("event store error: {0}")]
    EventStore(#[from] EventStoreError),

    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    #[error("projection '{projection}' failed: {reason}")]
    Projection {
        projection: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
