use domain::DomainError;
use event_store::EventStoreError;
use message_bus::BusError;
use projections::ProjectionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("event store error: {0}")]
    EventStore(#[from] EventStoreError),

    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to initialise tracing: {0}")]
    Tracing(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
