use message_bus::BusError;
use thiserror::Error;

use crate::{AggregateId, ExpectedVersion, Version};

/// Errors that can occur when interacting with the event store.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// A concurrency conflict occurred when appending events.
    /// The expected version did not match the last recorded version.
    #[error(
        "Concurrency conflict for aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        aggregate_id: AggregateId,
        expected: ExpectedVersion,
        actual: Version,
    },

    /// No events have been recorded for the aggregate.
    #[error("Aggregate not found: {0}")]
    AggregateNotFound(AggregateId),

    /// Stored data for the aggregate could not be read back as events.
    #[error("Aggregate {aggregate_id} corrupted at record {line}: {reason}")]
    Corrupted {
        aggregate_id: AggregateId,
        line: usize,
        reason: String,
    },

    /// The aggregate ID cannot be used as a storage key.
    #[error("Invalid aggregate id: {0:?}")]
    InvalidAggregateId(String),

    /// An event in the batch belongs to another aggregate.
    #[error("Event for aggregate {found} cannot be saved under {expected}")]
    MismatchedAggregate {
        expected: AggregateId,
        found: AggregateId,
    },

    /// An I/O error occurred in a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization error occurred while writing events.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Events were persisted but a subscriber failed while they were published.
    #[error("Events for {aggregate_id} persisted up to version {version} but publishing failed: {source}")]
    PublishFailed {
        aggregate_id: AggregateId,
        version: Version,
        #[source]
        source: BusError,
    },
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;
