//! Shared types for the reservation event-sourcing core.

mod types;

pub use types::{AggregateId, ExpectedVersion, Version};
