//! Append-only event persistence.
//!
//! An [`EventStore`] keeps one journal per aggregate, enforces optimistic
//! concurrency through [`ExpectedVersion`], and publishes every persisted
//! event on a [`message_bus::EventBus`].

pub mod error;
pub mod event;
pub mod file;
pub mod memory;
pub mod store;

#[cfg(test)]
mod testing;

pub use common::{AggregateId, ExpectedVersion, Version};
pub use error::{EventStoreError, Result};
pub use event::EventDescriptor;
pub use file::FileEventStore;
pub use memory::InMemoryEventStore;
pub use store::{EventStore, validate_events_for_append};
