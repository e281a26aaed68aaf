use serde::{Deserialize, Serialize};

use crate::{AggregateId, ExpectedVersion, Version};

/// The persisted unit of the event store.
///
/// `version` is the aggregate's version after `event` has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor<E> {
    /// The aggregate this event belongs to.
    pub aggregate_id: AggregateId,

    /// The event itself.
    pub event: E,

    /// The version of the aggregate after this event.
    pub version: Version,
}

impl<E> EventDescriptor<E> {
    /// Creates a new descriptor.
    pub fn new(aggregate_id: AggregateId, event: E, version: Version) -> Self {
        Self {
            aggregate_id,
            event,
            version,
        }
    }

    /// Wraps a batch of new events, numbering them after `expected`.
    pub fn sequence(
        aggregate_id: &AggregateId,
        events: Vec<E>,
        expected: ExpectedVersion,
    ) -> Vec<Self> {
        let mut version = expected.base();
        events
            .into_iter()
            .map(|event| {
                version = version.next();
                Self::new(aggregate_id.clone(), event, version)
            })
            .collect()
    }
}
