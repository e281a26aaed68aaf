//! Core aggregate trait and the bookkeeping shared by every aggregate.

use common::{AggregateId, Version};
use message_bus::Event;

use crate::error::DomainError;

/// Identity, version and pending changes of an event-sourced aggregate.
///
/// `version` always equals the number of events applied so far, historical
/// and uncommitted alike.
#[derive(Debug, Clone)]
pub struct AggregateRoot<E> {
    id: Option<AggregateId>,
    version: Version,
    changes: Vec<E>,
}

impl<E: Event> AggregateRoot<E> {
    /// Creates the root of a fresh aggregate at version 0.
    pub fn new() -> Self {
        Self {
            id: None,
            version: Version::initial(),
            changes: Vec::new(),
        }
    }

    /// Returns the aggregate ID, or None before the first event.
    pub fn id(&self) -> Option<&AggregateId> {
        self.id.as_ref()
    }

    /// Returns the number of events applied.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns events applied since the last commit.
    pub fn changes(&self) -> &[E] {
        &self.changes
    }

    fn advance(&mut self, event: &E) {
        if self.id.is_none() {
            self.id = Some(event.aggregate_id().clone());
        }
        self.version = self.version.next();
    }

    fn record(&mut self, event: E) {
        self.advance(&event);
        self.changes.push(event);
    }

    fn commit(&mut self) {
        self.changes.clear();
    }
}

impl<E: Event> Default for AggregateRoot<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for aggregates in an event-sourced system.
///
/// An aggregate is rebuilt by replaying its events and changed only by
/// domain operations that each record exactly one new event.
///
/// Implementations provide `apply` as an exhaustive `match` over their event
/// enum; the provided methods handle versioning and pending changes.
pub trait Aggregate: Default + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: Event;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the embedded bookkeeping.
    fn root(&self) -> &AggregateRoot<Self::Event>;

    /// Returns the embedded bookkeeping mutably.
    fn root_mut(&mut self) -> &mut AggregateRoot<Self::Event>;

    /// Applies an event to the aggregate, updating its state.
    ///
    /// Must be deterministic and free of side effects. Returns
    /// [`DomainError::UnhandledEventType`] for events the aggregate does not
    /// own, leaving state untouched.
    fn apply(&mut self, event: &Self::Event) -> Result<(), DomainError>;

    /// Returns the aggregate's unique identifier.
    ///
    /// Returns None for a new, uninitialized aggregate.
    fn id(&self) -> Option<&AggregateId> {
        self.root().id()
    }

    /// Returns the current version of the aggregate.
    fn version(&self) -> Version {
        self.root().version()
    }

    /// Returns the events recorded since the last save.
    fn uncommitted_changes(&self) -> &[Self::Event] {
        self.root().changes()
    }

    /// Applies a new event and records it as uncommitted.
    fn apply_change(&mut self, event: Self::Event) -> Result<(), DomainError> {
        self.apply(&event)?;
        self.root_mut().record(event);
        Ok(())
    }

    /// Replays stored events without recording them.
    ///
    /// Stops at the first event that cannot be applied. Events before it
    /// stay applied.
    fn load_from_history(
        &mut self,
        history: impl IntoIterator<Item = Self::Event>,
    ) -> Result<(), DomainError> {
        for event in history {
            self.apply(&event)?;
            self.root_mut().advance(&event);
        }
        Ok(())
    }

    /// Forgets pending changes once they are durable. The version is kept.
    fn mark_changes_as_committed(&mut self) {
        self.root_mut().commit();
    }
}
