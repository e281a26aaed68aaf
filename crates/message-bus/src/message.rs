//! Message contracts shared by every bus.

use common::{AggregateId, ExpectedVersion};

/// Anything that can be routed by name.
pub trait Message {
    /// Returns the discriminant used for routing.
    fn name(&self) -> &'static str;
}

/// An immutable fact that happened to one aggregate.
///
/// Events are named in past tense. Implementations are usually a closed enum
/// with one variant per fact.
pub trait Event: Message + Clone + Send + Sync + 'static {
    /// Returns the aggregate this event belongs to.
    fn aggregate_id(&self) -> &AggregateId;
}

/// A request to change the state of one aggregate.
pub trait Command: Message + Send + Sync + 'static {
    /// Every discriminant in this closed set of commands.
    ///
    /// Used to check at startup that each one has a handler.
    const NAMES: &'static [&'static str];

    /// Returns the ID of the aggregate this command targets.
    fn aggregate_id(&self) -> &AggregateId;

    /// Returns the version the sender believes the aggregate currently has.
    fn expected_aggregate_version(&self) -> ExpectedVersion;
}

/// A read request answered by a single handler.
pub trait Query: Message + Send + Sync + 'static {
    /// Discriminant this query is registered under.
    const NAME: &'static str;

    /// The value the handler returns.
    type Output: Send + 'static;
}
