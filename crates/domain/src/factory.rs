//! Construction of aggregates, fresh or from history.

use crate::aggregate::Aggregate;
use crate::error::DomainError;

/// Builds aggregates of one kind.
pub trait AggregateFactory: Send + Sync {
    /// The aggregate this factory builds.
    type Aggregate: Aggregate;

    /// Everything the aggregate's creation operation needs.
    type Args;

    /// Builds a new aggregate and runs its creation operation.
    ///
    /// Business rules may reject the arguments before any event exists.
    fn create(&self, args: Self::Args) -> Result<Self::Aggregate, DomainError>;

    /// Rebuilds an aggregate by replaying its stored events.
    fn load_from_history(
        &self,
        history: Vec<<Self::Aggregate as Aggregate>::Event>,
    ) -> Result<Self::Aggregate, DomainError> {
        let mut aggregate = Self::Aggregate::default();
        aggregate.load_from_history(history)?;
        Ok(aggregate)
    }
}
