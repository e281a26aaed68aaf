//! Routing of queries to their single typed handler.

use std::any::Any;
use std::collections::HashMap;

use crate::{BusError, Query, Result};

type QueryHandlerFn<Q> = Box<dyn Fn(&Q) -> <Q as Query>::Output + Send + Sync>;

/// Routes each query to the handler registered under its name.
///
/// Handlers are stored type-erased and recovered on dispatch, so one bus can
/// serve queries with different result types.
pub struct QueryBus {
    handlers: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl QueryBus {
    /// Creates a bus with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers the handler for queries of type `Q`.
    ///
    /// Fails with [`BusError::AlreadyRegistered`] if `Q::NAME` is taken.
    pub fn register_handler<Q, F>(&mut self, handler: F) -> Result<()>
    where
        Q: Query,
        F: Fn(&Q) -> Q::Output + Send + Sync + 'static,
    {
        if self.handlers.contains_key(Q::NAME) {
            return Err(BusError::AlreadyRegistered(Q::NAME.to_string()));
        }
        let handler: QueryHandlerFn<Q> = Box::new(handler);
        self.handlers.insert(Q::NAME, Box::new(handler));
        Ok(())
    }

    /// Returns true if a handler is registered under `query_name`.
    pub fn is_registered(&self, query_name: &str) -> bool {
        self.handlers.contains_key(query_name)
    }

    /// Dispatches a query and returns the handler's answer.
    pub fn send<Q: Query>(&self, query: &Q) -> Result<Q::Output> {
        let name = query.name();
        let Some(entry) = self.handlers.get(name) else {
            tracing::warn!(query = name, "no handler registered");
            return Err(BusError::NoHandlerRegistered(name.to_string()));
        };

        let handler = entry
            .downcast_ref::<QueryHandlerFn<Q>>()
            .ok_or_else(|| BusError::TypeMismatch {
                message: name.to_string(),
                expected: std::any::type_name::<Q>(),
            })?;

        tracing::debug!(query = name, "dispatching query");
        Ok(handler(query))
    }
}

impl Default for QueryBus {
    fn default() -> Self {
        Self::new()
    }
}
