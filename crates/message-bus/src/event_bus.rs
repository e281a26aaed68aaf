//! Fan-out of events to subscribers registered by event name.

use std::collections::HashMap;

use crate::{BusError, Event, HandlerError, Result};

type EventHandlerFn<E> = Box<dyn Fn(&E) -> std::result::Result<(), HandlerError> + Send + Sync>;

/// Routes each published event to every handler registered for its name.
///
/// Delivery is at-least-zero: an event nobody subscribed to is dropped, which
/// is not an error. Handlers run synchronously in registration order. The
/// first failing handler stops the dispatch; handlers registered before it
/// have already run and handlers registered after it are skipped.
pub struct EventBus<E: Event> {
    handlers: HashMap<&'static str, Vec<EventHandlerFn<E>>>,
}

impl<E: Event> EventBus<E> {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Subscribes a handler to every event named `event_name`.
    pub fn register_handler<F>(&mut self, event_name: &'static str, handler: F)
    where
        F: Fn(&E) -> std::result::Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handlers
            .entry(event_name)
            .or_default()
            .push(Box::new(handler));
    }

    /// Returns how many handlers are subscribed to `event_name`.
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers.get(event_name).map_or(0, Vec::len)
    }

    /// Delivers an event to its subscribers.
    pub fn publish(&self, event: &E) -> Result<()> {
        let name = event.name();
        let Some(handlers) = self.handlers.get(name) else {
            tracing::trace!(event = name, "no subscribers");
            return Ok(());
        };

        tracing::debug!(
            event = name,
            aggregate_id = %event.aggregate_id(),
            subscribers = handlers.len(),
            "publishing event"
        );

        for handler in handlers {
            handler(event).map_err(|source| BusError::HandlerFailed {
                message: name.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}
