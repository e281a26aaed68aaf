use thiserror::Error;

/// Boxed error returned by event subscribers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while registering or dispatching messages.
#[derive(Debug, Error)]
pub enum BusError {
    /// A command or query was sent with no matching registration.
    #[error("No handler registered for {0}")]
    NoHandlerRegistered(String),

    /// A second command or query handler was registered under the same name.
    #[error("A handler is already registered for {0}")]
    AlreadyRegistered(String),

    /// An event subscriber failed. Subscribers registered after it were skipped.
    #[error("Handler for {message} failed: {source}")]
    HandlerFailed {
        message: String,
        #[source]
        source: HandlerError,
    },

    /// The handler registered under a query name expects a different query type.
    #[error("Handler registered for {message} does not accept {expected}")]
    TypeMismatch {
        message: String,
        expected: &'static str,
    },
}

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;
