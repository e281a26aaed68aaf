//! Routing of commands to their single handler.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{BusError, Command};

/// Handles one or more commands of a closed command set.
///
/// Completion of `handle` means the resulting events are durable.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    /// Error returned by the handler. Bus failures are folded into it.
    type Error: From<BusError> + Send;

    /// Executes the command.
    async fn handle(&self, command: C) -> Result<(), Self::Error>;
}

type SharedHandler<C, E> = Arc<dyn CommandHandler<C, Error = E>>;

/// Routes each command to the handler registered under its name.
///
/// Exactly one handler may be registered per command name; a second
/// registration is rejected with [`BusError::AlreadyRegistered`].
pub struct CommandBus<C: Command, E> {
    handlers: HashMap<&'static str, SharedHandler<C, E>>,
}

impl<C, E> CommandBus<C, E>
where
    C: Command,
    E: From<BusError> + Send + 'static,
{
    /// Creates a bus with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` for commands named `command_name`.
    pub fn register_handler(
        &mut self,
        command_name: &'static str,
        handler: SharedHandler<C, E>,
    ) -> Result<(), BusError> {
        if self.handlers.contains_key(command_name) {
            return Err(BusError::AlreadyRegistered(command_name.to_string()));
        }
        self.handlers.insert(command_name, handler);
        Ok(())
    }

    /// Registers the same handler for several command names.
    pub fn register_handlers(
        &mut self,
        command_names: &[&'static str],
        handler: SharedHandler<C, E>,
    ) -> Result<(), BusError> {
        for &name in command_names {
            self.register_handler(name, Arc::clone(&handler))?;
        }
        Ok(())
    }

    /// Checks that every command in `C::NAMES` has a handler.
    pub fn ensure_complete(&self) -> Result<(), BusError> {
        match C::NAMES
            .iter()
            .find(|name| !self.handlers.contains_key(*name))
        {
            Some(missing) => Err(BusError::NoHandlerRegistered(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Dispatches a command to its handler and waits for it to finish.
    pub async fn send(&self, command: C) -> Result<(), E> {
        let name = command.name();
        let Some(handler) = self.handlers.get(name).cloned() else {
            tracing::warn!(command = name, "no handler registered");
            return Err(BusError::NoHandlerRegistered(name.to_string()).into());
        };

        tracing::debug!(
            command = name,
            aggregate_id = %command.aggregate_id(),
            expected_version = %command.expected_aggregate_version(),
            "dispatching command"
        );
        metrics::counter!("command_bus_commands_dispatched").increment(1);

        handler.handle(command).await
    }
}

impl<C, E> Default for CommandBus<C, E>
where
    C: Command,
    E: From<BusError> + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use common::{AggregateId, ExpectedVersion};

    use super::*;
    use crate::Message;

    #[derive(Debug, Clone, PartialEq)]
    enum TestCommand {
        Open { id: AggregateId },
        Close { id: AggregateId, expected: i64 },
    }

    impl Message for TestCommand {
        fn name(&self) -> &'static str {
            match self {
                TestCommand::Open { .. } => "Open",
                TestCommand::Close { .. } => "Close",
            }
        }
    }

    impl Command for TestCommand {
        const NAMES: &'static [&'static str] = &["Open", "Close"];

        fn aggregate_id(&self) -> &AggregateId {
            match self {
                TestCommand::Open { id } | TestCommand::Close { id, .. } => id,
            }
        }

        fn expected_aggregate_version(&self) -> ExpectedVersion {
            match self {
                TestCommand::Open { .. } => ExpectedVersion::New,
                TestCommand::Close { expected, .. } => ExpectedVersion::from(*expected),
            }
        }
    }

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error(transparent)]
        Bus(#[from] BusError),
        #[error("rejected")]
        Rejected,
    }

    #[derive(Default)]
    struct RecordingHandler {
        received: Mutex<Vec<TestCommand>>,
    }

    #[async_trait]
    impl CommandHandler<TestCommand> for RecordingHandler {
        type Error = TestError;

        async fn handle(&self, command: TestCommand) -> Result<(), TestError> {
            self.received.lock().unwrap().push(command);
            Ok(())
        }
    }

    struct RejectingHandler;

    #[async_trait]
    impl CommandHandler<TestCommand> for RejectingHandler {
        type Error = TestError;

        async fn handle(&self, _command: TestCommand) -> Result<(), TestError> {
            Err(TestError::Rejected)
        }
    }

    fn open() -> TestCommand {
        TestCommand::Open {
            id: AggregateId::new("A1"),
        }
    }

    #[tokio::test]
    async fn send_routes_to_registered_handler() {
        let handler = Arc::new(RecordingHandler::default());
        let mut bus: CommandBus<TestCommand, TestError> = CommandBus::new();
        bus.register_handler("Open", handler.clone()).unwrap();

        bus.send(open()).await.unwrap();

        assert_eq!(*handler.received.lock().unwrap(), vec![open()]);
    }

    #[tokio::test]
    async fn send_without_handler_fails() {
        let bus: CommandBus<TestCommand, TestError> = CommandBus::new();

        let result = bus.send(open()).await;

        assert!(matches!(
            result,
            Err(TestError::Bus(BusError::NoHandlerRegistered(ref name))) if name == "Open"
        ));
    }

    #[tokio::test]
    async fn handler_errors_are_returned_untouched() {
        let mut bus: CommandBus<TestCommand, TestError> = CommandBus::new();
        bus.register_handler("Open", Arc::new(RejectingHandler)).unwrap();

        let result = bus.send(open()).await;

        assert!(matches!(result, Err(TestError::Rejected)));
    }

    #[test]
    fn second_registration_for_same_name_is_rejected() {
        let mut bus: CommandBus<TestCommand, TestError> = CommandBus::new();
        bus.register_handler("Open", Arc::new(RecordingHandler::default()))
            .unwrap();

        let result = bus.register_handler("Open", Arc::new(RejectingHandler));

        assert!(matches!(result, Err(BusError::AlreadyRegistered(ref name)) if name == "Open"));
    }

    #[test]
    fn ensure_complete_reports_missing_command() {
        let mut bus: CommandBus<TestCommand, TestError> = CommandBus::new();
        bus.register_handler("Open", Arc::new(RecordingHandler::default()))
            .unwrap();

        assert!(matches!(
            bus.ensure_complete(),
            Err(BusError::NoHandlerRegistered(ref name)) if name == "Close"
        ));

        bus.register_handler("Close", Arc::new(RecordingHandler::default()))
            .unwrap();
        assert!(bus.ensure_complete().is_ok());
    }

    #[test]
    fn register_handlers_binds_one_handler_to_many_names() {
        let mut bus: CommandBus<TestCommand, TestError> = CommandBus::new();
        bus.register_handlers(TestCommand::NAMES, Arc::new(RecordingHandler::default()))
            .unwrap();

        assert!(bus.ensure_complete().is_ok());
    }
}
