//! Message contracts and in-process routing.
//!
//! This crate provides the messaging half of the CQRS core:
//! - [`Message`], [`Event`], [`Command`] and [`Query`] contracts
//! - [`EventBus`] fanning an event out to zero or more subscribers
//! - [`CommandBus`] routing a command to exactly one async handler
//! - [`QueryBus`] routing a query to exactly one typed handler
//!
//! All three registries are keyed by the message discriminant returned from
//! [`Message::name`]. Registration takes `&mut self`, so a bus is mutable only
//! while the process is being wired and is shared read-only afterwards.

pub mod command_bus;
pub mod error;
pub mod event_bus;
pub mod message;
pub mod query_bus;

pub use command_bus::{CommandBus, CommandHandler};
pub use error::{BusError, HandlerError, Result};
pub use event_bus::EventBus;
pub use message::{Command, Event, Message, Query};
pub use query_bus::QueryBus;
