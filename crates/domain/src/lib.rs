//! Domain layer for the event-sourcing system.
//!
//! This crate provides the core domain abstractions including:
//! - Aggregate trait and the embedded AggregateRoot bookkeeping
//! - AggregateFactory for building aggregates fresh or from history
//! - Repository for loading and saving aggregates through an event store
//! - Reservation aggregate, commands and command handlers

pub mod aggregate;
pub mod error;
pub mod factory;
pub mod repository;
pub mod reservation;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::DomainError;
pub use factory::AggregateFactory;
pub use repository::Repository;
pub use reservation::{
    AddAdditionalService, AdditionalService, CancelReservation, ConfirmReservation,
    CreateReservation, Money, NewReservation, RemoveAdditionalService, Reservation,
    ReservationCommand, ReservationCommandBus, ReservationCommandHandlers, ReservationError,
    ReservationEvent, ReservationFactory, ReservationRepository, ReservationStatus,
    SetOccupancy, SetSpecialRequest,
};
