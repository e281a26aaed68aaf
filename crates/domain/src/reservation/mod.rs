//! Reservation aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod factory;
mod handlers;
mod status;
mod value_objects;

pub use aggregate::Reservation;
pub use commands::*;
pub use events::{
    AdditionalServiceAddedData, AdditionalServiceRemovedData, OccupancySetData,
    ReservationCanceledData, ReservationConfirmedData, ReservationCreatedData, ReservationEvent,
    SpecialRequestSetData,
};
pub use factory::{NewReservation, ReservationFactory};
pub use handlers::{ReservationCommandBus, ReservationCommandHandlers, ReservationRepository};
pub use status::ReservationStatus;
pub use value_objects::{AdditionalService, Money};

use chrono::NaiveDate;
use thiserror::Error;

/// Business rules a reservation enforces before recording an event.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The reservation already exists.
    #[error("Reservation already created")]
    AlreadyCreated,

    /// The reservation has not been created yet.
    #[error("Reservation not created")]
    NotCreated,

    /// Departure must come after arrival.
    #[error("Invalid stay: departure {departure_date} is not after arrival {arrival_date}")]
    InvalidStayDates {
        arrival_date: NaiveDate,
        departure_date: NaiveDate,
    },

    #[error("Invalid price: {price}")]
    InvalidPrice { price: i64 },

    #[error("Invalid occupancy: {number_of_guests} (must be at least 1)")]
    InvalidOccupancy { number_of_guests: u32 },

    #[error("Additional service already added: {service_id}")]
    DuplicateAdditionalService { service_id: String },

    #[error("Additional service not found: {service_id}")]
    AdditionalServiceNotFound { service_id: String },

    /// The reservation's status does not allow the action.
    #[error("Invalid state transition: cannot {action} a {current_status} reservation")]
    InvalidStateTransition {
        current_status: ReservationStatus,
        action: &'static str,
    },
}
