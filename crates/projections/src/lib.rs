//! Read models for the reservation query side.
//!
//! This crate provides:
//! - [`Projection`] trait for views updated by published events
//! - [`ProjectionProcessor`] replaying the event store into views at startup
//! - [`ReservationListView`] and [`HouseUnavailabilityView`] read models
//! - [`GetAllReservations`] and [`IsHouseAvailable`] queries answered by them

pub mod error;
pub mod processor;
pub mod projection;
pub mod queries;
pub mod read_model;
pub mod views;

pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::{Projection, ProjectionPosition, subscribe};
pub use queries::{GetAllReservations, IsHouseAvailable};
pub use read_model::ReadModel;
pub use views::{
    HouseUnavailabilityRecord, HouseUnavailabilityView, ListedStatus, ReservationListRecord,
    ReservationListView,
};
