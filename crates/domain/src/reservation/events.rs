//! Reservation domain events.

use chrono::NaiveDate;
use common::AggregateId;
use message_bus::{Event, Message};
use serde::{Deserialize, Serialize};

use super::Money;

/// Events that can occur on a reservation aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ReservationEvent {
    /// Reservation was created for a house and a stay.
    ReservationCreated(ReservationCreatedData),

    /// Number of guests was set.
    OccupancySet(OccupancySetData),

    /// An additional service was booked.
    AdditionalServiceAdded(AdditionalServiceAddedData),

    /// An additional service was dropped.
    AdditionalServiceRemoved(AdditionalServiceRemovedData),

    /// Guest left a special request.
    SpecialRequestSet(SpecialRequestSetData),

    /// Reservation was confirmed.
    ReservationConfirmed(ReservationConfirmedData),

    /// Reservation was canceled.
    ReservationCanceled(ReservationCanceledData),
}

impl ReservationEvent {
    pub const RESERVATION_CREATED: &'static str = "ReservationCreated";
    pub const OCCUPANCY_SET: &'static str = "OccupancySet";
    pub const ADDITIONAL_SERVICE_ADDED: &'static str = "AdditionalServiceAdded";
    pub const ADDITIONAL_SERVICE_REMOVED: &'static str = "AdditionalServiceRemoved";
    pub const SPECIAL_REQUEST_SET: &'static str = "SpecialRequestSet";
    pub const RESERVATION_CONFIRMED: &'static str = "ReservationConfirmed";
    pub const RESERVATION_CANCELED: &'static str = "ReservationCanceled";

    /// Every event name, in declaration order.
    pub const NAMES: &'static [&'static str] = &[
        Self::RESERVATION_CREATED,
        Self::OCCUPANCY_SET,
        Self::ADDITIONAL_SERVICE_ADDED,
        Self::ADDITIONAL_SERVICE_REMOVED,
        Self::SPECIAL_REQUEST_SET,
        Self::RESERVATION_CONFIRMED,
        Self::RESERVATION_CANCELED,
    ];

    pub fn reservation_created(
        reservation_id: AggregateId,
        house_id: impl Into<String>,
        arrival_date: NaiveDate,
        departure_date: NaiveDate,
        price: Money,
    ) -> Self {
        ReservationEvent::ReservationCreated(ReservationCreatedData {
            reservation_id,
            house_id: house_id.into(),
            arrival_date,
            departure_date,
            price,
        })
    }

    pub fn occupancy_set(reservation_id: AggregateId, number_of_guests: u32) -> Self {
        ReservationEvent::OccupancySet(OccupancySetData {
            reservation_id,
            number_of_guests,
        })
    }

    pub fn additional_service_added(
        reservation_id: AggregateId,
        service_id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        ReservationEvent::AdditionalServiceAdded(AdditionalServiceAddedData {
            reservation_id,
            service_id: service_id.into(),
            name: name.into(),
            price,
        })
    }

    pub fn additional_service_removed(
        reservation_id: AggregateId,
        service_id: impl Into<String>,
    ) -> Self {
        ReservationEvent::AdditionalServiceRemoved(AdditionalServiceRemovedData {
            reservation_id,
            service_id: service_id.into(),
        })
    }

    pub fn special_request_set(reservation_id: AggregateId, message: impl Into<String>) -> Self {
        ReservationEvent::SpecialRequestSet(SpecialRequestSetData {
            reservation_id,
            message: message.into(),
        })
    }

    pub fn reservation_confirmed(reservation_id: AggregateId) -> Self {
        ReservationEvent::ReservationConfirmed(ReservationConfirmedData { reservation_id })
    }

    pub fn reservation_canceled(reservation_id: AggregateId) -> Self {
        ReservationEvent::ReservationCanceled(ReservationCanceledData { reservation_id })
    }
}

impl Message for ReservationEvent {
    fn name(&self) -> &'static str {
        match self {
            ReservationEvent::ReservationCreated(_) => Self::RESERVATION_CREATED,
            ReservationEvent::OccupancySet(_) => Self::OCCUPANCY_SET,
            ReservationEvent::AdditionalServiceAdded(_) => Self::ADDITIONAL_SERVICE_ADDED,
            ReservationEvent::AdditionalServiceRemoved(_) => Self::ADDITIONAL_SERVICE_REMOVED,
            ReservationEvent::SpecialRequestSet(_) => Self::SPECIAL_REQUEST_SET,
            ReservationEvent::ReservationConfirmed(_) => Self::RESERVATION_CONFIRMED,
            ReservationEvent::ReservationCanceled(_) => Self::RESERVATION_CANCELED,
        }
    }
}

impl Event for ReservationEvent {
    fn aggregate_id(&self) -> &AggregateId {
        match self {
            ReservationEvent::ReservationCreated(data) => &data.reservation_id,
            ReservationEvent::OccupancySet(data) => &data.reservation_id,
            ReservationEvent::AdditionalServiceAdded(data) => &data.reservation_id,
            ReservationEvent::AdditionalServiceRemoved(data) => &data.reservation_id,
            ReservationEvent::SpecialRequestSet(data) => &data.reservation_id,
            ReservationEvent::ReservationConfirmed(data) => &data.reservation_id,
            ReservationEvent::ReservationCanceled(data) => &data.reservation_id,
        }
    }
}

/// Data for ReservationCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationCreatedData {
    pub reservation_id: AggregateId,

    /// The house being reserved.
    pub house_id: String,

    /// First night of the stay.
    pub arrival_date: NaiveDate,

    /// Day the guests leave; not a night of the stay.
    pub departure_date: NaiveDate,

    /// Price of the stay without additional services.
    pub price: Money,
}

/// Data for OccupancySet event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancySetData {
    pub reservation_id: AggregateId,
    pub number_of_guests: u32,
}

/// Data for AdditionalServiceAdded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalServiceAddedData {
    pub reservation_id: AggregateId,
    pub service_id: String,
    pub name: String,
    pub price: Money,
}

/// Data for AdditionalServiceRemoved event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalServiceRemovedData {
    pub reservation_id: AggregateId,
    pub service_id: String,
}

/// Data for SpecialRequestSet event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialRequestSetData {
    pub reservation_id: AggregateId,
    pub message: String,
}

/// Data for ReservationConfirmed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationConfirmedData {
    pub reservation_id: AggregateId,
}

/// Data for ReservationCanceled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationCanceledData {
    pub reservation_id: AggregateId,
}
