//! Reservation aggregate implementation.

use chrono::NaiveDate;
use common::AggregateId;

use crate::aggregate::{Aggregate, AggregateRoot};
use crate::error::DomainError;

use super::{
    AdditionalService, Money, NewReservation, ReservationError, ReservationEvent,
    ReservationStatus, events::ReservationCreatedData,
};

/// Reservation aggregate root.
///
/// A reservation ties a house to a stay and collects the number of guests,
/// booked services and special requests until it is confirmed or canceled.
#[derive(Debug, Clone, Default)]
pub struct Reservation {
    root: AggregateRoot<ReservationEvent>,
    house_id: String,
    arrival_date: NaiveDate,
    departure_date: NaiveDate,
    price: Money,
    number_of_guests: u32,
    status: ReservationStatus,
    additional_services: Vec<AdditionalService>,
    special_request: Option<String>,
}

impl Aggregate for Reservation {
    type Event = ReservationEvent;

    fn aggregate_type() -> &'static str {
        "Reservation"
    }

    fn root(&self) -> &AggregateRoot<ReservationEvent> {
        &self.root
    }

    fn root_mut(&mut self) -> &mut AggregateRoot<ReservationEvent> {
        &mut self.root
    }

    fn apply(&mut self, event: &ReservationEvent) -> Result<(), DomainError> {
        match event {
            ReservationEvent::ReservationCreated(data) => self.apply_reservation_created(data),
            ReservationEvent::OccupancySet(data) => {
                self.number_of_guests = data.number_of_guests;
            }
            ReservationEvent::AdditionalServiceAdded(data) => {
                self.additional_services.push(AdditionalService::new(
                    data.service_id.clone(),
                    data.name.clone(),
                    data.price,
                ));
            }
            ReservationEvent::AdditionalServiceRemoved(data) => {
                self.additional_services
                    .retain(|service| service.service_id != data.service_id);
            }
            ReservationEvent::SpecialRequestSet(data) => {
                self.special_request = Some(data.message.clone());
            }
            ReservationEvent::ReservationConfirmed(_) => {
                self.status = ReservationStatus::Confirmed;
            }
            ReservationEvent::ReservationCanceled(_) => {
                self.status = ReservationStatus::Canceled;
            }
        }
        Ok(())
    }
}

// Query methods
impl Reservation {
    pub fn house_id(&self) -> &str {
        &self.house_id
    }

    pub fn arrival_date(&self) -> NaiveDate {
        self.arrival_date
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    /// Returns the price of the stay alone.
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the price of the stay plus every additional service.
    pub fn total_price(&self) -> Money {
        self.price + self.additional_services.iter().map(|s| s.price).sum::<Money>()
    }

    pub fn number_of_guests(&self) -> u32 {
        self.number_of_guests
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn additional_services(&self) -> &[AdditionalService] {
        &self.additional_services
    }

    pub fn special_request(&self) -> Option<&str> {
        self.special_request.as_deref()
    }

    /// Returns the number of nights between arrival and departure.
    pub fn nights(&self) -> i64 {
        (self.departure_date - self.arrival_date).num_days()
    }
}

// Command methods (record one event each)
impl Reservation {
    /// Creates the reservation.
    pub fn create(&mut self, details: NewReservation) -> Result<(), DomainError> {
        if self.id().is_some() {
            return Err(ReservationError::AlreadyCreated.into());
        }
        if details.departure_date <= details.arrival_date {
            return Err(ReservationError::InvalidStayDates {
                arrival_date: details.arrival_date,
                departure_date: details.departure_date,
            }
            .into());
        }
        if !details.price.is_positive() {
            return Err(ReservationError::InvalidPrice {
                price: details.price.cents(),
            }
            .into());
        }

        self.apply_change(ReservationEvent::reservation_created(
            details.reservation_id,
            details.house_id,
            details.arrival_date,
            details.departure_date,
            details.price,
        ))
    }

    /// Sets how many guests will stay.
    pub fn set_occupancy(&mut self, number_of_guests: u32) -> Result<(), DomainError> {
        let id = self.modifiable("set occupancy")?;
        if number_of_guests == 0 {
            return Err(ReservationError::InvalidOccupancy { number_of_guests }.into());
        }

        self.apply_change(ReservationEvent::occupancy_set(id, number_of_guests))
    }

    /// Books an additional service.
    pub fn add_additional_service(
        &mut self,
        service: AdditionalService,
    ) -> Result<(), DomainError> {
        let id = self.modifiable("add additional service")?;
        if self.has_service(&service.service_id) {
            return Err(ReservationError::DuplicateAdditionalService {
                service_id: service.service_id,
            }
            .into());
        }
        if service.price.is_negative() {
            return Err(ReservationError::InvalidPrice {
                price: service.price.cents(),
            }
            .into());
        }

        self.apply_change(ReservationEvent::additional_service_added(
            id,
            service.service_id,
            service.name,
            service.price,
        ))
    }

    /// Drops a previously booked service.
    pub fn remove_additional_service(&mut self, service_id: &str) -> Result<(), DomainError> {
        let id = self.modifiable("remove additional service")?;
        if !self.has_service(service_id) {
            return Err(ReservationError::AdditionalServiceNotFound {
                service_id: service_id.to_string(),
            }
            .into());
        }

        self.apply_change(ReservationEvent::additional_service_removed(id, service_id))
    }

    /// Records the guest's special request, replacing any earlier one.
    pub fn set_special_request(&mut self, message: impl Into<String>) -> Result<(), DomainError> {
        let id = self.modifiable("set special request")?;
        self.apply_change(ReservationEvent::special_request_set(id, message))
    }

    pub fn confirm(&mut self) -> Result<(), DomainError> {
        let id = self.created_id()?;
        if !self.status.can_confirm() {
            return Err(self.invalid_transition("confirm"));
        }
        self.apply_change(ReservationEvent::reservation_confirmed(id))
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        let id = self.created_id()?;
        if !self.status.can_cancel() {
            return Err(self.invalid_transition("cancel"));
        }
        self.apply_change(ReservationEvent::reservation_canceled(id))
    }
}

// Helpers
impl Reservation {
    fn apply_reservation_created(&mut self, data: &ReservationCreatedData) {
        self.house_id = data.house_id.clone();
        self.arrival_date = data.arrival_date;
        self.departure_date = data.departure_date;
        self.price = data.price;
        self.number_of_guests = 1;
        self.status = ReservationStatus::Pending;
    }

    fn has_service(&self, service_id: &str) -> bool {
        self.additional_services
            .iter()
            .any(|service| service.service_id == service_id)
    }

    fn created_id(&self) -> Result<AggregateId, ReservationError> {
        self.id().cloned().ok_or(ReservationError::NotCreated)
    }

    fn modifiable(&self, action: &'static str) -> Result<AggregateId, DomainError> {
        let id = self.created_id()?;
        if !self.status.can_modify() {
            return Err(self.invalid_transition(action));
        }
        Ok(id)
    }

    fn invalid_transition(&self, action: &'static str) -> DomainError {
        ReservationError::InvalidStateTransition {
            current_status: self.status,
            action,
        }
        .into()
    }
}
