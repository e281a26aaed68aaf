//! One row per reservation, for listing and filtering.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use common::AggregateId;
use domain::{Money, ReservationEvent};
use message_bus::{BusError, QueryBus};
use parking_lot::RwLock;
use serde::Serialize;

use crate::projection::{Projection, ProjectionPosition};
use crate::queries::GetAllReservations;
use crate::read_model::ReadModel;

/// Lifecycle stage shown in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListedStatus {
    Created,
    Confirmed,
    Canceled,
}

impl fmt::Display for ListedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListedStatus::Created => write!(f, "Created"),
            ListedStatus::Confirmed => write!(f, "Confirmed"),
            ListedStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationListRecord {
    pub reservation_id: AggregateId,
    pub house_id: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub price: Money,
    pub number_of_guests: u32,
    pub has_special_request: bool,
    pub number_of_additional_services: u32,
    pub status: ListedStatus,
}

#[derive(Default)]
struct State {
    records: HashMap<AggregateId, ReservationListRecord>,
    position: ProjectionPosition,
}

/// Listing of every reservation ever created, canceled ones included.
///
/// Events for a reservation the view has never seen created are ignored.
#[derive(Default)]
pub struct ReservationListView {
    state: RwLock<State>,
}

impl ReservationListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reservation_id: &AggregateId) -> Option<ReservationListRecord> {
        self.state.read().records.get(reservation_id).cloned()
    }

    /// Returns matching reservations ordered by arrival date, then ID.
    ///
    /// Date bounds are exclusive: a reservation arriving exactly on
    /// `arrival_date_from` or `arrival_date_to` is left out.
    pub fn find(&self, query: &GetAllReservations) -> Vec<ReservationListRecord> {
        let state = self.state.read();
        let mut found: Vec<_> = state
            .records
            .values()
            .filter(|r| query.house_id.as_ref().is_none_or(|h| &r.house_id == h))
            .filter(|r| query.arrival_date_from.is_none_or(|from| r.arrival_date > from))
            .filter(|r| query.arrival_date_to.is_none_or(|to| r.arrival_date < to))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.arrival_date
                .cmp(&b.arrival_date)
                .then_with(|| a.reservation_id.cmp(&b.reservation_id))
        });
        found
    }

    /// Answers [`GetAllReservations`] from this view.
    pub fn register_queries(self: &Arc<Self>, bus: &mut QueryBus) -> Result<(), BusError> {
        let view = Arc::clone(self);
        bus.register_handler(move |query: &GetAllReservations| view.find(query))
    }
}

impl Projection<ReservationEvent> for ReservationListView {
    fn name(&self) -> &'static str {
        "ReservationListView"
    }

    fn subscriptions(&self) -> &'static [&'static str] {
        ReservationEvent::NAMES
    }

    fn handle(&self, event: &ReservationEvent) -> crate::Result<()> {
        let mut state = self.state.write();

        match event {
            ReservationEvent::ReservationCreated(data) => {
                state.records.insert(
                    data.reservation_id.clone(),
                    ReservationListRecord {
                        reservation_id: data.reservation_id.clone(),
                        house_id: data.house_id.clone(),
                        arrival_date: data.arrival_date,
                        departure_date: data.departure_date,
                        price: data.price,
                        number_of_guests: 1,
                        has_special_request: false,
                        number_of_additional_services: 0,
                        status: ListedStatus::Created,
                    },
                );
            }
            ReservationEvent::OccupancySet(data) => {
                if let Some(record) = state.records.get_mut(&data.reservation_id) {
                    record.number_of_guests = data.number_of_guests;
                }
            }
            ReservationEvent::AdditionalServiceAdded(data) => {
                if let Some(record) = state.records.get_mut(&data.reservation_id) {
                    record.number_of_additional_services += 1;
                }
            }
            ReservationEvent::AdditionalServiceRemoved(data) => {
                if let Some(record) = state.records.get_mut(&data.reservation_id) {
                    record.number_of_additional_services =
                        record.number_of_additional_services.saturating_sub(1);
                }
            }
            ReservationEvent::SpecialRequestSet(data) => {
                if let Some(record) = state.records.get_mut(&data.reservation_id) {
                    record.has_special_request = !data.message.is_empty();
                }
            }
            ReservationEvent::ReservationConfirmed(data) => {
                if let Some(record) = state.records.get_mut(&data.reservation_id) {
                    record.status = ListedStatus::Confirmed;
                }
            }
            ReservationEvent::ReservationCanceled(data) => {
                if let Some(record) = state.records.get_mut(&data.reservation_id) {
                    record.status = ListedStatus::Canceled;
                }
            }
        }

        state.position = state.position.advance();
        Ok(())
    }

    fn position(&self) -> ProjectionPosition {
        self.state.read().position
    }

    fn reset(&self) {
        *self.state.write() = State::default();
    }
}

impl ReadModel for ReservationListView {
    fn name(&self) -> &'static str {
        "ReservationListView"
    }

    fn count(&self) -> usize {
        self.state.read().records.len()
    }
}
