//! Periods during which a house is already rented.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use common::AggregateId;
use domain::ReservationEvent;
use message_bus::{BusError, QueryBus};
use parking_lot::RwLock;
use serde::Serialize;

use crate::projection::{Projection, ProjectionPosition};
use crate::queries::IsHouseAvailable;
use crate::read_model::ReadModel;

const RENTED: &str = "Rented";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseUnavailabilityRecord {
    pub id: String,
    pub house_id: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub reason: String,
}

impl HouseUnavailabilityRecord {
    fn key(reservation_id: &AggregateId) -> String {
        format!("reservation-{reservation_id}")
    }

    /// Stays are half-open: departing the day another guest arrives is fine.
    fn overlaps(&self, arrival_date: NaiveDate, departure_date: NaiveDate) -> bool {
        arrival_date < self.departure_date && departure_date > self.arrival_date
    }
}

#[derive(Default)]
struct State {
    records: HashMap<String, HouseUnavailabilityRecord>,
    position: ProjectionPosition,
}

/// Blocks a house for every live reservation; cancellation frees it again.
#[derive(Default)]
pub struct HouseUnavailabilityView {
    state: RwLock<State>,
}

impl HouseUnavailabilityView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records_for_house(&self, house_id: &str) -> Vec<HouseUnavailabilityRecord> {
        let mut records: Vec<_> = self
            .state
            .read()
            .records
            .values()
            .filter(|r| r.house_id == house_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.arrival_date);
        records
    }

    pub fn is_available(&self, query: &IsHouseAvailable) -> bool {
        !self.state.read().records.values().any(|r| {
            r.house_id == query.house_id && r.overlaps(query.arrival_date, query.departure_date)
        })
    }

    /// Answers [`IsHouseAvailable`] from this view.
    pub fn register_queries(self: &Arc<Self>, bus: &mut QueryBus) -> Result<(), BusError> {
        let view = Arc::clone(self);
        bus.register_handler(move |query: &IsHouseAvailable| view.is_available(query))
    }
}

impl Projection<ReservationEvent> for HouseUnavailabilityView {
    fn name(&self) -> &'static str {
        "HouseUnavailabilityView"
    }

    fn subscriptions(&self) -> &'static [&'static str] {
        &[
            ReservationEvent::RESERVATION_CREATED,
            ReservationEvent::RESERVATION_CANCELED,
        ]
    }

    fn handle(&self, event: &ReservationEvent) -> crate::Result<()> {
        let mut state = self.state.write();

        match event {
            ReservationEvent::ReservationCreated(data) => {
                let id = HouseUnavailabilityRecord::key(&data.reservation_id);
                state.records.insert(
                    id.clone(),
                    HouseUnavailabilityRecord {
                        id,
                        house_id: data.house_id.clone(),
                        arrival_date: data.arrival_date,
                        departure_date: data.departure_date,
                        reason: RENTED.to_string(),
                    },
                );
            }
            ReservationEvent::ReservationCanceled(data) => {
                state
                    .records
                    .remove(&HouseUnavailabilityRecord::key(&data.reservation_id));
            }
            _ => return Ok(()),
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

impl ReadModel for HouseUnavailabilityView {
    fn name(&self) -> &'static str {
        "HouseUnavailabilityView"
    }

    fn count(&self) -> usize {
        self.state.read().records.len()
    }
}
