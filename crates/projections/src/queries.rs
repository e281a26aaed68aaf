//! Queries answered by the reservation read models.

use chrono::NaiveDate;
use message_bus::{Message, Query};

use crate::views::ReservationListRecord;

/// Lists reservations, optionally narrowed to one house and an arrival window.
///
/// Both arrival bounds are exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllReservations {
    pub house_id: Option<String>,
    pub arrival_date_from: Option<NaiveDate>,
    pub arrival_date_to: Option<NaiveDate>,
}

impl GetAllReservations {
    pub fn for_house(house_id: impl Into<String>) -> Self {
        Self {
            house_id: Some(house_id.into()),
            ..Self::default()
        }
    }
}

impl Message for GetAllReservations {
    fn name(&self) -> &'static str {
        Self::NAME
    }
}

impl Query for GetAllReservations {
    const NAME: &'static str = "GetAllReservations";
    type Output = Vec<ReservationListRecord>;
}

/// Asks whether a house is free for the given stay.
#[derive(Debug, Clone, PartialEq)]
pub struct IsHouseAvailable {
    pub house_id: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
}

impl IsHouseAvailable {
    pub fn new(
        house_id: impl Into<String>,
        arrival_date: NaiveDate,
        departure_date: NaiveDate,
    ) -> Self {
        Self {
            house_id: house_id.into(),
            arrival_date,
            departure_date,
        }
    }
}

impl Message for IsHouseAvailable {
    fn name(&self) -> &'static str {
        Self::NAME
    }
}

impl Query for IsHouseAvailable {
    const NAME: &'static str = "IsHouseAvailable";
    type Output = bool;
}
