//! Reservation construction.

use chrono::NaiveDate;
use common::AggregateId;

use crate::error::DomainError;
use crate::factory::AggregateFactory;

use super::{Money, Reservation};

/// Everything needed to create a reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub reservation_id: AggregateId,
    pub house_id: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub price: Money,
}

/// Builds [`Reservation`] aggregates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationFactory;

impl AggregateFactory for ReservationFactory {
    type Aggregate = Reservation;
    type Args = NewReservation;

    fn create(&self, details: NewReservation) -> Result<Reservation, DomainError> {
        let mut reservation = Reservation::default();
        reservation.create(details)?;
        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use common::Version;
    use message_bus::Message;

    use super::*;
    use crate::aggregate::Aggregate;
    use crate::reservation::ReservationEvent;

    fn details() -> NewReservation {
        NewReservation {
            reservation_id: AggregateId::new("R1"),
            house_id: "H1".to_string(),
            arrival_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            departure_date: NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
            price: Money::from_dollars(400),
        }
    }

    #[test]
    fn create_records_the_creation_event() {
        let reservation = ReservationFactory.create(details()).unwrap();

        assert_eq!(reservation.version(), Version::first());
        assert_eq!(reservation.uncommitted_changes().len(), 1);
        assert_eq!(
            reservation.uncommitted_changes()[0].name(),
            ReservationEvent::RESERVATION_CREATED
        );
    }

    #[test]
    fn create_propagates_business_rule_errors() {
        let mut stay = details();
        stay.price = Money::from_cents(-1);

        let result = ReservationFactory.create(stay);

        assert!(matches!(result, Err(DomainError::Reservation(_))));
    }

    #[test]
    fn load_from_history_leaves_nothing_to_save() {
        let history = ReservationFactory
            .create(details())
            .unwrap()
            .uncommitted_changes()
            .to_vec();

        let reservation = ReservationFactory.load_from_history(history).unwrap();

        assert_eq!(reservation.version(), Version::first());
        assert!(reservation.uncommitted_changes().is_empty());
        assert_eq!(reservation.house_id(), "H1");
    }
}
