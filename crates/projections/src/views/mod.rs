//! Reservation read models.

pub mod house_unavailability;
pub mod reservation_list;

pub use house_unavailability::{HouseUnavailabilityRecord, HouseUnavailabilityView};
pub use reservation_list::{ListedStatus, ReservationListRecord, ReservationListView};
