//! Reservation commands.

use chrono::NaiveDate;
use common::{AggregateId, ExpectedVersion};
use message_bus::{Command, Message};

use super::{AdditionalService, Money, NewReservation};

/// Command to create a new reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReservation {
    pub reservation_id: AggregateId,
    pub house_id: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub price: Money,
}

impl CreateReservation {
    pub fn new(
        reservation_id: AggregateId,
        house_id: impl Into<String>,
        arrival_date: NaiveDate,
        departure_date: NaiveDate,
        price: Money,
    ) -> Self {
        Self {
            reservation_id,
            house_id: house_id.into(),
            arrival_date,
            departure_date,
            price,
        }
    }

    /// Creates the command with a freshly generated reservation ID.
    pub fn with_generated_id(
        house_id: impl Into<String>,
        arrival_date: NaiveDate,
        departure_date: NaiveDate,
        price: Money,
    ) -> Self {
        Self::new(
            AggregateId::new(uuid::Uuid::new_v4().to_string()),
            house_id,
            arrival_date,
            departure_date,
            price,
        )
    }
}

impl From<CreateReservation> for NewReservation {
    fn from(cmd: CreateReservation) -> Self {
        NewReservation {
            reservation_id: cmd.reservation_id,
            house_id: cmd.house_id,
            arrival_date: cmd.arrival_date,
            departure_date: cmd.departure_date,
            price: cmd.price,
        }
    }
}

/// Command to set the number of guests.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOccupancy {
    pub reservation_id: AggregateId,
    pub number_of_guests: u32,
    pub expected_version: ExpectedVersion,
}

impl SetOccupancy {
    pub fn new(
        reservation_id: AggregateId,
        number_of_guests: u32,
        expected_version: ExpectedVersion,
    ) -> Self {
        Self {
            reservation_id,
            number_of_guests,
            expected_version,
        }
    }
}

/// Command to book an additional service.
#[derive(Debug, Clone, PartialEq)]
pub struct AddAdditionalService {
    pub reservation_id: AggregateId,
    pub service: AdditionalService,
    pub expected_version: ExpectedVersion,
}

impl AddAdditionalService {
    pub fn new(
        reservation_id: AggregateId,
        service: AdditionalService,
        expected_version: ExpectedVersion,
    ) -> Self {
        Self {
            reservation_id,
            service,
            expected_version,
        }
    }
}

/// Command to drop an additional service.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveAdditionalService {
    pub reservation_id: AggregateId,
    pub service_id: String,
    pub expected_version: ExpectedVersion,
}

impl RemoveAdditionalService {
    pub fn new(
        reservation_id: AggregateId,
        service_id: impl Into<String>,
        expected_version: ExpectedVersion,
    ) -> Self {
        Self {
            reservation_id,
            service_id: service_id.into(),
            expected_version,
        }
    }
}

/// Command to record a special request.
#[derive(Debug, Clone, PartialEq)]
pub struct SetSpecialRequest {
    pub reservation_id: AggregateId,
    pub special_request: String,
    pub expected_version: ExpectedVersion,
}

impl SetSpecialRequest {
    pub fn new(
        reservation_id: AggregateId,
        special_request: impl Into<String>,
        expected_version: ExpectedVersion,
    ) -> Self {
        Self {
            reservation_id,
            special_request: special_request.into(),
            expected_version,
        }
    }
}

/// Command to confirm a pending reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmReservation {
    pub reservation_id: AggregateId,
    pub expected_version: ExpectedVersion,
}

impl ConfirmReservation {
    pub fn new(reservation_id: AggregateId, expected_version: ExpectedVersion) -> Self {
        Self {
            reservation_id,
            expected_version,
        }
    }
}

/// Command to cancel a reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelReservation {
    pub reservation_id: AggregateId,
    pub expected_version: ExpectedVersion,
}

impl CancelReservation {
    pub fn new(reservation_id: AggregateId, expected_version: ExpectedVersion) -> Self {
        Self {
            reservation_id,
            expected_version,
        }
    }
}

/// Every command a reservation accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ReservationCommand {
    CreateReservation(CreateReservation),
    SetOccupancy(SetOccupancy),
    AddAdditionalService(AddAdditionalService),
    RemoveAdditionalService(RemoveAdditionalService),
    SetSpecialRequest(SetSpecialRequest),
    ConfirmReservation(ConfirmReservation),
    CancelReservation(CancelReservation),
}

impl ReservationCommand {
    pub const CREATE_RESERVATION: &'static str = "CreateReservation";
    pub const SET_OCCUPANCY: &'static str = "SetOccupancy";
    pub const ADD_ADDITIONAL_SERVICE: &'static str = "AddAdditionalService";
    pub const REMOVE_ADDITIONAL_SERVICE: &'static str = "RemoveAdditionalService";
    pub const SET_SPECIAL_REQUEST: &'static str = "SetSpecialRequest";
    pub const CONFIRM_RESERVATION: &'static str = "ConfirmReservation";
    pub const CANCEL_RESERVATION: &'static str = "CancelReservation";
}

impl Message for ReservationCommand {
    fn name(&self) -> &'static str {
        match self {
            ReservationCommand::CreateReservation(_) => Self::CREATE_RESERVATION,
            ReservationCommand::SetOccupancy(_) => Self::SET_OCCUPANCY,
            ReservationCommand::AddAdditionalService(_) => Self::ADD_ADDITIONAL_SERVICE,
            ReservationCommand::RemoveAdditionalService(_) => Self::REMOVE_ADDITIONAL_SERVICE,
            ReservationCommand::SetSpecialRequest(_) => Self::SET_SPECIAL_REQUEST,
            ReservationCommand::ConfirmReservation(_) => Self::CONFIRM_RESERVATION,
            ReservationCommand::CancelReservation(_) => Self::CANCEL_RESERVATION,
        }
    }
}

impl Command for ReservationCommand {
    const NAMES: &'static [&'static str] = &[
        Self::CREATE_RESERVATION,
        Self::SET_OCCUPANCY,
        Self::ADD_ADDITIONAL_SERVICE,
        Self::REMOVE_ADDITIONAL_SERVICE,
        Self::SET_SPECIAL_REQUEST,
        Self::CONFIRM_RESERVATION,
        Self::CANCEL_RESERVATION,
    ];

    fn aggregate_id(&self) -> &AggregateId {
        match self {
            ReservationCommand::CreateReservation(cmd) => &cmd.reservation_id,
            ReservationCommand::SetOccupancy(cmd) => &cmd.reservation_id,
            ReservationCommand::AddAdditionalService(cmd) => &cmd.reservation_id,
            ReservationCommand::RemoveAdditionalService(cmd) => &cmd.reservation_id,
            ReservationCommand::SetSpecialRequest(cmd) => &cmd.reservation_id,
            ReservationCommand::ConfirmReservation(cmd) => &cmd.reservation_id,
            ReservationCommand::CancelReservation(cmd) => &cmd.reservation_id,
        }
    }

    fn expected_aggregate_version(&self) -> ExpectedVersion {
        match self {
            ReservationCommand::CreateReservation(_) => ExpectedVersion::New,
            ReservationCommand::SetOccupancy(cmd) => cmd.expected_version,
            ReservationCommand::AddAdditionalService(cmd) => cmd.expected_version,
            ReservationCommand::RemoveAdditionalService(cmd) => cmd.expected_version,
            ReservationCommand::SetSpecialRequest(cmd) => cmd.expected_version,
            ReservationCommand::ConfirmReservation(cmd) => cmd.expected_version,
            ReservationCommand::CancelReservation(cmd) => cmd.expected_version,
        }
    }
}

macro_rules! impl_from_command {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ReservationCommand {
                fn from(cmd: $variant) -> Self {
                    ReservationCommand::$variant(cmd)
                }
            }
        )*
    };
}

impl_from_command!(
    CreateReservation,
    SetOccupancy,
    AddAdditionalService,
    RemoveAdditionalService,
    SetSpecialRequest,
    ConfirmReservation,
    CancelReservation,
);
