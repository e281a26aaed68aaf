//! Command handlers for the reservation write model.

use std::sync::Arc;

use async_trait::async_trait;
use common::{AggregateId, ExpectedVersion};
use event_store::EventStore;
use message_bus::{BusError, Command, CommandBus, CommandHandler, Message};

use crate::error::DomainError;
use crate::factory::AggregateFactory;
use crate::repository::Repository;

use super::{Reservation, ReservationCommand, ReservationEvent, ReservationFactory};

/// Repository of reservations over any event store.
pub type ReservationRepository<S> = Repository<ReservationFactory, S>;

/// Command bus carrying reservation commands.
pub type ReservationCommandBus = CommandBus<ReservationCommand, DomainError>;

/// Executes every [`ReservationCommand`].
///
/// Creation goes through the factory and is saved as a new aggregate. Every
/// other command loads the reservation, runs one domain operation and saves
/// with the version the sender expected.
pub struct ReservationCommandHandlers<S> {
    repository: ReservationRepository<S>,
}

impl<S> ReservationCommandHandlers<S>
where
    S: EventStore<ReservationEvent> + 'static,
{
    pub fn new(repository: ReservationRepository<S>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &ReservationRepository<S> {
        &self.repository
    }

    /// Registers these handlers for every reservation command.
    pub fn register_to(self: Arc<Self>, bus: &mut ReservationCommandBus) -> Result<(), BusError> {
        bus.register_handlers(ReservationCommand::NAMES, self)
    }

    async fn create(&self, details: super::NewReservation) -> Result<(), DomainError> {
        let mut reservation = self.repository.factory().create(details)?;
        self.repository
            .save(&mut reservation, ExpectedVersion::New)
            .await?;
        Ok(())
    }

    async fn modify<F>(
        &self,
        reservation_id: &AggregateId,
        expected: ExpectedVersion,
        operation: F,
    ) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Reservation) -> Result<(), DomainError> + Send,
    {
        let mut reservation = self.repository.get_by_id(reservation_id).await?;
        operation(&mut reservation)?;
        self.repository.save(&mut reservation, expected).await?;
        Ok(())
    }
}

#[async_trait]
impl<S> CommandHandler<ReservationCommand> for ReservationCommandHandlers<S>
where
    S: EventStore<ReservationEvent> + 'static,
{
    type Error = DomainError;

    async fn handle(&self, command: ReservationCommand) -> Result<(), DomainError> {
        let name = command.name();
        let reservation_id = command.aggregate_id().clone();
        let expected = command.expected_aggregate_version();

        let result = match command {
            ReservationCommand::CreateReservation(cmd) => self.create(cmd.into()).await,
            ReservationCommand::SetOccupancy(cmd) => {
                self.modify(&reservation_id, expected, |r| {
                    r.set_occupancy(cmd.number_of_guests)
                })
                .await
            }
            ReservationCommand::AddAdditionalService(cmd) => {
                self.modify(&reservation_id, expected, |r| {
                    r.add_additional_service(cmd.service)
                })
                .await
            }
            ReservationCommand::RemoveAdditionalService(cmd) => {
                self.modify(&reservation_id, expected, |r| {
                    r.remove_additional_service(&cmd.service_id)
                })
                .await
            }
            ReservationCommand::SetSpecialRequest(cmd) => {
                self.modify(&reservation_id, expected, |r| {
                    r.set_special_request(cmd.special_request)
                })
                .await
            }
            ReservationCommand::ConfirmReservation(_) => {
                self.modify(&reservation_id, expected, Reservation::confirm)
                    .await
            }
            ReservationCommand::CancelReservation(_) => {
                self.modify(&reservation_id, expected, Reservation::cancel)
                    .await
            }
        };

        match &result {
            Ok(()) => tracing::info!(command = name, %reservation_id, "command handled"),
            Err(e) => {
                tracing::warn!(command = name, %reservation_id, error = %e, "command rejected")
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use common::Version;
    use event_store::{EventStoreError, InMemoryEventStore};
    use message_bus::EventBus;

    use super::*;
    use crate::aggregate::Aggregate;
    use crate::reservation::{
        AdditionalService, CancelReservation, ConfirmReservation, CreateReservation, Money,
        ReservationError, ReservationStatus, SetOccupancy,
    };

    type Store = InMemoryEventStore<ReservationEvent>;

    fn wire() -> (ReservationCommandBus, Arc<ReservationCommandHandlers<Store>>) {
        let store = InMemoryEventStore::new(Arc::new(EventBus::new()));
        let handlers = Arc::new(ReservationCommandHandlers::new(Repository::new(
            ReservationFactory,
            store,
        )));
        let mut bus = ReservationCommandBus::new();
        Arc::clone(&handlers).register_to(&mut bus).unwrap();
        (bus, handlers)
    }

    fn id() -> AggregateId {
        AggregateId::new("R1")
    }

    fn exact(version: i64) -> ExpectedVersion {
        ExpectedVersion::Exact(Version::new(version))
    }

    fn create() -> ReservationCommand {
        CreateReservation::new(
            id(),
            "H1",
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
            Money::from_dollars(400),
        )
        .into()
    }

    #[tokio::test]
    async fn registration_covers_every_command() {
        let (bus, _) = wire();
        assert!(bus.ensure_complete().is_ok());
    }

    #[tokio::test]
    async fn registering_twice_is_rejected() {
        let (mut bus, handlers) = wire();

        let result = handlers.register_to(&mut bus);

        assert!(matches!(result, Err(BusError::AlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn stale_expected_version_conflicts_and_current_one_succeeds() {
        let (bus, handlers) = wire();
        bus.send(create()).await.unwrap();

        let stale = bus
            .send(SetOccupancy::new(id(), 3, exact(0)).into())
            .await;
        assert!(stale.as_ref().is_err_and(DomainError::is_concurrency_conflict));

        bus.send(SetOccupancy::new(id(), 3, exact(1)).into())
            .await
            .unwrap();

        let reservation = handlers.repository().get_by_id(&id()).await.unwrap();
        assert_eq!(reservation.version(), Version::new(2));
        assert_eq!(reservation.number_of_guests(), 3);
    }

    #[tokio::test]
    async fn creating_the_same_reservation_twice_conflicts() {
        let (bus, _) = wire();
        bus.send(create()).await.unwrap();

        let result = bus.send(create()).await;

        assert!(result.as_ref().is_err_and(DomainError::is_concurrency_conflict));
    }

    #[tokio::test]
    async fn commands_against_unknown_reservation_fail() {
        let (bus, _) = wire();

        let result = bus
            .send(ConfirmReservation::new(id(), exact(1)).into())
            .await;

        assert!(matches!(
            result,
            Err(DomainError::EventStore(EventStoreError::AggregateNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn business_rule_violation_writes_nothing() {
        let (bus, handlers) = wire();
        bus.send(create()).await.unwrap();
        bus.send(CancelReservation::new(id(), exact(1)).into())
            .await
            .unwrap();

        let result = bus
            .send(
                crate::reservation::AddAdditionalService::new(
                    id(),
                    AdditionalService::new("S1", "Breakfast", Money::from_dollars(15)),
                    exact(2),
                )
                .into(),
            )
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Reservation(
                ReservationError::InvalidStateTransition { .. }
            ))
        ));
        let reservation = handlers.repository().get_by_id(&id()).await.unwrap();
        assert_eq!(reservation.version(), Version::new(2));
        assert_eq!(reservation.status(), ReservationStatus::Canceled);
    }
}
