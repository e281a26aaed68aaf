//! Process wiring for the reservation service.
//!
//! [`Application::build`] assembles one instance of each bus, the configured
//! event store, the reservation command handlers and the read models, then
//! replays stored events so queries see everything persisted so far.

pub mod config;
pub mod error;

use std::sync::Arc;

use common::AggregateId;
use domain::{
    Repository, Reservation, ReservationCommand, ReservationCommandBus,
    ReservationCommandHandlers, ReservationEvent, ReservationFactory,
};
use event_store::{EventStore, FileEventStore, InMemoryEventStore};
use message_bus::{EventBus, Query, QueryBus};
use projections::{
    HouseUnavailabilityView, Projection, ProjectionProcessor, ReservationListView, subscribe,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use config::{Config, StoreBackend};
pub use error::{AppError, Result};

/// Event store shared by the repository and the catch-up processor.
pub type SharedStore = Arc<dyn EventStore<ReservationEvent>>;

/// A fully wired reservation service.
pub struct Application {
    config: Config,
    store: SharedStore,
    handlers: Arc<ReservationCommandHandlers<SharedStore>>,
    commands: ReservationCommandBus,
    queries: QueryBus,
    reservations: Arc<ReservationListView>,
    houses: Arc<HouseUnavailabilityView>,
}

impl Application {
    #[tracing::instrument(skip_all, fields(backend = %config.store_backend))]
    pub async fn build(config: Config) -> Result<Self> {
        let reservations = Arc::new(ReservationListView::new());
        let houses = Arc::new(HouseUnavailabilityView::new());

        let mut events: EventBus<ReservationEvent> = EventBus::new();
        subscribe(&reservations, &mut events);
        subscribe(&houses, &mut events);
        let events = Arc::new(events);

        let store: SharedStore = match config.store_backend {
            StoreBackend::Memory => Arc::new(InMemoryEventStore::new(events)),
            StoreBackend::File => Arc::new(FileEventStore::open(&config.data_dir, events).await?),
        };

        let handlers = Arc::new(ReservationCommandHandlers::new(Repository::new(
            ReservationFactory,
            Arc::clone(&store),
        )));
        let mut commands = ReservationCommandBus::new();
        Arc::clone(&handlers).register_to(&mut commands)?;
        commands.ensure_complete()?;

        let mut queries = QueryBus::new();
        reservations.register_queries(&mut queries)?;
        houses.register_queries(&mut queries)?;

        let mut processor = ProjectionProcessor::new(Arc::clone(&store));
        processor.register(Arc::clone(&reservations) as Arc<dyn Projection<ReservationEvent>>);
        processor.register(Arc::clone(&houses) as Arc<dyn Projection<ReservationEvent>>);
        let replayed = processor.run_catch_up().await?;

        tracing::info!(replayed, "application ready");

        Ok(Self {
            config,
            store,
            handlers,
            commands,
            queries,
            reservations,
            houses,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn reservations(&self) -> &ReservationListView {
        &self.reservations
    }

    pub fn houses(&self) -> &HouseUnavailabilityView {
        &self.houses
    }

    /// Dispatches a command; events it produces are durable on success.
    pub async fn send(&self, command: impl Into<ReservationCommand>) -> Result<()> {
        self.commands.send(command.into()).await?;
        Ok(())
    }

    pub fn query<Q: Query>(&self, query: &Q) -> Result<Q::Output> {
        Ok(self.queries.send(query)?)
    }

    /// Rebuilds a reservation from its stored events.
    pub async fn load(&self, reservation_id: &AggregateId) -> Result<Reservation> {
        Ok(self.handlers.repository().get_by_id(reservation_id).await?)
    }
}

/// Installs the global tracing subscriber filtered by `config.log_level`.
///
/// A `RUST_LOG` directive that fails to parse falls back to `info`.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| AppError::Tracing(e.to_string()))
}
