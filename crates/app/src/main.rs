//! Reservation service entry point.
//!
//! Wires the service from the environment, books a sample stay end to end and
//! prints what the read models report.

use app::{AppError, Application, Config, init_tracing};
use chrono::{Duration, Utc};
use common::ExpectedVersion;
use domain::{
    AddAdditionalService, AdditionalService, Aggregate, ConfirmReservation, CreateReservation,
    Money, Reservation, SetOccupancy, SetSpecialRequest,
};
use projections::{GetAllReservations, IsHouseAvailable, ReadModel};

const HOUSE_ID: &str = "house-1";

fn expected(reservation: &Reservation) -> ExpectedVersion {
    reservation.version().into()
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Configuration and tracing
    let config = Config::from_env()?;
    init_tracing(&config)?;

    // 2. Wire buses, store and read models; replay persisted events
    let app = Application::build(config).await?;
    tracing::info!(
        backend = %app.config().store_backend,
        reservations = app.reservations().count(),
        "reservation service started"
    );

    // 3. Book a sample stay
    let arrival = Utc::now().date_naive() + Duration::days(7);
    let departure = arrival + Duration::days(4);

    let create =
        CreateReservation::with_generated_id(HOUSE_ID, arrival, departure, Money::from_dollars(480));
    let id = create.reservation_id.clone();
    app.send(create).await?;

    let current = app.load(&id).await?;
    app.send(SetOccupancy::new(id.clone(), 3, expected(&current)))
        .await?;

    let current = app.load(&id).await?;
    app.send(AddAdditionalService::new(
        id.clone(),
        AdditionalService::new("breakfast", "Breakfast", Money::from_dollars(60)),
        expected(&current),
    ))
    .await?;

    let current = app.load(&id).await?;
    app.send(SetSpecialRequest::new(
        id.clone(),
        "Ground floor please",
        expected(&current),
    ))
    .await?;

    let current = app.load(&id).await?;
    app.send(ConfirmReservation::new(id.clone(), expected(&current)))
        .await?;

    let booked = app.load(&id).await?;
    tracing::info!(
        reservation_id = %id,
        version = %booked.version(),
        status = %booked.status(),
        total = %booked.total_price(),
        "sample reservation confirmed"
    );

    // 4. Ask the read side
    let available = app.query(&IsHouseAvailable::new(HOUSE_ID, arrival, departure))?;
    let listed = app.query(&GetAllReservations::for_house(HOUSE_ID))?;

    println!("{HOUSE_ID} available for {arrival}..{departure}: {available}");
    println!("{}", serde_json::to_string_pretty(&listed)?);

    Ok(())
}
