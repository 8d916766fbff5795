use chrono::{NaiveDate, NaiveTime};
use ovation_catalog::{CatalogProvider, SeatId};
use ovation_order::{CartStore, CheckoutHandoff, InProcessGateway};
use ovation_store::{Config, EventBus, FixtureCatalog};
use ovation_wizard::{SectionPolicy, WizardSession};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ovation_app=debug,ovation_wizard=debug,ovation_order=debug,ovation_store=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!(currency = %config.rules.currency, "Starting Ovation demo run");

    let catalog = Arc::new(FixtureCatalog::new(config.venue.clone()));
    let show_id = catalog
        .add_show(
            "Midnight Parade",
            "The Lanterns",
            "Rock",
            "Gate 4",
            NaiveDate::from_ymd_opt(2026, 11, 21).expect("valid date"),
            NaiveTime::from_hms_opt(19, 30, 0).expect("valid time"),
            NaiveTime::from_hms_opt(22, 0, 0).expect("valid time"),
        )
        .await;

    let show = catalog.get_show(show_id).await?;
    tracing::info!(show = %show.name, artist = %show.artist, date = %show.show_date, "show on sale");

    let bus = EventBus::new(config.rules.event_capacity);
    let mut event_rx = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            tracing::info!(?event, "domain event");
        }
    });

    let cart = CartStore::new().into_shared();
    let mut session = WizardSession::start(
        show_id,
        SectionPolicy::Require,
        catalog.clone(),
        cart.clone(),
        bus.clone(),
    )
    .await;

    for zone in session.zones() {
        tracing::info!(zone = %zone.id, price = zone.unit_price, capacity = zone.capacity, "zone on sale");
    }

    session.select_zone("A").await?;
    session.select_section("A2").await?;

    let picks: Vec<SeatId> = session
        .seats()
        .iter()
        .filter(|s| s.is_available())
        .take(2)
        .map(|s| s.id)
        .collect();
    for seat_id in &picks {
        session.toggle_seat(*seat_id).await?;
    }
    let total = session.compute_total().await?;
    tracing::info!(seats = ?picks, total, "seats selected");

    let gateway = Arc::new(InProcessGateway::new(
        catalog.clone(),
        bus.clone(),
        config.rules.currency.clone(),
    ));
    let handoff = CheckoutHandoff::new(gateway, cart.clone());

    let booking_id = session.submit(&handoff).await?;
    tracing::info!(%booking_id, "booking created, proceeding to payment");

    let tickets = handoff.confirm_payment(booking_id).await?;
    for ticket in &tickets {
        tracing::info!(code = %ticket.ticket_code, seat = %ticket.seat_label, zone = %ticket.zone_id, "ticket issued");
    }

    // Let the event logger drain before the process exits.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    Ok(())
}
