use crate::cart::CartSnapshot;
use crate::manager::{BookingError, BookingManager};
use crate::models::{BookedSeat, Booking, BookingId, Ticket};
use async_trait::async_trait;
use chrono::Utc;
use ovation_catalog::{CatalogError, CatalogProvider, SeatId};
use ovation_shared::{BookingCreatedEvent, DomainEvent, TicketsIssuedEvent};
use ovation_store::{EventBus, FixtureCatalog, FixtureError};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// One or more seats raced to booked between selection and submission.
    #[error("Seats no longer available: {0:?}")]
    SeatsUnavailable(Vec<SeatId>),

    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    #[error("Booking rejected: {0}")]
    Rejected(String),

    #[error("Booking gateway unavailable: {0}")]
    Gateway(String),
}

/// Boundary that turns a finalized cart into a booking and, later, tickets.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn create_booking(&self, snapshot: &CartSnapshot) -> Result<Booking, CheckoutError>;

    async fn confirm_payment(&self, booking_id: BookingId) -> Result<Vec<Ticket>, CheckoutError>;

    async fn cancel_booking(&self, booking_id: BookingId) -> Result<(), CheckoutError>;
}

/// Gateway backed by the in-process booking manager and fixture catalog.
///
/// Availability is re-validated against the catalog at submit time, so a
/// seat that another flow booked since the last seat fetch surfaces as
/// `SeatsUnavailable` rather than a double booking.
pub struct InProcessGateway {
    catalog: Arc<FixtureCatalog>,
    manager: Mutex<BookingManager>,
    bus: EventBus,
    currency: String,
}

impl InProcessGateway {
    pub fn new(catalog: Arc<FixtureCatalog>, bus: EventBus, currency: String) -> Self {
        Self {
            catalog,
            manager: Mutex::new(BookingManager::new()),
            bus,
            currency,
        }
    }
}

fn catalog_failure(err: CatalogError) -> CheckoutError {
    match err {
        CatalogError::Unavailable(msg) => CheckoutError::Gateway(msg),
        other => CheckoutError::Rejected(other.to_string()),
    }
}

#[async_trait]
impl BookingGateway for InProcessGateway {
    async fn create_booking(&self, snapshot: &CartSnapshot) -> Result<Booking, CheckoutError> {
        let live = self
            .catalog
            .list_seats(snapshot.show_id, &snapshot.zone_id, None)
            .await
            .map_err(catalog_failure)?;

        let mut seats = Vec::with_capacity(snapshot.seat_ids.len());
        let mut unavailable = Vec::new();
        for &seat_id in &snapshot.seat_ids {
            match live.iter().find(|s| s.id == seat_id) {
                Some(seat) if seat.is_available() => seats.push(BookedSeat {
                    seat_id,
                    zone_id: seat.zone_id.clone(),
                    label: seat.label(),
                }),
                _ => unavailable.push(seat_id),
            }
        }
        if !unavailable.is_empty() {
            tracing::warn!(?unavailable, "booking refused, seats raced to booked");
            return Err(CheckoutError::SeatsUnavailable(unavailable));
        }

        // Commit availability first; a concurrent submit loses here.
        self.catalog
            .mark_booked(snapshot.show_id, &snapshot.seat_ids)
            .await
            .map_err(|err| match err {
                FixtureError::AlreadyBooked(ids) | FixtureError::UnknownSeats(ids) => {
                    CheckoutError::SeatsUnavailable(ids)
                }
                FixtureError::ShowNotFound(id) => {
                    CheckoutError::Rejected(format!("show not found: {}", id))
                }
            })?;

        let booking = Booking::new(
            snapshot.show_id,
            snapshot.zone_id.clone(),
            seats,
            snapshot.total,
            self.currency.clone(),
        );
        self.manager.lock().await.register(booking.clone());

        tracing::info!(booking_id = %booking.id, seats = booking.seat_count(), "booking created");
        self.bus.publish(DomainEvent::BookingCreated(BookingCreatedEvent {
            booking_id: booking.id,
            show_id: booking.show_id,
            zone_id: booking.zone_id.clone(),
            seat_count: booking.seat_count() as u32,
            total: booking.total,
            created_at: Utc::now().timestamp(),
        }));

        Ok(booking)
    }

    async fn confirm_payment(&self, booking_id: BookingId) -> Result<Vec<Ticket>, CheckoutError> {
        let tickets = self
            .manager
            .lock()
            .await
            .confirm_payment(&booking_id)
            .map_err(|err| match err {
                BookingError::NotFound(id) => CheckoutError::BookingNotFound(id),
                other => CheckoutError::Rejected(other.to_string()),
            })?;

        tracing::info!(%booking_id, tickets = tickets.len(), "payment confirmed, tickets issued");
        self.bus.publish(DomainEvent::TicketsIssued(TicketsIssuedEvent {
            booking_id,
            ticket_count: tickets.len() as u32,
            issued_at: Utc::now().timestamp(),
        }));

        Ok(tickets)
    }

    async fn cancel_booking(&self, booking_id: BookingId) -> Result<(), CheckoutError> {
        let (show_id, seat_ids) = {
            let mut manager = self.manager.lock().await;
            let booking = manager
                .get(&booking_id)
                .ok_or(CheckoutError::BookingNotFound(booking_id))?;
            let info = (booking.show_id, booking.seat_ids());
            manager.cancel(&booking_id).map_err(|err| match err {
                BookingError::NotFound(id) => CheckoutError::BookingNotFound(id),
                other => CheckoutError::Rejected(other.to_string()),
            })?;
            info
        };

        // Seats go back on sale once the booking is cancelled.
        self.catalog
            .release(show_id, &seat_ids)
            .await
            .map_err(|err| CheckoutError::Gateway(err.to_string()))?;
        tracing::info!(%booking_id, "booking cancelled, seats released");
        Ok(())
    }
}
