use crate::cart::{CartSnapshot, SharedCart};
use crate::gateway::{BookingGateway, CheckoutError};
use crate::models::{BookingId, Ticket};
use std::sync::Arc;

/// Owns everything after the wizard hands over a finalized cart.
///
/// The handoff is the only writer of the cart's `booking_id`; it never
/// touches the seat selection.
pub struct CheckoutHandoff {
    gateway: Arc<dyn BookingGateway>,
    cart: SharedCart,
}

impl CheckoutHandoff {
    pub fn new(gateway: Arc<dyn BookingGateway>, cart: SharedCart) -> Self {
        Self { gateway, cart }
    }

    /// Create a booking for the snapshot and record its id on the cart.
    pub async fn submit(&self, snapshot: &CartSnapshot) -> Result<BookingId, CheckoutError> {
        let booking = self.gateway.create_booking(snapshot).await?;
        self.cart.lock().await.set_booking_id(booking.id);
        tracing::info!(booking_id = %booking.id, total = booking.total, "cart handed off to checkout");
        Ok(booking.id)
    }

    pub async fn confirm_payment(&self, booking_id: BookingId) -> Result<Vec<Ticket>, CheckoutError> {
        self.gateway.confirm_payment(booking_id).await
    }

    pub async fn cancel(&self, booking_id: BookingId) -> Result<(), CheckoutError> {
        self.gateway.cancel_booking(booking_id).await
    }
}
