use crate::models::BookingId;
use ovation_catalog::{Seat, SeatId, ShowId, ZoneId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cart shared between the wizard and the checkout handoff.
pub type SharedCart = Arc<Mutex<CartStore>>;

/// Shared selection state, mutated only through the named operations below.
///
/// Every operation is total: bad input is a no-op, never an error. Field
/// ownership is by convention: the wizard writes the seat set, the checkout
/// handoff writes `booking_id`, and neither touches the other's field.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    show_id: Option<ShowId>,
    seats: Vec<Seat>,
    booking_id: Option<BookingId>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedCart {
        Arc::new(Mutex::new(self))
    }

    /// Bind the cart to a show. Switching shows resets the whole cart.
    pub fn set_show(&mut self, show_id: ShowId) {
        if self.show_id == Some(show_id) {
            return;
        }
        self.show_id = Some(show_id);
        self.seats.clear();
        self.booking_id = None;
    }

    /// Add a seat, keeping selection order. No-op when the seat is already
    /// present or belongs to a different show than the cart is bound to.
    pub fn add_seat(&mut self, seat: Seat) {
        if self.show_id != Some(seat.show_id) {
            return;
        }
        if self.contains(seat.id) {
            return;
        }
        self.seats.push(seat);
    }

    pub fn remove_seat(&mut self, seat_id: SeatId) {
        self.seats.retain(|s| s.id != seat_id);
    }

    pub fn clear_seats(&mut self) {
        self.seats.clear();
    }

    pub fn set_booking_id(&mut self, booking_id: BookingId) {
        self.booking_id = Some(booking_id);
    }

    pub fn show_id(&self) -> Option<ShowId> {
        self.show_id
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Seat ids in user selection order.
    pub fn seat_ids(&self) -> Vec<SeatId> {
        self.seats.iter().map(|s| s.id).collect()
    }

    pub fn contains(&self, seat_id: SeatId) -> bool {
        self.seats.iter().any(|s| s.id == seat_id)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn booking_id(&self) -> Option<BookingId> {
        self.booking_id
    }
}

/// Immutable view of a finalized cart, handed to the checkout boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub show_id: ShowId,
    pub zone_id: ZoneId,
    pub seat_ids: Vec<SeatId>,
    pub total: i32,
}
