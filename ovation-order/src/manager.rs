use crate::models::{Booking, BookingId, BookingStatus, Ticket};
use std::collections::HashMap;

/// Manages booking lifecycle and state transitions
pub struct BookingManager {
    bookings: HashMap<BookingId, Booking>,
    tickets: HashMap<BookingId, Vec<Ticket>>,
}

impl BookingManager {
    pub fn new() -> Self {
        Self {
            bookings: HashMap::new(),
            tickets: HashMap::new(),
        }
    }

    /// Register a freshly created booking (status Pending).
    pub fn register(&mut self, booking: Booking) {
        self.bookings.insert(booking.id, booking);
    }

    pub fn get(&self, booking_id: &BookingId) -> Option<&Booking> {
        self.bookings.get(booking_id)
    }

    pub fn tickets_for(&self, booking_id: &BookingId) -> Option<&[Ticket]> {
        self.tickets.get(booking_id).map(|t| t.as_slice())
    }

    /// Transition: Pending -> Confirmed. Issues one ticket per booked seat,
    /// exactly once; a second confirmation attempt is an invalid transition.
    pub fn confirm_payment(&mut self, booking_id: &BookingId) -> Result<Vec<Ticket>, BookingError> {
        let booking = self.get_booking_mut(booking_id)?;

        if booking.status != BookingStatus::Pending {
            return Err(BookingError::InvalidTransition {
                from: format!("{:?}", booking.status),
                to: "CONFIRMED".to_string(),
            });
        }

        booking.update_status(BookingStatus::Confirmed);
        let issued: Vec<Ticket> = booking
            .seats
            .iter()
            .map(|seat| Ticket::new(*booking_id, seat))
            .collect();
        self.tickets.insert(*booking_id, issued.clone());
        Ok(issued)
    }

    /// Transition: Pending -> Cancelled
    pub fn cancel(&mut self, booking_id: &BookingId) -> Result<(), BookingError> {
        let booking = self.get_booking_mut(booking_id)?;

        if booking.status != BookingStatus::Pending {
            return Err(BookingError::InvalidTransition {
                from: format!("{:?}", booking.status),
                to: "CANCELLED".to_string(),
            });
        }

        booking.update_status(BookingStatus::Cancelled);
        Ok(())
    }

    /// Transition: Pending -> Expired (payment window ran out)
    pub fn expire(&mut self, booking_id: &BookingId) -> Result<(), BookingError> {
        let booking = self.get_booking_mut(booking_id)?;

        if booking.status != BookingStatus::Pending {
            return Err(BookingError::InvalidTransition {
                from: format!("{:?}", booking.status),
                to: "EXPIRED".to_string(),
            });
        }

        booking.update_status(BookingStatus::Expired);
        Ok(())
    }

    fn get_booking_mut(&mut self, booking_id: &BookingId) -> Result<&mut Booking, BookingError> {
        self.bookings
            .get_mut(booking_id)
            .ok_or(BookingError::NotFound(*booking_id))
    }
}

impl Default for BookingManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
