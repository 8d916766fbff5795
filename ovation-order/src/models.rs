use chrono::{DateTime, Utc};
use ovation_catalog::{SeatId, ShowId, ZoneId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BookingId = Uuid;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Expired,
}

/// A seat captured into a booking, with the display data frozen at booking
/// time. The price is not frozen here; the booking total was computed from
/// the zone price at snapshot time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSeat {
    pub seat_id: SeatId,
    pub zone_id: ZoneId,
    pub label: String,
}

/// The single source of truth for a confirmed purchase intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub show_id: ShowId,
    pub zone_id: ZoneId,
    pub seats: Vec<BookedSeat>,
    pub total: i32,
    pub currency: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        show_id: ShowId,
        zone_id: ZoneId,
        seats: Vec<BookedSeat>,
        total: i32,
        currency: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            show_id,
            zone_id,
            seats,
            total,
            currency,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn seat_ids(&self) -> Vec<SeatId> {
        self.seats.iter().map(|s| s.seat_id).collect()
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    /// Update booking status
    pub fn update_status(&mut self, new_status: BookingStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }
}

/// Proof of entry for one booked seat, issued on payment confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub booking_id: BookingId,
    pub seat_id: SeatId,
    pub zone_id: ZoneId,
    pub seat_label: String,
    pub ticket_code: String,
    pub issued_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(booking_id: BookingId, seat: &BookedSeat) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id,
            seat_id: seat.seat_id,
            zone_id: seat.zone_id.clone(),
            seat_label: seat.label.clone(),
            ticket_code: format!("TKT-{}", Uuid::new_v4().simple()),
            issued_at: Utc::now(),
        }
    }
}
