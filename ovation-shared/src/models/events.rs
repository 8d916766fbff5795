use uuid::Uuid;

/// Why the cart's seat selection was emptied.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearReason {
    BackNavigation,
    ZoneSwitch,
    SectionSwitch,
    ShowSwitch,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SeatSelectedEvent {
    pub show_id: u32,
    pub seat_id: u32,
    pub zone_id: String,
    pub selected_at: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SeatReleasedEvent {
    pub show_id: u32,
    pub seat_id: u32,
    pub released_at: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SelectionClearedEvent {
    pub show_id: u32,
    pub cleared_seats: u32,
    pub reason: ClearReason,
    pub cleared_at: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BookingCreatedEvent {
    pub booking_id: Uuid,
    pub show_id: u32,
    pub zone_id: String,
    pub seat_count: u32,
    pub total: i32,
    pub created_at: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TicketsIssuedEvent {
    pub booking_id: Uuid,
    pub ticket_count: u32,
    pub issued_at: i64,
}

/// Envelope published on the in-process event bus.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    SeatSelected(SeatSelectedEvent),
    SeatReleased(SeatReleasedEvent),
    SelectionCleared(SelectionClearedEvent),
    BookingCreated(BookingCreatedEvent),
    TicketsIssued(TicketsIssuedEvent),
}
