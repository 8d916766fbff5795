pub mod models;

pub use models::events::{
    BookingCreatedEvent, ClearReason, DomainEvent, SeatReleasedEvent, SeatSelectedEvent,
    SelectionClearedEvent, TicketsIssuedEvent,
};
