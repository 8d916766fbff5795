pub mod cart;
pub mod gateway;
pub mod manager;
pub mod models;
pub mod orchestrator;

pub use cart::{CartSnapshot, CartStore, SharedCart};
pub use gateway::{BookingGateway, CheckoutError, InProcessGateway};
pub use manager::BookingManager;
pub use models::{BookedSeat, Booking, BookingId, BookingStatus, Ticket};
pub use orchestrator::CheckoutHandoff;
