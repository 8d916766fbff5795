pub mod models;
pub mod pricing;
pub mod provider;

pub use models::{Seat, SeatStatus, Section, SectionId, SeatId, Show, ShowId, StagePosition, Zone, ZoneId};
pub use pricing::{PriceTable, PricingError};
pub use provider::{CatalogError, CatalogProvider, SeatQuery};
