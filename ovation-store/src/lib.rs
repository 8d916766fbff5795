pub mod app_config;
pub mod events;
pub mod fixture;

pub use app_config::{BusinessRules, Config, VenueConfig, ZoneLayout};
pub use events::EventBus;
pub use fixture::{FixtureCatalog, FixtureError};
