use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub rules: BusinessRules,
    #[serde(default)]
    pub venue: VenueConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Broadcast capacity of the in-process event bus.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_currency() -> String {
    "THB".to_string()
}

fn default_event_capacity() -> usize {
    100
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// Venue layout used to seed the fixture catalog. One entry per zone; every
/// zone gets `sections` sections of `rows` x `seats_per_row` seats.
#[derive(Debug, Deserialize, Clone)]
pub struct VenueConfig {
    pub zones: Vec<ZoneLayout>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ZoneLayout {
    pub code: String,
    pub name: String,
    pub unit_price: i32,
    pub sections: u32,
    pub rows: u32,
    pub seats_per_row: u32,
}

impl ZoneLayout {
    pub fn capacity(&self) -> u32 {
        self.sections * self.rows * self.seats_per_row
    }
}

impl Default for VenueConfig {
    fn default() -> Self {
        // Standard floor plan: three priced tiers, three sections each.
        let tier = |code: &str, name: &str, unit_price: i32| ZoneLayout {
            code: code.to_string(),
            name: name.to_string(),
            unit_price,
            sections: 3,
            rows: 3,
            seats_per_row: 10,
        };
        Self {
            zones: vec![
                tier("A", "Zone A (Green)", 3000),
                tier("B", "Zone B (Yellow)", 1500),
                tier("C", "Zone C (Blue)", 1000),
            ],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("OVATION").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
