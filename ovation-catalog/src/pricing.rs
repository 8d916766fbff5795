use crate::models::{Seat, Zone, ZoneId};
use std::collections::HashMap;

/// Zone-price lookup built from the currently loaded zone list.
///
/// Seat prices are always derived through this table rather than stored on
/// the seat, so a zone price refresh is reflected in every later total.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<ZoneId, i32>,
}

impl PriceTable {
    pub fn from_zones(zones: &[Zone]) -> Self {
        Self {
            prices: zones.iter().map(|z| (z.id.clone(), z.unit_price)).collect(),
        }
    }

    pub fn price_of(&self, zone_id: &str) -> Option<i32> {
        self.prices.get(zone_id).copied()
    }

    /// Sum of the owning-zone price of each seat.
    pub fn total_for<'a>(
        &self,
        seats: impl IntoIterator<Item = &'a Seat>,
    ) -> Result<i32, PricingError> {
        let mut total = 0i32;
        for seat in seats {
            let price = self
                .price_of(&seat.zone_id)
                .ok_or_else(|| PricingError::UnknownZone(seat.zone_id.clone()))?;
            total += price;
        }
        Ok(total)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PricingError {
    #[error("No price loaded for zone: {0}")]
    UnknownZone(ZoneId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatStatus;

    fn zone(id: &str, price: i32) -> Zone {
        Zone {
            id: id.to_string(),
            show_id: 1,
            name: format!("Zone {}", id),
            unit_price: price,
            capacity: 90,
        }
    }

    fn seat(id: u32, zone_id: &str) -> Seat {
        Seat {
            id,
            show_id: 1,
            zone_id: zone_id.to_string(),
            section_id: format!("{}1", zone_id),
            row: "A".to_string(),
            number: id,
            status: SeatStatus::Available,
        }
    }

    #[test]
    fn test_total_sums_owning_zone_prices() {
        let table = PriceTable::from_zones(&[zone("A", 3000), zone("B", 1500)]);
        let seats = [seat(1, "A"), seat(2, "A"), seat(3, "B")];

        let total = table.total_for(seats.iter()).unwrap();
        assert_eq!(total, 7500);
    }

    #[test]
    fn test_refreshed_zone_price_wins() {
        // The seat was picked while zone A cost 3000; a refreshed table must
        // drive the total, not any price captured at selection time.
        let seats = [seat(1, "A")];

        let stale = PriceTable::from_zones(&[zone("A", 3000)]);
        assert_eq!(stale.total_for(seats.iter()).unwrap(), 3000);

        let refreshed = PriceTable::from_zones(&[zone("A", 3200)]);
        assert_eq!(refreshed.total_for(seats.iter()).unwrap(), 3200);
    }

    #[test]
    fn test_unknown_zone_is_an_error() {
        let table = PriceTable::from_zones(&[zone("A", 3000)]);
        let seats = [seat(1, "Z")];

        let err = table.total_for(seats.iter()).unwrap_err();
        assert!(matches!(err, PricingError::UnknownZone(z) if z == "Z"));
    }
}
