use crate::app_config::VenueConfig;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use ovation_catalog::{
    CatalogError, CatalogProvider, Seat, SeatId, SeatStatus, Section, Show, ShowId,
    StagePosition, Zone,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Deterministic in-memory catalog provider seeded from the venue layout.
///
/// This is the authoritative availability source for the process: the
/// in-process booking gateway flips seats here, and the wizard re-reads them
/// on every Seats entry. No randomness anywhere, so tests get stable layouts.
pub struct FixtureCatalog {
    venue: VenueConfig,
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    shows: HashMap<ShowId, ShowRecord>,
    next_show_id: ShowId,
    next_seat_id: SeatId,
}

struct ShowRecord {
    show: Show,
    zones: Vec<Zone>,
    sections: Vec<Section>,
    seats: Vec<Seat>,
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    #[error("Unknown seats: {0:?}")]
    UnknownSeats(Vec<SeatId>),

    #[error("Seats already booked: {0:?}")]
    AlreadyBooked(Vec<SeatId>),
}

impl FixtureCatalog {
    pub fn new(venue: VenueConfig) -> Self {
        Self {
            venue,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn with_default_layout() -> Self {
        Self::new(VenueConfig::default())
    }

    /// Register a show and generate its zones, sections and seats from the
    /// venue layout. Returns the new show id.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_show(
        &self,
        name: &str,
        artist: &str,
        genre: &str,
        venue_gate: &str,
        show_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> ShowId {
        let mut inner = self.inner.write().await;
        inner.next_show_id += 1;
        let show_id = inner.next_show_id;

        let show = Show {
            id: show_id,
            name: name.to_string(),
            artist: artist.to_string(),
            genre: genre.to_string(),
            venue_gate: venue_gate.to_string(),
            show_date,
            start_time,
            end_time,
        };

        let mut zones = Vec::new();
        let mut sections = Vec::new();
        let mut seats = Vec::new();

        for layout in &self.venue.zones {
            zones.push(Zone {
                id: layout.code.clone(),
                show_id,
                name: layout.name.clone(),
                unit_price: layout.unit_price,
                capacity: layout.capacity(),
            });

            for s in 0..layout.sections {
                let section_id = format!("{}{}", layout.code, s + 1);
                let position = match s % 3 {
                    0 => StagePosition::Left,
                    1 => StagePosition::Center,
                    _ => StagePosition::Right,
                };
                sections.push(Section {
                    id: section_id.clone(),
                    zone_id: layout.code.clone(),
                    label: format!("Section {}", section_id),
                    position,
                });

                for r in 0..layout.rows {
                    let row = char::from(b'A' + (r % 26) as u8).to_string();
                    for n in 1..=layout.seats_per_row {
                        inner.next_seat_id += 1;
                        seats.push(Seat {
                            id: inner.next_seat_id,
                            show_id,
                            zone_id: layout.code.clone(),
                            section_id: section_id.clone(),
                            row: row.clone(),
                            number: n,
                            status: SeatStatus::Available,
                        });
                    }
                }
            }
        }

        tracing::info!(
            show_id,
            zones = zones.len(),
            seats = seats.len(),
            "seeded show into fixture catalog"
        );
        inner.shows.insert(
            show_id,
            ShowRecord {
                show,
                zones,
                sections,
                seats,
            },
        );
        show_id
    }

    /// Flip the given seats to booked, all-or-nothing. Fails without side
    /// effects when any seat is unknown or already booked.
    pub async fn mark_booked(
        &self,
        show_id: ShowId,
        seat_ids: &[SeatId],
    ) -> Result<(), FixtureError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .shows
            .get_mut(&show_id)
            .ok_or(FixtureError::ShowNotFound(show_id))?;

        let mut unknown = Vec::new();
        let mut taken = Vec::new();
        for &seat_id in seat_ids {
            match record.seats.iter().find(|s| s.id == seat_id) {
                None => unknown.push(seat_id),
                Some(s) if s.status == SeatStatus::Booked => taken.push(seat_id),
                Some(_) => {}
            }
        }
        if !unknown.is_empty() {
            return Err(FixtureError::UnknownSeats(unknown));
        }
        if !taken.is_empty() {
            return Err(FixtureError::AlreadyBooked(taken));
        }

        for seat in record.seats.iter_mut() {
            if seat_ids.contains(&seat.id) {
                seat.status = SeatStatus::Booked;
            }
        }
        Ok(())
    }

    /// Flip booked seats back to available (cancellation path).
    pub async fn release(&self, show_id: ShowId, seat_ids: &[SeatId]) -> Result<(), FixtureError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .shows
            .get_mut(&show_id)
            .ok_or(FixtureError::ShowNotFound(show_id))?;

        let unknown: Vec<SeatId> = seat_ids
            .iter()
            .copied()
            .filter(|id| !record.seats.iter().any(|s| s.id == *id))
            .collect();
        if !unknown.is_empty() {
            return Err(FixtureError::UnknownSeats(unknown));
        }

        for seat in record.seats.iter_mut() {
            if seat_ids.contains(&seat.id) {
                seat.status = SeatStatus::Available;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogProvider for FixtureCatalog {
    async fn list_shows(&self) -> Result<Vec<Show>, CatalogError> {
        let inner = self.inner.read().await;
        let mut shows: Vec<Show> = inner.shows.values().map(|r| r.show.clone()).collect();
        shows.sort_by_key(|s| s.id);
        Ok(shows)
    }

    async fn get_show(&self, show_id: ShowId) -> Result<Show, CatalogError> {
        let inner = self.inner.read().await;
        inner
            .shows
            .get(&show_id)
            .map(|r| r.show.clone())
            .ok_or(CatalogError::ShowNotFound(show_id))
    }

    async fn list_zones(&self, show_id: ShowId) -> Result<Vec<Zone>, CatalogError> {
        let inner = self.inner.read().await;
        inner
            .shows
            .get(&show_id)
            .map(|r| r.zones.clone())
            .ok_or(CatalogError::ShowNotFound(show_id))
    }

    async fn list_sections(
        &self,
        show_id: ShowId,
        zone_id: &str,
    ) -> Result<Vec<Section>, CatalogError> {
        let inner = self.inner.read().await;
        let record = inner
            .shows
            .get(&show_id)
            .ok_or(CatalogError::ShowNotFound(show_id))?;

        if !record.zones.iter().any(|z| z.id == zone_id) {
            return Err(CatalogError::ZoneNotFound {
                show_id,
                zone_id: zone_id.to_string(),
            });
        }
        Ok(record
            .sections
            .iter()
            .filter(|s| s.zone_id == zone_id)
            .cloned()
            .collect())
    }

    async fn list_seats(
        &self,
        show_id: ShowId,
        zone_id: &str,
        section_id: Option<&str>,
    ) -> Result<Vec<Seat>, CatalogError> {
        let inner = self.inner.read().await;
        let record = inner
            .shows
            .get(&show_id)
            .ok_or(CatalogError::ShowNotFound(show_id))?;

        if !record.zones.iter().any(|z| z.id == zone_id) {
            return Err(CatalogError::ZoneNotFound {
                show_id,
                zone_id: zone_id.to_string(),
            });
        }
        if let Some(section_id) = section_id {
            if !record
                .sections
                .iter()
                .any(|s| s.id == section_id && s.zone_id == zone_id)
            {
                return Err(CatalogError::SectionNotFound {
                    show_id,
                    section_id: section_id.to_string(),
                });
            }
        }

        Ok(record
            .seats
            .iter()
            .filter(|s| {
                s.zone_id == zone_id
                    && section_id.map_or(true, |section| s.section_id == section)
            })
            .cloned()
            .collect())
    }
}
