use crate::models::{Seat, Section, SectionId, Show, ShowId, Zone, ZoneId};
use async_trait::async_trait;

/// Key identifying one seat-list fetch. Concurrent fetches for the same key
/// are expected to share a single in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeatQuery {
    pub show_id: ShowId,
    pub zone_id: ZoneId,
    pub section_id: Option<SectionId>,
}

/// Catalog read errors. Cloneable so a deduplicated in-flight fetch can hand
/// the same failure to every waiter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    #[error("Zone not found: {zone_id} (show {show_id})")]
    ZoneNotFound { show_id: ShowId, zone_id: ZoneId },

    #[error("Section not found: {section_id} (show {show_id})")]
    SectionNotFound {
        show_id: ShowId,
        section_id: SectionId,
    },

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only source of show, zone and seat data.
///
/// Availability returned by `list_seats` is ground truth; callers must not
/// cache a seat list past a stage transition.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn list_shows(&self) -> Result<Vec<Show>, CatalogError>;

    async fn get_show(&self, show_id: ShowId) -> Result<Show, CatalogError>;

    async fn list_zones(&self, show_id: ShowId) -> Result<Vec<Zone>, CatalogError>;

    async fn list_sections(
        &self,
        show_id: ShowId,
        zone_id: &str,
    ) -> Result<Vec<Section>, CatalogError>;

    /// Seats scoped to a zone, or to one section of it when `section_id` is
    /// given.
    async fn list_seats(
        &self,
        show_id: ShowId,
        zone_id: &str,
        section_id: Option<&str>,
    ) -> Result<Vec<Seat>, CatalogError>;
}
