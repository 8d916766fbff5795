use async_trait::async_trait;
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use ovation_catalog::{
    CatalogError, CatalogProvider, Seat, SeatQuery, Section, Show, ShowId, Zone,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

type SharedFetch = Shared<BoxFuture<'static, Result<Vec<Seat>, CatalogError>>>;

/// Catalog wrapper that collapses concurrent seat fetches for the same
/// `(show, zone, section)` key into one underlying request.
///
/// Rapid back/forward navigation can ask for the same seat list several
/// times before the first response lands; every caller awaits the same
/// shared future and gets the same result (or the same error). Nothing is
/// cached past completion, so availability stays as fresh as the provider.
pub struct SingleFlightCatalog {
    inner: Arc<dyn CatalogProvider>,
    inflight: Mutex<HashMap<SeatQuery, SharedFetch>>,
}

impl SingleFlightCatalog {
    pub fn new(inner: Arc<dyn CatalogProvider>) -> Self {
        Self {
            inner,
            inflight: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CatalogProvider for SingleFlightCatalog {
    async fn list_shows(&self) -> Result<Vec<Show>, CatalogError> {
        self.inner.list_shows().await
    }

    async fn get_show(&self, show_id: ShowId) -> Result<Show, CatalogError> {
        self.inner.get_show(show_id).await
    }

    async fn list_zones(&self, show_id: ShowId) -> Result<Vec<Zone>, CatalogError> {
        self.inner.list_zones(show_id).await
    }

    async fn list_sections(
        &self,
        show_id: ShowId,
        zone_id: &str,
    ) -> Result<Vec<Section>, CatalogError> {
        self.inner.list_sections(show_id, zone_id).await
    }

    async fn list_seats(
        &self,
        show_id: ShowId,
        zone_id: &str,
        section_id: Option<&str>,
    ) -> Result<Vec<Seat>, CatalogError> {
        let query = SeatQuery {
            show_id,
            zone_id: zone_id.to_string(),
            section_id: section_id.map(|s| s.to_string()),
        };

        let fetch = {
            let mut inflight = self.inflight.lock().await;
            if let Some(existing) = inflight.get(&query) {
                tracing::debug!(?query, "joining in-flight seat fetch");
                existing.clone()
            } else {
                let inner = self.inner.clone();
                let q = query.clone();
                let fetch = async move {
                    inner
                        .list_seats(q.show_id, &q.zone_id, q.section_id.as_deref())
                        .await
                }
                .boxed()
                .shared();
                inflight.insert(query.clone(), fetch.clone());
                fetch
            }
        };

        let result = fetch.clone().await;

        // Drop the entry unless a newer fetch already replaced it.
        let mut inflight = self.inflight.lock().await;
        if let Some(existing) = inflight.get(&query) {
            if existing.ptr_eq(&fetch) {
                inflight.remove(&query);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Provider that answers after a short delay and counts seat fetches.
    struct SlowCatalog {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogProvider for SlowCatalog {
        async fn list_shows(&self) -> Result<Vec<Show>, CatalogError> {
            Ok(vec![])
        }

        async fn get_show(&self, show_id: ShowId) -> Result<Show, CatalogError> {
            Err(CatalogError::ShowNotFound(show_id))
        }

        async fn list_zones(&self, _show_id: ShowId) -> Result<Vec<Zone>, CatalogError> {
            Ok(vec![])
        }

        async fn list_sections(
            &self,
            _show_id: ShowId,
            _zone_id: &str,
        ) -> Result<Vec<Section>, CatalogError> {
            Ok(vec![])
        }

        async fn list_seats(
            &self,
            show_id: ShowId,
            zone_id: &str,
            section_id: Option<&str>,
        ) -> Result<Vec<Seat>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(vec![Seat {
                id: 1,
                show_id,
                zone_id: zone_id.to_string(),
                section_id: section_id.unwrap_or("A1").to_string(),
                row: "A".to_string(),
                number: 1,
                status: ovation_catalog::SeatStatus::Available,
            }])
        }
    }

    #[tokio::test]
    async fn test_identical_fetches_share_one_request() {
        let slow = Arc::new(SlowCatalog {
            calls: AtomicUsize::new(0),
        });
        let catalog = SingleFlightCatalog::new(slow.clone());

        let (a, b, c) = tokio::join!(
            catalog.list_seats(1, "A", Some("A1")),
            catalog.list_seats(1, "A", Some("A1")),
            catalog.list_seats(1, "A", Some("A1")),
        );
        assert_eq!(a.unwrap().len(), 1);
        assert_eq!(b.unwrap().len(), 1);
        assert_eq!(c.unwrap().len(), 1);
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_share() {
        let slow = Arc::new(SlowCatalog {
            calls: AtomicUsize::new(0),
        });
        let catalog = SingleFlightCatalog::new(slow.clone());

        let (a, b) = tokio::join!(
            catalog.list_seats(1, "A", Some("A1")),
            catalog.list_seats(1, "A", Some("A2")),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(slow.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_completed_fetch_is_not_cached() {
        let slow = Arc::new(SlowCatalog {
            calls: AtomicUsize::new(0),
        });
        let catalog = SingleFlightCatalog::new(slow.clone());

        catalog.list_seats(1, "A", Some("A1")).await.unwrap();
        catalog.list_seats(1, "A", Some("A1")).await.unwrap();
        assert_eq!(slow.calls.load(Ordering::SeqCst), 2);
    }
}
