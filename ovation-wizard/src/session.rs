use crate::dedup::SingleFlightCatalog;
use crate::machine::{
    FetchKey, FetchTicket, SeatWizard, SectionPolicy, Stage, StageFailure, ToggleOutcome,
    WizardError,
};
use chrono::Utc;
use ovation_catalog::{CatalogProvider, Seat, SeatId, Section, ShowId, Zone};
use ovation_order::{BookingId, CheckoutError, CheckoutHandoff, SharedCart};
use ovation_shared::{
    ClearReason, DomainEvent, SeatReleasedEvent, SeatSelectedEvent, SelectionClearedEvent,
};
use ovation_store::EventBus;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Async driver around the pure wizard machine.
///
/// Owns the catalog handle (behind single-flight dedup), the shared cart and
/// the event bus. Every catalog failure is converted into stage-local error
/// state on the machine; the only errors surfaced to callers are contract
/// violations and checkout outcomes.
pub struct WizardSession {
    machine: SeatWizard,
    catalog: Arc<SingleFlightCatalog>,
    cart: SharedCart,
    bus: EventBus,
}

impl WizardSession {
    /// Bind the cart to the show and load the zone list.
    pub async fn start(
        show_id: ShowId,
        policy: SectionPolicy,
        catalog: Arc<dyn CatalogProvider>,
        cart: SharedCart,
        bus: EventBus,
    ) -> Self {
        {
            let mut cart = cart.lock().await;
            let before = cart.len();
            cart.set_show(show_id);
            if before > 0 && cart.is_empty() {
                bus.publish(DomainEvent::SelectionCleared(SelectionClearedEvent {
                    show_id,
                    cleared_seats: before as u32,
                    reason: ClearReason::ShowSwitch,
                    cleared_at: Utc::now().timestamp(),
                }));
            }
        }

        let mut session = Self {
            machine: SeatWizard::new(show_id, policy),
            catalog: Arc::new(SingleFlightCatalog::new(catalog)),
            cart,
            bus,
        };
        let ticket = session.machine.begin();
        session.run_fetch(ticket).await;
        session
    }

    async fn run_fetch(&mut self, ticket: FetchTicket) {
        match ticket.key.clone() {
            FetchKey::Zones { show_id } => {
                let result = self.catalog.list_zones(show_id).await;
                self.machine.zones_loaded(&ticket, result);
            }
            FetchKey::Sections { show_id, zone_id } => {
                let result = self.catalog.list_sections(show_id, &zone_id).await;
                self.machine.sections_loaded(&ticket, result);
            }
            FetchKey::Seats(query) => {
                let result = self
                    .catalog
                    .list_seats(query.show_id, &query.zone_id, query.section_id.as_deref())
                    .await;
                let mut cart = self.cart.lock().await;
                self.machine.seats_loaded(&ticket, result, &mut cart);
            }
        }
    }

    pub async fn select_zone(&mut self, zone_id: &str) -> Result<(), WizardError> {
        let ticket = {
            let mut cart = self.cart.lock().await;
            let before = cart.len();
            let ticket = self.machine.select_zone(zone_id, &mut cart)?;
            if before > 0 && cart.is_empty() {
                self.publish_cleared(before, ClearReason::ZoneSwitch);
            }
            ticket
        };
        self.run_fetch(ticket).await;
        Ok(())
    }

    pub async fn select_section(&mut self, section_id: &str) -> Result<(), WizardError> {
        let ticket = {
            let mut cart = self.cart.lock().await;
            let before = cart.len();
            let ticket = self.machine.select_section(section_id, &mut cart)?;
            if before > 0 && cart.is_empty() {
                self.publish_cleared(before, ClearReason::SectionSwitch);
            }
            ticket
        };
        self.run_fetch(ticket).await;
        Ok(())
    }

    pub async fn toggle_seat(&mut self, seat_id: SeatId) -> Result<ToggleOutcome, WizardError> {
        let mut cart = self.cart.lock().await;
        let outcome = self.machine.toggle_seat(seat_id, &mut cart)?;
        match outcome {
            ToggleOutcome::Added => {
                self.bus.publish(DomainEvent::SeatSelected(SeatSelectedEvent {
                    show_id: self.machine.show_id(),
                    seat_id,
                    zone_id: self.machine.chosen_zone().unwrap_or_default().to_string(),
                    selected_at: Utc::now().timestamp(),
                }));
            }
            ToggleOutcome::Removed => {
                self.bus.publish(DomainEvent::SeatReleased(SeatReleasedEvent {
                    show_id: self.machine.show_id(),
                    seat_id,
                    released_at: Utc::now().timestamp(),
                }));
            }
            ToggleOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    pub async fn go_back(&mut self) -> Stage {
        let mut cart = self.cart.lock().await;
        let before = cart.len();
        let stage = self.machine.go_back(&mut cart);
        if before > 0 && cart.is_empty() {
            self.publish_cleared(before, ClearReason::BackNavigation);
        }
        stage
    }

    /// Re-run the fetch behind the current stage-local failure, if any.
    pub async fn retry(&mut self) {
        if let Some(ticket) = self.machine.retry() {
            self.run_fetch(ticket).await;
        }
    }

    pub async fn compute_total(&self) -> Result<i32, WizardError> {
        let cart = self.cart.lock().await;
        self.machine.compute_total(&cart)
    }

    /// Hand the finalized cart to checkout. On a seat race the offending
    /// seats are dropped from the cart and the seat list is refreshed, so
    /// the caller lands back on a consistent Seats stage.
    pub async fn submit(&mut self, handoff: &CheckoutHandoff) -> Result<BookingId, SessionError> {
        let snapshot = {
            let cart = self.cart.lock().await;
            self.machine.checkout_snapshot(&cart)?
        };

        match handoff.submit(&snapshot).await {
            Ok(booking_id) => Ok(booking_id),
            Err(CheckoutError::SeatsUnavailable(seat_ids)) => {
                tracing::warn!(?seat_ids, "submission lost a seat race, returning to seat picker");
                {
                    let mut cart = self.cart.lock().await;
                    for &seat_id in &seat_ids {
                        cart.remove_seat(seat_id);
                        self.bus.publish(DomainEvent::SeatReleased(SeatReleasedEvent {
                            show_id: self.machine.show_id(),
                            seat_id,
                            released_at: Utc::now().timestamp(),
                        }));
                    }
                }
                if let Ok(ticket) = self.machine.refresh_seats() {
                    self.run_fetch(ticket).await;
                }
                Err(SessionError::Checkout(CheckoutError::SeatsUnavailable(
                    seat_ids,
                )))
            }
            Err(other) => Err(other.into()),
        }
    }

    fn publish_cleared(&self, before: usize, reason: ClearReason) {
        self.bus.publish(DomainEvent::SelectionCleared(SelectionClearedEvent {
            show_id: self.machine.show_id(),
            cleared_seats: before as u32,
            reason,
            cleared_at: Utc::now().timestamp(),
        }));
    }

    pub fn stage(&self) -> Stage {
        self.machine.stage()
    }

    pub fn zones(&self) -> &[Zone] {
        self.machine.zones()
    }

    pub fn sections(&self) -> &[Section] {
        self.machine.sections()
    }

    pub fn seats(&self) -> &[Seat] {
        self.machine.seats()
    }

    pub fn failure(&self) -> Option<&StageFailure> {
        self.machine.failure()
    }

    pub fn cart(&self) -> SharedCart {
        self.cart.clone()
    }
}
