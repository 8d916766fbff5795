use ovation_catalog::{
    CatalogError, PriceTable, PricingError, Seat, SeatId, SeatQuery, Section, SectionId, ShowId,
    Zone, ZoneId,
};
use ovation_order::{CartSnapshot, CartStore};

/// Wizard stage. Owned by the wizard alone; the cart knows nothing about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Zone,
    Section,
    Seats,
}

/// Whether the venue models a section level between zone and seats. One
/// machine, configured, instead of parallel wizard variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionPolicy {
    Require,
    Skip,
}

/// What a fetch ticket was minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKey {
    Zones { show_id: ShowId },
    Sections { show_id: ShowId, zone_id: ZoneId },
    Seats(SeatQuery),
}

/// Tag carried by every catalog fetch. A response is applied only when the
/// ticket's epoch still matches the machine, so a fetch issued before a
/// navigation can never overwrite state issued after it.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub(crate) epoch: u64,
    pub key: FetchKey,
}

/// Stage-local fetch failure, kept for the retry affordance.
#[derive(Debug, Clone)]
pub struct StageFailure {
    pub key: FetchKey,
    pub error: CatalogError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The seat is booked; the tap is swallowed, not an error.
    Ignored,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Zone is not in the loaded zone list: {0}")]
    InvalidZone(ZoneId),

    #[error("Section is not in the chosen zone: {0}")]
    InvalidSection(SectionId),

    #[error("Seat is not part of the current seat list: {0}")]
    UnknownSeat(SeatId),

    #[error("Operation not valid in the {0:?} stage")]
    WrongStage(Stage),

    #[error("No seats selected")]
    EmptySelection,

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// The zone -> section -> seats selection state machine.
///
/// The machine is synchronous and does no I/O itself: navigation operations
/// return a `FetchTicket` describing the catalog read the caller must
/// perform, and the `*_loaded` methods apply (or discard) the response.
/// Cart mutations go through the injected `CartStore` only.
pub struct SeatWizard {
    show_id: ShowId,
    policy: SectionPolicy,
    stage: Stage,
    zones: Vec<Zone>,
    chosen_zone: Option<ZoneId>,
    sections: Vec<Section>,
    chosen_section: Option<SectionId>,
    seats: Vec<Seat>,
    epoch: u64,
    pending: Option<FetchTicket>,
    failure: Option<StageFailure>,
}

impl SeatWizard {
    pub fn new(show_id: ShowId, policy: SectionPolicy) -> Self {
        Self {
            show_id,
            policy,
            stage: Stage::Zone,
            zones: Vec::new(),
            chosen_zone: None,
            sections: Vec::new(),
            chosen_section: None,
            seats: Vec::new(),
            epoch: 0,
            pending: None,
            failure: None,
        }
    }

    /// Issue the zone-list fetch for the Zone stage.
    pub fn begin(&mut self) -> FetchTicket {
        self.mint(FetchKey::Zones {
            show_id: self.show_id,
        })
    }

    fn mint(&mut self, key: FetchKey) -> FetchTicket {
        self.epoch += 1;
        self.failure = None;
        let ticket = FetchTicket {
            epoch: self.epoch,
            key,
        };
        self.pending = Some(ticket.clone());
        ticket
    }

    /// True when the response was consumed, false when it was stale.
    pub fn zones_loaded(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Zone>, CatalogError>,
    ) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!(key = ?ticket.key, "discarding stale zone response");
            return false;
        }
        self.pending = None;
        match result {
            Ok(zones) => self.zones = zones,
            Err(error) => {
                self.failure = Some(StageFailure {
                    key: ticket.key.clone(),
                    error,
                })
            }
        }
        true
    }

    pub fn sections_loaded(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Section>, CatalogError>,
    ) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!(key = ?ticket.key, "discarding stale section response");
            return false;
        }
        self.pending = None;
        match result {
            Ok(sections) => self.sections = sections,
            Err(error) => {
                self.failure = Some(StageFailure {
                    key: ticket.key.clone(),
                    error,
                })
            }
        }
        true
    }

    /// Apply a seat-list response. A fresh list also prunes cart entries the
    /// catalog now reports as booked or gone, so a selected seat can never
    /// outlive its observed availability.
    pub fn seats_loaded(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Seat>, CatalogError>,
        cart: &mut CartStore,
    ) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!(key = ?ticket.key, "discarding stale seat response");
            return false;
        }
        self.pending = None;
        match result {
            Ok(seats) => {
                let stale: Vec<SeatId> = cart
                    .seat_ids()
                    .into_iter()
                    .filter(|id| {
                        !seats
                            .iter()
                            .any(|s| s.id == *id && s.is_available())
                    })
                    .collect();
                for id in stale {
                    tracing::warn!(seat_id = id, "selected seat no longer available, dropping");
                    cart.remove_seat(id);
                }
                self.seats = seats;
            }
            Err(error) => {
                self.failure = Some(StageFailure {
                    key: ticket.key.clone(),
                    error,
                })
            }
        }
        true
    }

    /// Choose a zone. Valid from any stage once the zone list is loaded;
    /// choosing a different zone drops any seats selected under the old one.
    pub fn select_zone(
        &mut self,
        zone_id: &str,
        cart: &mut CartStore,
    ) -> Result<FetchTicket, WizardError> {
        if !self.zones.iter().any(|z| z.id == zone_id) {
            return Err(WizardError::InvalidZone(zone_id.to_string()));
        }
        if self.chosen_zone.as_deref() != Some(zone_id) {
            cart.clear_seats();
        }
        self.chosen_zone = Some(zone_id.to_string());
        self.chosen_section = None;
        self.seats.clear();

        match self.policy {
            SectionPolicy::Require => {
                self.stage = Stage::Section;
                self.sections.clear();
                Ok(self.mint(FetchKey::Sections {
                    show_id: self.show_id,
                    zone_id: zone_id.to_string(),
                }))
            }
            SectionPolicy::Skip => {
                self.stage = Stage::Seats;
                Ok(self.mint(FetchKey::Seats(SeatQuery {
                    show_id: self.show_id,
                    zone_id: zone_id.to_string(),
                    section_id: None,
                })))
            }
        }
    }

    /// Choose a section of the chosen zone. Also valid while already in the
    /// Seats stage, which is what a fast second click amounts to; switching
    /// sections drops the old section's selections.
    pub fn select_section(
        &mut self,
        section_id: &str,
        cart: &mut CartStore,
    ) -> Result<FetchTicket, WizardError> {
        if self.policy == SectionPolicy::Skip || self.stage == Stage::Zone {
            return Err(WizardError::WrongStage(self.stage));
        }
        let zone_id = match &self.chosen_zone {
            Some(z) => z.clone(),
            None => return Err(WizardError::WrongStage(self.stage)),
        };
        if !self
            .sections
            .iter()
            .any(|s| s.id == section_id && s.zone_id == zone_id)
        {
            return Err(WizardError::InvalidSection(section_id.to_string()));
        }
        if self.chosen_section.as_deref() != Some(section_id) {
            cart.clear_seats();
        }
        self.chosen_section = Some(section_id.to_string());
        self.stage = Stage::Seats;
        self.seats.clear();
        Ok(self.mint(FetchKey::Seats(SeatQuery {
            show_id: self.show_id,
            zone_id,
            section_id: Some(section_id.to_string()),
        })))
    }

    /// Toggle a seat in or out of the cart. Booked seats are swallowed
    /// (`Ignored`); an id outside the current seat list is a contract
    /// violation.
    pub fn toggle_seat(
        &mut self,
        seat_id: SeatId,
        cart: &mut CartStore,
    ) -> Result<ToggleOutcome, WizardError> {
        if self.stage != Stage::Seats {
            return Err(WizardError::WrongStage(self.stage));
        }
        let seat = self
            .seats
            .iter()
            .find(|s| s.id == seat_id)
            .ok_or(WizardError::UnknownSeat(seat_id))?;
        if !seat.is_available() {
            return Ok(ToggleOutcome::Ignored);
        }
        if cart.contains(seat_id) {
            cart.remove_seat(seat_id);
            Ok(ToggleOutcome::Removed)
        } else {
            cart.add_seat(seat.clone());
            Ok(ToggleOutcome::Added)
        }
    }

    /// Step back one stage. Always clears the seat selection and the choice
    /// being abandoned; any in-flight fetch is invalidated.
    pub fn go_back(&mut self, cart: &mut CartStore) -> Stage {
        self.epoch += 1;
        self.pending = None;
        self.failure = None;
        match self.stage {
            Stage::Zone => {}
            Stage::Section => {
                cart.clear_seats();
                self.chosen_zone = None;
                self.sections.clear();
                self.stage = Stage::Zone;
            }
            Stage::Seats => {
                cart.clear_seats();
                self.seats.clear();
                self.chosen_section = None;
                match self.policy {
                    SectionPolicy::Require => self.stage = Stage::Section,
                    SectionPolicy::Skip => {
                        self.chosen_zone = None;
                        self.stage = Stage::Zone;
                    }
                }
            }
        }
        self.stage
    }

    /// Re-issue the seat fetch for the current selection (retry after a
    /// failed submit, or any caller-driven refresh).
    pub fn refresh_seats(&mut self) -> Result<FetchTicket, WizardError> {
        if self.stage != Stage::Seats {
            return Err(WizardError::WrongStage(self.stage));
        }
        let zone_id = match &self.chosen_zone {
            Some(z) => z.clone(),
            None => return Err(WizardError::WrongStage(self.stage)),
        };
        Ok(self.mint(FetchKey::Seats(SeatQuery {
            show_id: self.show_id,
            zone_id,
            section_id: self.chosen_section.clone(),
        })))
    }

    /// Re-issue the fetch recorded by a stage-local failure, if any.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        let failure = self.failure.take()?;
        Some(self.mint(failure.key))
    }

    pub fn price_table(&self) -> PriceTable {
        PriceTable::from_zones(&self.zones)
    }

    /// Total over the cart, derived from the currently loaded zone prices.
    pub fn compute_total(&self, cart: &CartStore) -> Result<i32, WizardError> {
        Ok(self.price_table().total_for(cart.seats())?)
    }

    /// Freeze the cart into the snapshot handed to checkout.
    pub fn checkout_snapshot(&self, cart: &CartStore) -> Result<CartSnapshot, WizardError> {
        if self.stage != Stage::Seats {
            return Err(WizardError::WrongStage(self.stage));
        }
        if cart.is_empty() {
            return Err(WizardError::EmptySelection);
        }
        let zone_id = match &self.chosen_zone {
            Some(z) => z.clone(),
            None => return Err(WizardError::WrongStage(self.stage)),
        };
        Ok(CartSnapshot {
            show_id: self.show_id,
            zone_id,
            seat_ids: cart.seat_ids(),
            total: self.compute_total(cart)?,
        })
    }

    pub fn show_id(&self) -> ShowId {
        self.show_id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn chosen_zone(&self) -> Option<&str> {
        self.chosen_zone.as_deref()
    }

    pub fn chosen_section(&self) -> Option<&str> {
        self.chosen_section.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn failure(&self) -> Option<&StageFailure> {
        self.failure.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovation_catalog::{SeatStatus, StagePosition};

    const SHOW: ShowId = 1;

    fn zone(id: &str, price: i32) -> Zone {
        Zone {
            id: id.to_string(),
            show_id: SHOW,
            name: format!("Zone {}", id),
            unit_price: price,
            capacity: 90,
        }
    }

    fn section(id: &str, zone_id: &str) -> Section {
        Section {
            id: id.to_string(),
            zone_id: zone_id.to_string(),
            label: format!("Section {}", id),
            position: StagePosition::Center,
        }
    }

    fn seat(id: SeatId, zone_id: &str, section_id: &str, status: SeatStatus) -> Seat {
        Seat {
            id,
            show_id: SHOW,
            zone_id: zone_id.to_string(),
            section_id: section_id.to_string(),
            row: "A".to_string(),
            number: id,
            status,
        }
    }

    fn zones_ab() -> Vec<Zone> {
        vec![zone("A", 3000), zone("B", 1500)]
    }

    /// Drive a wizard into the Seats stage of zone A / section A1 with the
    /// given seat list.
    fn at_seats(cart: &mut CartStore, seats: Vec<Seat>) -> SeatWizard {
        let mut wizard = SeatWizard::new(SHOW, SectionPolicy::Require);
        cart.set_show(SHOW);

        let t = wizard.begin();
        assert!(wizard.zones_loaded(&t, Ok(zones_ab())));

        let t = wizard.select_zone("A", cart).unwrap();
        assert!(wizard.sections_loaded(&t, Ok(vec![section("A1", "A"), section("A2", "A")])));

        let t = wizard.select_section("A1", cart).unwrap();
        assert!(wizard.seats_loaded(&t, Ok(seats), cart));
        wizard
    }

    #[test]
    fn test_scenario_a_toggle_and_total() {
        let mut cart = CartStore::new();
        let mut wizard = at_seats(
            &mut cart,
            vec![
                seat(1, "A", "A1", SeatStatus::Available),
                seat(2, "A", "A1", SeatStatus::Booked),
            ],
        );

        assert_eq!(wizard.toggle_seat(1, &mut cart).unwrap(), ToggleOutcome::Added);
        assert_eq!(wizard.toggle_seat(2, &mut cart).unwrap(), ToggleOutcome::Ignored);
        assert_eq!(cart.seat_ids(), vec![1]);
        assert_eq!(wizard.compute_total(&cart).unwrap(), 3000);

        let snapshot = wizard.checkout_snapshot(&cart).unwrap();
        assert_eq!(snapshot.zone_id, "A");
        assert_eq!(snapshot.seat_ids, vec![1]);
        assert_eq!(snapshot.total, 3000);
    }

    #[test]
    fn test_scenario_b_zone_switch_clears_selection() {
        let mut cart = CartStore::new();
        let mut wizard = at_seats(&mut cart, vec![seat(1, "A", "A1", SeatStatus::Available)]);
        wizard.toggle_seat(1, &mut cart).unwrap();
        assert_eq!(cart.len(), 1);

        wizard.select_zone("B", &mut cart).unwrap();
        assert!(cart.is_empty());
        assert_eq!(wizard.stage(), Stage::Section);
        assert_eq!(wizard.chosen_zone(), Some("B"));
        assert_eq!(wizard.chosen_section(), None);
    }

    #[test]
    fn test_scenario_c_empty_submit_is_blocked() {
        let mut cart = CartStore::new();
        let wizard = at_seats(&mut cart, vec![seat(1, "A", "A1", SeatStatus::Available)]);

        let err = wizard.checkout_snapshot(&cart).unwrap_err();
        assert!(matches!(err, WizardError::EmptySelection));
    }

    #[test]
    fn test_scenario_d_stale_seat_response_is_discarded() {
        let mut cart = CartStore::new();
        let mut wizard = SeatWizard::new(SHOW, SectionPolicy::Require);
        cart.set_show(SHOW);

        let t = wizard.begin();
        wizard.zones_loaded(&t, Ok(zones_ab()));
        let t = wizard.select_zone("A", &mut cart).unwrap();
        wizard.sections_loaded(&t, Ok(vec![section("A1", "A"), section("A2", "A")]));

        // Two fast clicks: A1, then A2 before A1's seats arrive.
        let t_a1 = wizard.select_section("A1", &mut cart).unwrap();
        let t_a2 = wizard.select_section("A2", &mut cart).unwrap();

        let a1_seats = vec![seat(1, "A", "A1", SeatStatus::Available)];
        let a2_seats = vec![seat(9, "A", "A2", SeatStatus::Available)];

        // A1's response lands late and must not become the shown list.
        assert!(!wizard.seats_loaded(&t_a1, Ok(a1_seats), &mut cart));
        assert!(wizard.seats_loaded(&t_a2, Ok(a2_seats), &mut cart));

        assert_eq!(wizard.seats().len(), 1);
        assert_eq!(wizard.seats()[0].id, 9);
        assert_eq!(wizard.chosen_section(), Some("A2"));
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut cart = CartStore::new();
        let mut wizard = at_seats(&mut cart, vec![seat(1, "A", "A1", SeatStatus::Available)]);

        assert_eq!(wizard.toggle_seat(1, &mut cart).unwrap(), ToggleOutcome::Added);
        assert_eq!(wizard.toggle_seat(1, &mut cart).unwrap(), ToggleOutcome::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_back_navigation_clears_and_reentry_refetches() {
        let mut cart = CartStore::new();
        let mut wizard = at_seats(&mut cart, vec![seat(1, "A", "A1", SeatStatus::Available)]);
        wizard.toggle_seat(1, &mut cart).unwrap();
        assert_eq!(cart.len(), 1);

        assert_eq!(wizard.go_back(&mut cart), Stage::Section);
        assert!(cart.is_empty());
        assert_eq!(wizard.chosen_section(), None);

        // Re-entering the same section issues a fresh fetch and starts with
        // zero selected seats.
        let t = wizard.select_section("A1", &mut cart).unwrap();
        assert!(matches!(
            &t.key,
            FetchKey::Seats(q) if q.section_id.as_deref() == Some("A1")
        ));
        assert!(wizard.is_loading());
        assert!(cart.is_empty());

        assert_eq!(wizard.go_back(&mut cart), Stage::Section);
        assert_eq!(wizard.go_back(&mut cart), Stage::Zone);
        assert_eq!(wizard.chosen_zone(), None);
    }

    #[test]
    fn test_contract_violations_fail_loudly() {
        let mut cart = CartStore::new();
        let mut wizard = SeatWizard::new(SHOW, SectionPolicy::Require);
        cart.set_show(SHOW);

        // Zone list not loaded yet.
        assert!(matches!(
            wizard.select_zone("A", &mut cart),
            Err(WizardError::InvalidZone(_))
        ));

        let t = wizard.begin();
        wizard.zones_loaded(&t, Ok(zones_ab()));
        assert!(matches!(
            wizard.select_zone("Z", &mut cart),
            Err(WizardError::InvalidZone(_))
        ));

        // Section stage guards.
        assert!(matches!(
            wizard.select_section("A1", &mut cart),
            Err(WizardError::WrongStage(Stage::Zone))
        ));
        let t = wizard.select_zone("A", &mut cart).unwrap();
        wizard.sections_loaded(&t, Ok(vec![section("A1", "A")]));
        assert!(matches!(
            wizard.select_section("B1", &mut cart),
            Err(WizardError::InvalidSection(_))
        ));
        assert!(matches!(
            wizard.toggle_seat(1, &mut cart),
            Err(WizardError::WrongStage(Stage::Section))
        ));

        let t = wizard.select_section("A1", &mut cart).unwrap();
        wizard.seats_loaded(&t, Ok(vec![seat(1, "A", "A1", SeatStatus::Available)]), &mut cart);
        assert!(matches!(
            wizard.toggle_seat(99, &mut cart),
            Err(WizardError::UnknownSeat(99))
        ));
    }

    #[test]
    fn test_fetch_failure_is_stage_local_and_retryable() {
        let mut cart = CartStore::new();
        let mut wizard = SeatWizard::new(SHOW, SectionPolicy::Require);
        cart.set_show(SHOW);

        let t = wizard.begin();
        wizard.zones_loaded(&t, Err(CatalogError::Unavailable("boom".into())));
        assert!(wizard.failure().is_some());
        assert!(!wizard.is_loading());

        let retry = wizard.retry().unwrap();
        assert!(matches!(retry.key, FetchKey::Zones { show_id: SHOW }));
        assert!(wizard.zones_loaded(&retry, Ok(zones_ab())));
        assert!(wizard.failure().is_none());
        assert_eq!(wizard.zones().len(), 2);
    }

    #[test]
    fn test_refreshed_seats_prune_raced_selections() {
        let mut cart = CartStore::new();
        let mut wizard = at_seats(
            &mut cart,
            vec![
                seat(1, "A", "A1", SeatStatus::Available),
                seat(2, "A", "A1", SeatStatus::Available),
            ],
        );
        wizard.toggle_seat(1, &mut cart).unwrap();
        wizard.toggle_seat(2, &mut cart).unwrap();

        // Seat 1 got booked elsewhere; the refreshed list drops it from the
        // cart while seat 2 survives.
        let t = wizard.refresh_seats().unwrap();
        let refreshed = vec![
            seat(1, "A", "A1", SeatStatus::Booked),
            seat(2, "A", "A1", SeatStatus::Available),
        ];
        assert!(wizard.seats_loaded(&t, Ok(refreshed), &mut cart));
        assert_eq!(cart.seat_ids(), vec![2]);
    }

    #[test]
    fn test_section_skip_policy_goes_straight_to_seats() {
        let mut cart = CartStore::new();
        let mut wizard = SeatWizard::new(SHOW, SectionPolicy::Skip);
        cart.set_show(SHOW);

        let t = wizard.begin();
        wizard.zones_loaded(&t, Ok(zones_ab()));

        let t = wizard.select_zone("A", &mut cart).unwrap();
        assert_eq!(wizard.stage(), Stage::Seats);
        assert!(matches!(&t.key, FetchKey::Seats(q) if q.section_id.is_none()));

        wizard.seats_loaded(&t, Ok(vec![seat(1, "A", "A1", SeatStatus::Available)]), &mut cart);
        wizard.toggle_seat(1, &mut cart).unwrap();

        assert!(matches!(
            wizard.select_section("A1", &mut cart),
            Err(WizardError::WrongStage(Stage::Seats))
        ));

        assert_eq!(wizard.go_back(&mut cart), Stage::Zone);
        assert!(cart.is_empty());
    }
}
