//! Starting region-entry, party-touch and map-setup events

use crate::geometry::Point;
use crate::host::MapHost;
use crate::session::MoveRouteBehavior;
use crate::trigger::{TriggerCatalog, TriggerKind};
use tracing::debug;

/// Remembers the player's region between tile arrivals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionTracker {
    last_region: Option<u8>,
}

impl RegionTracker {
    /// Seed the tracker without firing, e.g. after a transfer or on new game
    pub fn reset(&mut self, region_id: u8) {
        self.last_region = Some(region_id);
    }

    pub fn last_region(&self) -> Option<u8> {
        self.last_region
    }

    /// Record `region_id` and report whether it differs from the last one seen
    ///
    /// An unseeded tracker records without reporting a change.
    pub fn check_region_change(&mut self, region_id: u8) -> bool {
        let changed = matches!(self.last_region, Some(last) if last != region_id);
        self.last_region = Some(region_id);
        changed
    }
}

/// Hook for the player finishing a step
///
/// Returns how many events and common events were started.
pub fn on_player_arrival<H: MapHost + ?Sized>(
    tracker: &mut RegionTracker,
    catalog: &TriggerCatalog,
    host: &mut H,
    was_moving: bool,
) -> usize {
    if !was_moving || host.is_event_running() {
        return 0;
    }
    let region_id = host.player().region_id;
    if !tracker.check_region_change(region_id) {
        return 0;
    }
    start_region_entry(catalog, host, region_id)
}

/// Start every region-entry event and common event for `region_id`
pub fn start_region_entry<H: MapHost + ?Sized>(
    catalog: &TriggerCatalog,
    host: &mut H,
    region_id: u8,
) -> usize {
    if host.is_event_running() {
        return 0;
    }
    let events = catalog.region_entry_events(Some(region_id));
    let common_events = catalog.region_entry_common_events(Some(region_id));
    for event_id in &events {
        host.start_event(*event_id);
    }
    for common_event_id in &common_events {
        host.reserve_common_event(*common_event_id);
    }
    let started = events.len() + common_events.len();
    if started > 0 {
        debug!(region_id, started, "region entry triggered");
    }
    started
}

/// Start map-setup events and common events; run once per map load
pub fn start_map_setup<H: MapHost + ?Sized>(catalog: &TriggerCatalog, host: &mut H) -> usize {
    let events = catalog.events_where(|kind| *kind == TriggerKind::MapSetup);
    let common_events = catalog.common_events_where(|kind| *kind == TriggerKind::MapSetup);
    for event_id in &events {
        host.start_event(*event_id);
    }
    for common_event_id in &common_events {
        host.reserve_common_event(*common_event_id);
    }
    events.len() + common_events.len()
}

fn party_positions<H: MapHost + ?Sized>(host: &H) -> Vec<Point> {
    let mut positions = vec![host.player().position];
    positions.extend(host.follower_positions());
    positions
}

/// Hook for the player or a follower arriving at a tile
///
/// Starts party-touch events standing on any party member's tile.
pub fn check_party_touch_here<H: MapHost + ?Sized>(
    catalog: &TriggerCatalog,
    host: &mut H,
    behavior: MoveRouteBehavior,
) -> Vec<i32> {
    if behavior == MoveRouteBehavior::IgnorePlayer || host.is_event_running() {
        return Vec::new();
    }
    let positions = party_positions(host);
    let candidates = catalog.events_where(|kind| *kind == TriggerKind::PartyTouch);
    let touched: Vec<i32> = candidates
        .into_iter()
        .filter(|event_id| {
            host.event(*event_id)
                .is_some_and(|event| !event.erased && positions.contains(&event.position))
        })
        .collect();
    for event_id in &touched {
        host.start_event(*event_id);
    }
    touched
}

/// Hook for an event attempting to move onto `target`
///
/// Returns whether the event was started by touching the party.
pub fn check_event_touch<H: MapHost + ?Sized>(
    catalog: &TriggerCatalog,
    host: &mut H,
    behavior: MoveRouteBehavior,
    event_id: i32,
    target: Point,
) -> bool {
    if behavior == MoveRouteBehavior::IgnorePlayer || host.is_event_running() {
        return false;
    }
    if catalog.trigger_of(event_id) != Some(TriggerKind::PartyTouch) {
        return false;
    }
    if !party_positions(host).contains(&target) {
        return false;
    }
    debug!(event_id, "party touch triggered");
    host.start_event(event_id);
    true
}
