//! Per-map cache of classified triggers

use crate::host::{EventInfo, MapHost, TriggerOwner};
use crate::trigger::{effective_trigger, find_custom_trigger, TriggerKind};
use ahash::AHashMap;

/// Triggers of the current map's events and of custom-triggered common events
///
/// Classification happens when a page is set up, never per frame.
#[derive(Debug, Clone, Default)]
pub struct TriggerCatalog {
    map_id: i32,
    events: AHashMap<i32, TriggerKind>,
    common_events: Vec<(i32, TriggerKind)>,
}

impl TriggerCatalog {
    /// Classify every event and common event for the map now loaded
    pub fn rebuild<H: MapHost + ?Sized>(&mut self, host: &H, plugin_name: &str) {
        self.map_id = host.map_id();
        self.events.clear();
        for event in host.events() {
            self.refresh_event(&event, plugin_name);
        }
        self.common_events = host
            .common_events()
            .iter()
            .filter_map(|common| {
                find_custom_trigger(common.commands(), plugin_name).map(|kind| (common.id, kind))
            })
            .collect();
    }

    /// Re-classify one event after its active page changed
    pub fn refresh_event(&mut self, event: &EventInfo, plugin_name: &str) {
        match &event.page {
            Some(page) if !event.erased => {
                self.events
                    .insert(event.id, effective_trigger(page, plugin_name));
            }
            _ => {
                self.events.remove(&event.id);
            }
        }
    }

    pub fn map_id(&self) -> i32 {
        self.map_id
    }

    pub fn trigger_of(&self, event_id: i32) -> Option<TriggerKind> {
        self.events.get(&event_id).copied()
    }

    /// Event ids with a matching trigger, in ascending id order
    pub fn events_where(&self, predicate: impl Fn(&TriggerKind) -> bool) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .events
            .iter()
            .filter(|(_, kind)| predicate(kind))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn common_events_where(&self, predicate: impl Fn(&TriggerKind) -> bool) -> Vec<i32> {
        self.common_events
            .iter()
            .filter(|(_, kind)| predicate(kind))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn region_entry_events(&self, region_id: Option<u8>) -> Vec<i32> {
        self.events_where(|kind| kind.is_region_entry(region_id))
    }

    pub fn region_entry_common_events(&self, region_id: Option<u8>) -> Vec<i32> {
        self.common_events_where(|kind| kind.is_region_entry(region_id))
    }
}
