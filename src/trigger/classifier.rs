//! Trigger classification from a page's leading plugin commands

use crate::command::{codes, Command, EventAiCommand};
use crate::host::TriggerOwner;
use tracing::warn;

/// What starts an event page or common event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    ActionButton,
    PlayerTouch,
    EventTouch,
    Autorun,
    Parallel,
    /// The player steps into this region from a tile outside it
    RegionEntry { region_id: u8 },
    /// The event and the player or any follower touch
    PartyTouch,
    /// Runs once when the map is set up
    MapSetup,
}

impl TriggerKind {
    /// Map the host's numeric page trigger
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(TriggerKind::ActionButton),
            1 => Some(TriggerKind::PlayerTouch),
            2 => Some(TriggerKind::EventTouch),
            3 => Some(TriggerKind::Autorun),
            4 => Some(TriggerKind::Parallel),
            _ => None,
        }
    }

    /// Whether this is a plugin trigger rather than a host one
    pub fn is_custom(&self) -> bool {
        matches!(
            self,
            TriggerKind::RegionEntry { .. } | TriggerKind::PartyTouch | TriggerKind::MapSetup
        )
    }

    /// Region entry for `region_id`, or for any region when `None`
    pub fn is_region_entry(&self, region_id: Option<u8>) -> bool {
        match (self, region_id) {
            (TriggerKind::RegionEntry { .. }, None) => true,
            (TriggerKind::RegionEntry { region_id: own }, Some(wanted)) => *own == wanted,
            _ => false,
        }
    }
}

/// Scan the leading plugin commands of `list` for a trigger declaration
///
/// The scan stops at the first entry that is neither a plugin command of
/// `plugin_name` nor the argument text the editor stores after one. Returns
/// `None` when the host's own trigger should apply.
pub fn find_custom_trigger(list: &[Command], plugin_name: &str) -> Option<TriggerKind> {
    for command in list {
        if command.code == codes::PLUGIN_COMMAND_TEXT {
            continue;
        }
        let plugin = command.as_plugin_command()?;
        if plugin.plugin != plugin_name {
            return None;
        }
        match EventAiCommand::decode(&plugin) {
            Ok(Some(EventAiCommand::TriggerRegionEntry { region_id })) => {
                return Some(TriggerKind::RegionEntry { region_id });
            }
            Ok(Some(EventAiCommand::TriggerPartyTouch)) => return Some(TriggerKind::PartyTouch),
            Ok(Some(EventAiCommand::TriggerMapSetup)) => return Some(TriggerKind::MapSetup),
            Ok(_) => {}
            Err(err) => {
                warn!(command = plugin.name, %err, "ignoring malformed trigger command");
            }
        }
    }
    None
}

/// The trigger an owner actually uses: its plugin declaration if any, else the host's
pub fn effective_trigger<T: TriggerOwner + ?Sized>(owner: &T, plugin_name: &str) -> TriggerKind {
    find_custom_trigger(owner.commands(), plugin_name).unwrap_or_else(|| owner.base_trigger())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::plugin::{MAP_SETUP, PARTY_TOUCH, REGION_ENTRY, TREASURE_GOLD};
    use serde_json::json;

    const PLUGIN: &str = "EventAI";

    fn text(indent: u32) -> Command {
        Command::new(codes::PLUGIN_COMMAND_TEXT, indent, vec![json!("Region ID = 5")])
    }

    #[test]
    fn test_region_entry_declaration() {
        let list = vec![
            Command::plugin(PLUGIN, REGION_ENTRY, 0, &[("region_id", "5")]),
            text(0),
            Command::new(codes::END, 0, vec![]),
        ];
        assert_eq!(
            find_custom_trigger(&list, PLUGIN),
            Some(TriggerKind::RegionEntry { region_id: 5 })
        );
    }

    #[test]
    fn test_first_declaration_wins() {
        let list = vec![
            Command::plugin(PLUGIN, TREASURE_GOLD, 0, &[("amount", "5")]),
            Command::plugin(PLUGIN, MAP_SETUP, 0, &[]),
            Command::plugin(PLUGIN, PARTY_TOUCH, 0, &[]),
        ];
        assert_eq!(find_custom_trigger(&list, PLUGIN), Some(TriggerKind::MapSetup));
    }

    #[test]
    fn test_scan_stops_at_non_plugin_command() {
        let list = vec![
            Command::new(codes::SCRIPT, 0, vec![json!("1 + 1")]),
            Command::plugin(PLUGIN, PARTY_TOUCH, 0, &[]),
        ];
        assert_eq!(find_custom_trigger(&list, PLUGIN), None);
    }

    #[test]
    fn test_scan_stops_at_other_plugin() {
        let list = vec![
            Command::plugin("OtherPlugin", "anything", 0, &[]),
            Command::plugin(PLUGIN, PARTY_TOUCH, 0, &[]),
        ];
        assert_eq!(find_custom_trigger(&list, PLUGIN), None);
    }

    #[test]
    fn test_malformed_declaration_is_skipped() {
        let list = vec![
            Command::plugin(PLUGIN, REGION_ENTRY, 0, &[("region_id", "0")]),
            Command::plugin(PLUGIN, PARTY_TOUCH, 0, &[]),
        ];
        assert_eq!(find_custom_trigger(&list, PLUGIN), Some(TriggerKind::PartyTouch));
    }

    #[test]
    fn test_region_entry_matching() {
        let trigger = TriggerKind::RegionEntry { region_id: 3 };
        assert!(trigger.is_region_entry(Some(3)));
        assert!(trigger.is_region_entry(None));
        assert!(!trigger.is_region_entry(Some(4)));
        assert!(!TriggerKind::Autorun.is_region_entry(None));
    }
}
