//! Typed decoding of this plugin's commands

use crate::command::PluginCommand;
use crate::error::{EventAiError, Result};
use crate::geometry::Relativity;
use crate::interpreter::{TreasureKind, TreasureRequest};
use crate::link::{EventSelector, LinkRequest, MapSelector};
use crate::session::{MoveRouteBehavior, OriginRequest};
use serde::Deserialize;

pub const REGION_ENTRY: &str = "page_trigger_region_entry";
pub const PARTY_TOUCH: &str = "page_trigger_party_touch";
pub const FOLLOWER_TOUCH: &str = "page_trigger_follower_touch";
pub const MAP_SETUP: &str = "page_trigger_map_setup";
pub const TREASURE_ITEM: &str = "treasure_item";
pub const TREASURE_WEAPON: &str = "treasure_weapon";
pub const TREASURE_ARMOR: &str = "treasure_armor";
pub const TREASURE_GOLD: &str = "treasure_gold";
pub const TREASURE_BY_NAME: &str = "treasure_by_name";
pub const LINK_EVENT: &str = "link_event";
pub const UNLINK_EVENT: &str = "unlink_event";
pub const WEIGHT: &str = "weight";
pub const END_WEIGHT_BRANCHES: &str = "end_weight_branches";
pub const SET_NEW_ORIGIN: &str = "set_new_origin";
pub const GLOBAL_MOVE_ROUTE_BEHAVIOR: &str = "global_move_route_behavior";

/// A decoded command belonging to this plugin
#[derive(Debug, Clone, PartialEq)]
pub enum EventAiCommand {
    TriggerRegionEntry { region_id: u8 },
    TriggerPartyTouch,
    TriggerMapSetup,
    Treasure(TreasureRequest),
    LinkEvent(LinkRequest),
    UnlinkEvent,
    Weight(f64),
    EndWeightBranches,
    SetNewOrigin(OriginRequest),
    GlobalMoveRouteBehavior(MoveRouteBehavior),
}

impl EventAiCommand {
    /// Decode a plugin command already known to belong to this plugin
    ///
    /// Returns `Ok(None)` for command names this crate does not know.
    pub fn decode(command: &PluginCommand<'_>) -> Result<Option<Self>> {
        let decoded = match command.name {
            REGION_ENTRY => {
                let region_id = number(command, "region_id")?.unwrap_or(0u32);
                if !(1..=255).contains(&region_id) {
                    return Err(EventAiError::InvalidCommand(format!(
                        "region id out of range: {}",
                        region_id
                    )));
                }
                EventAiCommand::TriggerRegionEntry {
                    region_id: region_id as u8,
                }
            }
            PARTY_TOUCH | FOLLOWER_TOUCH => EventAiCommand::TriggerPartyTouch,
            MAP_SETUP => EventAiCommand::TriggerMapSetup,
            TREASURE_ITEM | TREASURE_WEAPON | TREASURE_ARMOR => {
                let kind = match command.name {
                    TREASURE_WEAPON => TreasureKind::Weapon,
                    TREASURE_ARMOR => TreasureKind::Armor,
                    _ => TreasureKind::Item,
                };
                let id = number(command, "id")?.ok_or_else(|| {
                    EventAiError::InvalidCommand(format!("{} requires an id", command.name))
                })?;
                EventAiCommand::Treasure(TreasureRequest::ById {
                    kind,
                    id,
                    quantity: quantity(command)?,
                })
            }
            TREASURE_GOLD => EventAiCommand::Treasure(TreasureRequest::Gold {
                amount: number(command, "amount")?.unwrap_or(0),
            }),
            TREASURE_BY_NAME => {
                let name = command.arg("name").ok_or_else(|| {
                    EventAiError::InvalidCommand("treasure by name requires a name".to_string())
                })?;
                EventAiCommand::Treasure(TreasureRequest::ByName {
                    name: name.to_string(),
                    quantity: quantity(command)?,
                })
            }
            LINK_EVENT => EventAiCommand::LinkEvent(LinkRequest {
                map: MapSelector::from_arg(command.arg("map")),
                event: EventSelector::from_arg(command.arg("event")),
                note: command.arg("note").map(str::to_string),
                location: command.arg("location").map(str::to_string),
                max_distance: number(command, "max_distance")?,
            }),
            UNLINK_EVENT => EventAiCommand::UnlinkEvent,
            WEIGHT => {
                let weight: f64 = number(command, "weight")?.unwrap_or(0.0);
                if !weight.is_finite() {
                    return Err(EventAiError::InvalidCommand(format!(
                        "weight is not a finite number: {}",
                        weight
                    )));
                }
                EventAiCommand::Weight(weight)
            }
            END_WEIGHT_BRANCHES => EventAiCommand::EndWeightBranches,
            SET_NEW_ORIGIN => EventAiCommand::SetNewOrigin(decode_origin(command)?),
            GLOBAL_MOVE_ROUTE_BEHAVIOR => {
                let mode = command.arg("mode").unwrap_or("normal");
                let behavior = MoveRouteBehavior::from_arg(mode).ok_or_else(|| {
                    EventAiError::InvalidCommand(format!("unknown move route behavior: {}", mode))
                })?;
                EventAiCommand::GlobalMoveRouteBehavior(behavior)
            }
            _ => return Ok(None),
        };
        Ok(Some(decoded))
    }
}

fn number<T: std::str::FromStr>(command: &PluginCommand<'_>, name: &str) -> Result<Option<T>> {
    command
        .number_arg(name)
        .map_err(EventAiError::InvalidCommand)
}

fn quantity(command: &PluginCommand<'_>) -> Result<i32> {
    Ok(number(command, "quantity")?.unwrap_or(1))
}

/// Location struct argument, serialized by the editor as a JSON string
#[derive(Debug, Default, Deserialize)]
struct LocationArg {
    #[serde(default)]
    x: String,
    #[serde(default)]
    y: String,
}

fn decode_origin(command: &PluginCommand<'_>) -> Result<OriginRequest> {
    let (x, y) = match command.arg("location") {
        Some(raw) => {
            let location: LocationArg = serde_json::from_str(raw)?;
            (parse_coord(&location.x, "x")?, parse_coord(&location.y, "y")?)
        }
        None => (
            number(command, "x")?.unwrap_or(0),
            number(command, "y")?.unwrap_or(0),
        ),
    };
    let relativity_arg = command.arg("relativity").unwrap_or("absolute");
    let relativity = Relativity::from_arg(relativity_arg).ok_or_else(|| {
        EventAiError::InvalidCommand(format!("unknown relativity: {}", relativity_arg))
    })?;
    Ok(OriginRequest {
        x,
        y,
        relativity,
        forward: number(command, "forward")?.unwrap_or(0),
        rightward: number(command, "rightward")?.unwrap_or(0),
    })
}

fn parse_coord(text: &str, axis: &str) -> Result<i32> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse().map_err(|_| {
        EventAiError::InvalidCommand(format!("location {} is not a number: {}", axis, text))
    })
}
