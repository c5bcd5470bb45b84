//! Plain data the host hands to the plugin

use crate::command::Command;
use crate::geometry::{Direction, Point};
use crate::interpreter::TreasureKind;
use crate::trigger::TriggerKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Activation conditions of an event page, in the host's serialized shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConditions {
    pub switch1_valid: bool,
    pub switch1_id: i32,
    pub switch2_valid: bool,
    pub switch2_id: i32,
    pub variable_valid: bool,
    pub variable_id: i32,
    pub variable_value: i32,
    pub self_switch_valid: bool,
    pub self_switch_ch: String,
    pub item_valid: bool,
    pub item_id: i32,
    pub actor_valid: bool,
    pub actor_id: i32,
}

/// The active page of an event
#[derive(Debug, Clone)]
pub struct EventPage {
    pub list: Arc<[Command]>,
    /// Trigger chosen in the editor
    pub trigger: TriggerKind,
    pub conditions: PageConditions,
}

/// A map event as seen by the plugin
#[derive(Debug, Clone)]
pub struct EventInfo {
    pub id: i32,
    pub name: String,
    pub note: String,
    pub position: Point,
    pub direction: Direction,
    pub erased: bool,
    /// `None` when no page's conditions are met
    pub page: Option<EventPage>,
}

/// A database common event
#[derive(Debug, Clone)]
pub struct CommonEvent {
    pub id: i32,
    pub name: String,
    pub trigger: TriggerKind,
    pub list: Arc<[Command]>,
}

/// Position state of the player or any other character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterState {
    pub position: Point,
    pub direction: Direction,
    pub region_id: u8,
}

impl CharacterState {
    pub fn new(position: Point, direction: Direction, region_id: u8) -> Self {
        Self {
            position,
            direction,
            region_id,
        }
    }
}

/// A database entry that can be given as treasure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: i32,
    pub kind: TreasureKind,
    pub name: String,
    pub icon_index: i32,
}

/// Sound effect request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundEffect {
    pub name: String,
    pub volume: u32,
    pub pitch: u32,
    #[serde(default)]
    pub pan: i32,
}

impl SoundEffect {
    pub fn new(name: impl Into<String>, volume: u32, pitch: u32) -> Self {
        Self {
            name: name.into(),
            volume,
            pitch,
            pan: 0,
        }
    }
}
