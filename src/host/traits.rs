//! Host capability traits

use crate::command::Command;
use crate::geometry::Point;
use crate::host::{CharacterState, CommonEvent, EventInfo, EventPage, ItemData, PageConditions, SoundEffect};
use crate::interpreter::TreasureKind;
use crate::scope::{EntityRef, SelfScopeKey};
use crate::trigger::TriggerKind;

/// Anything that owns a command list and carries an activation trigger
pub trait TriggerOwner {
    fn commands(&self) -> &[Command];

    /// Trigger as configured in the host, before any plugin override
    fn base_trigger(&self) -> TriggerKind;
}

impl TriggerOwner for EventPage {
    fn commands(&self) -> &[Command] {
        &self.list
    }

    fn base_trigger(&self) -> TriggerKind {
        self.trigger
    }
}

impl TriggerOwner for CommonEvent {
    fn commands(&self) -> &[Command] {
        &self.list
    }

    fn base_trigger(&self) -> TriggerKind {
        self.trigger
    }
}

/// Queries and actions against the currently loaded map
pub trait MapHost {
    fn map_id(&self) -> i32;

    fn map_id_by_name(&self, name: &str) -> Option<i32>;

    /// Every event on the current map, erased ones included
    fn events(&self) -> Vec<EventInfo>;

    fn event(&self, event_id: i32) -> Option<EventInfo>;

    /// Authored event data of another map, without loading it
    fn load_map_events(&self, map_id: i32) -> Option<Vec<EventInfo>>;

    fn player(&self) -> CharacterState;

    fn follower_positions(&self) -> Vec<Point>;

    /// Whether the map interpreter is busy with an event
    fn is_event_running(&self) -> bool;

    fn start_event(&mut self, event_id: i32);

    fn erase_event(&mut self, event_id: i32);

    fn common_events(&self) -> Vec<CommonEvent>;

    fn common_event(&self, common_event_id: i32) -> Option<CommonEvent>;

    fn reserve_common_event(&mut self, common_event_id: i32);
}

/// The host's keyed self-switch table
pub trait SelfScopeStore {
    fn self_switch(&self, key: &SelfScopeKey) -> bool;

    fn set_self_switch(&mut self, key: SelfScopeKey, value: bool);
}

/// Global switch and variable tables
pub trait VariableHost {
    fn switch(&self, switch_id: i32) -> bool;

    fn set_switch(&mut self, switch_id: i32, value: bool);

    fn variable(&self, variable_id: i32) -> i32;

    fn set_variable(&mut self, variable_id: i32, value: i32);

    /// The host's own page-condition check
    fn meets_conditions(&self, conditions: &PageConditions) -> bool;
}

/// Party inventory and item database
pub trait Inventory {
    fn item(&self, kind: TreasureKind, id: i32) -> Option<ItemData>;

    fn items(&self, kind: TreasureKind) -> Vec<ItemData>;

    fn has_max_items(&self, item: &ItemData) -> bool;

    fn gain_item(&mut self, item: &ItemData, amount: i32);

    fn gold(&self) -> i32;

    fn max_gold(&self) -> i32;

    fn gain_gold(&mut self, amount: i32);

    fn currency_unit(&self) -> String;
}

/// Outcome of a command executed by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    /// Stop for this frame and resume at the next command
    Wait,
}

/// Execution of commands the plugin does not handle itself
pub trait CommandHost {
    /// Evaluate a conditional branch the plugin does not intercept
    fn evaluate_condition(&mut self, command: &Command, scope: EntityRef) -> bool;

    fn execute_command(&mut self, command: &Command, scope: EntityRef) -> CommandOutcome;
}

/// Everything the interpreter needs from the host
pub trait GameHost: MapHost + SelfScopeStore + VariableHost + Inventory + CommandHost {}

impl<T> GameHost for T where T: MapHost + SelfScopeStore + VariableHost + Inventory + CommandHost {}

/// One character executing an autonomous move route
pub trait MovementRouteHost {
    fn character(&self) -> CharacterState;

    fn player(&self) -> CharacterState;

    fn switch(&self, switch_id: i32) -> bool;

    fn variable(&self, variable_id: i32) -> i32;

    /// Self switch of the character running the route
    fn self_switch(&self, letter: char) -> bool;

    fn play_se(&mut self, sound: &SoundEffect);

    fn request_balloon(&mut self, balloon_id: i32);
}
