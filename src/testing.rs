//! In-memory host used by the unit and property tests

use crate::command::Command;
use crate::geometry::{Direction, Point};
use crate::host::{
    CharacterState, CommandHost, CommandOutcome, CommonEvent, EventInfo, EventPage, Inventory,
    ItemData, MapHost, MovementRouteHost, PageConditions, SelfScopeStore, SoundEffect,
    VariableHost,
};
use crate::interpreter::TreasureKind;
use crate::scope::{EntityRef, SelfScopeKey, SelfSwitchTable};
use crate::trigger::TriggerKind;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Command code the test host records instead of executing
pub const MARKER: u16 = 900;

pub fn marker(id: i32, indent: u32) -> Command {
    Command::new(MARKER, indent, vec![serde_json::json!(id)])
}

/// A single loaded map with its party, database and global tables
#[derive(Debug, Clone)]
pub struct TestWorld {
    pub map_id: i32,
    pub player: CharacterState,
    pub followers: Vec<Point>,
    pub events: BTreeMap<i32, EventInfo>,
    pub map_names: HashMap<String, i32>,
    pub remote_maps: HashMap<i32, Vec<EventInfo>>,
    pub common_events: BTreeMap<i32, CommonEvent>,
    pub switches: HashMap<i32, bool>,
    pub variables: HashMap<i32, i32>,
    pub self_switches: SelfSwitchTable,
    pub items: BTreeMap<(TreasureKind, i32), ItemData>,
    pub inventory: HashMap<(TreasureKind, i32), i32>,
    pub max_items: i32,
    pub gold: i32,
    pub max_gold: i32,
    pub event_running: bool,
    pub started_events: Vec<i32>,
    pub reserved_common_events: Vec<i32>,
    /// Marker ids in execution order, with the scope they ran under
    pub markers: Vec<(i32, EntityRef)>,
    /// Other host commands executed, by code
    pub executed: Vec<u16>,
    pub wait_on_marker: Option<i32>,
    /// Answer for conditional branches the plugin leaves to the host
    pub condition_result: bool,
}

impl TestWorld {
    pub fn new(map_id: i32) -> Self {
        Self {
            map_id,
            player: CharacterState::default(),
            followers: Vec::new(),
            events: BTreeMap::new(),
            map_names: HashMap::new(),
            remote_maps: HashMap::new(),
            common_events: BTreeMap::new(),
            switches: HashMap::new(),
            variables: HashMap::new(),
            self_switches: SelfSwitchTable::default(),
            items: BTreeMap::new(),
            inventory: HashMap::new(),
            max_items: 99,
            gold: 0,
            max_gold: 99_999_999,
            event_running: false,
            started_events: Vec::new(),
            reserved_common_events: Vec::new(),
            markers: Vec::new(),
            executed: Vec::new(),
            wait_on_marker: None,
            condition_result: true,
        }
    }

    pub fn add_event(&mut self, id: i32, name: &str, note: &str, position: Point) {
        self.add_event_with_page(id, name, note, position, Vec::new(), TriggerKind::ActionButton);
    }

    pub fn add_event_with_page(
        &mut self,
        id: i32,
        name: &str,
        note: &str,
        position: Point,
        list: Vec<Command>,
        trigger: TriggerKind,
    ) {
        self.events.insert(
            id,
            EventInfo {
                id,
                name: name.to_string(),
                note: note.to_string(),
                position,
                direction: Direction::Down,
                erased: false,
                page: Some(EventPage {
                    list: list.into(),
                    trigger,
                    conditions: PageConditions::default(),
                }),
            },
        );
    }

    pub fn add_remote_event(&mut self, map_id: i32, map_name: &str, id: i32, name: &str, position: Point) {
        self.map_names.insert(map_name.to_string(), map_id);
        self.remote_maps.entry(map_id).or_default().push(EventInfo {
            id,
            name: name.to_string(),
            note: String::new(),
            position,
            direction: Direction::Down,
            erased: false,
            page: None,
        });
    }

    pub fn add_common_event(&mut self, id: i32, list: Vec<Command>, trigger: TriggerKind) {
        self.common_events.insert(
            id,
            CommonEvent {
                id,
                name: format!("Common {}", id),
                trigger,
                list: Arc::from(list),
            },
        );
    }

    pub fn erase_event_now(&mut self, id: i32) {
        if let Some(event) = self.events.get_mut(&id) {
            event.erased = true;
        }
    }

    pub fn add_item(&mut self, kind: TreasureKind, id: i32, name: &str, icon_index: i32) {
        self.items.insert(
            (kind, id),
            ItemData {
                id,
                kind,
                name: name.to_string(),
                icon_index,
            },
        );
    }

    pub fn item_count(&self, kind: TreasureKind, id: i32) -> i32 {
        self.inventory.get(&(kind, id)).copied().unwrap_or(0)
    }

    pub fn set_item_count(&mut self, kind: TreasureKind, id: i32, count: i32) {
        self.inventory.insert((kind, id), count);
    }

    pub fn executed_markers(&self) -> Vec<i32> {
        self.markers.iter().map(|(id, _)| *id).collect()
    }
}

impl MapHost for TestWorld {
    fn map_id(&self) -> i32 {
        self.map_id
    }

    fn map_id_by_name(&self, name: &str) -> Option<i32> {
        self.map_names.get(name).copied()
    }

    fn events(&self) -> Vec<EventInfo> {
        self.events.values().cloned().collect()
    }

    fn event(&self, event_id: i32) -> Option<EventInfo> {
        self.events.get(&event_id).cloned()
    }

    fn load_map_events(&self, map_id: i32) -> Option<Vec<EventInfo>> {
        self.remote_maps.get(&map_id).cloned()
    }

    fn player(&self) -> CharacterState {
        self.player
    }

    fn follower_positions(&self) -> Vec<Point> {
        self.followers.clone()
    }

    fn is_event_running(&self) -> bool {
        self.event_running
    }

    fn start_event(&mut self, event_id: i32) {
        self.started_events.push(event_id);
    }

    fn erase_event(&mut self, event_id: i32) {
        self.erase_event_now(event_id);
    }

    fn common_events(&self) -> Vec<CommonEvent> {
        self.common_events.values().cloned().collect()
    }

    fn common_event(&self, common_event_id: i32) -> Option<CommonEvent> {
        self.common_events.get(&common_event_id).cloned()
    }

    fn reserve_common_event(&mut self, common_event_id: i32) {
        self.reserved_common_events.push(common_event_id);
    }
}

impl SelfScopeStore for TestWorld {
    fn self_switch(&self, key: &SelfScopeKey) -> bool {
        self.self_switches.self_switch(key)
    }

    fn set_self_switch(&mut self, key: SelfScopeKey, value: bool) {
        self.self_switches.set_self_switch(key, value);
    }
}

impl VariableHost for TestWorld {
    fn switch(&self, switch_id: i32) -> bool {
        self.switches.get(&switch_id).copied().unwrap_or(false)
    }

    fn set_switch(&mut self, switch_id: i32, value: bool) {
        self.switches.insert(switch_id, value);
    }

    fn variable(&self, variable_id: i32) -> i32 {
        self.variables.get(&variable_id).copied().unwrap_or(0)
    }

    fn set_variable(&mut self, variable_id: i32, value: i32) {
        self.variables.insert(variable_id, value);
    }

    /// Switch and variable conditions only
    fn meets_conditions(&self, conditions: &PageConditions) -> bool {
        if conditions.switch1_valid && !VariableHost::switch(self, conditions.switch1_id) {
            return false;
        }
        if conditions.switch2_valid && !VariableHost::switch(self, conditions.switch2_id) {
            return false;
        }
        if conditions.variable_valid
            && VariableHost::variable(self, conditions.variable_id) < conditions.variable_value
        {
            return false;
        }
        true
    }
}

impl Inventory for TestWorld {
    fn item(&self, kind: TreasureKind, id: i32) -> Option<ItemData> {
        self.items.get(&(kind, id)).cloned()
    }

    fn items(&self, kind: TreasureKind) -> Vec<ItemData> {
        self.items
            .values()
            .filter(|item| item.kind == kind)
            .cloned()
            .collect()
    }

    fn has_max_items(&self, item: &ItemData) -> bool {
        self.item_count(item.kind, item.id) >= self.max_items
    }

    fn gain_item(&mut self, item: &ItemData, amount: i32) {
        let count = (self.item_count(item.kind, item.id) + amount).clamp(0, self.max_items);
        self.inventory.insert((item.kind, item.id), count);
    }

    fn gold(&self) -> i32 {
        self.gold
    }

    fn max_gold(&self) -> i32 {
        self.max_gold
    }

    fn gain_gold(&mut self, amount: i32) {
        self.gold = (self.gold + amount).clamp(0, self.max_gold);
    }

    fn currency_unit(&self) -> String {
        "G".to_string()
    }
}

impl CommandHost for TestWorld {
    fn evaluate_condition(&mut self, _command: &Command, _scope: EntityRef) -> bool {
        self.condition_result
    }

    fn execute_command(&mut self, command: &Command, scope: EntityRef) -> CommandOutcome {
        if command.code != MARKER {
            self.executed.push(command.code);
            return CommandOutcome::Continue;
        }
        let id = command.int_param(0).unwrap_or(0);
        self.markers.push((id, scope));
        if self.wait_on_marker == Some(id) {
            CommandOutcome::Wait
        } else {
            CommandOutcome::Continue
        }
    }
}

/// One character running a move route
#[derive(Debug, Clone, Default)]
pub struct RouteActor {
    pub character: CharacterState,
    pub player: CharacterState,
    pub switches: HashMap<i32, bool>,
    pub variables: HashMap<i32, i32>,
    pub self_switches: HashMap<char, bool>,
    pub sounds: Vec<SoundEffect>,
    pub balloons: Vec<i32>,
}

impl MovementRouteHost for RouteActor {
    fn character(&self) -> CharacterState {
        self.character
    }

    fn player(&self) -> CharacterState {
        self.player
    }

    fn switch(&self, switch_id: i32) -> bool {
        self.switches.get(&switch_id).copied().unwrap_or(false)
    }

    fn variable(&self, variable_id: i32) -> i32 {
        self.variables.get(&variable_id).copied().unwrap_or(0)
    }

    fn self_switch(&self, letter: char) -> bool {
        self.self_switches.get(&letter).copied().unwrap_or(false)
    }

    fn play_se(&mut self, sound: &SoundEffect) {
        self.sounds.push(sound.clone());
    }

    fn request_balloon(&mut self, balloon_id: i32) {
        self.balloons.push(balloon_id);
    }
}
