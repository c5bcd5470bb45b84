//! The session context object

use crate::config::PluginConfig;
use crate::error::Result;
use crate::geometry::Point;
use crate::host::{
    EventInfo, Inventory, MapHost, MovementRouteHost, PageConditions, SelfScopeStore, VariableHost,
};
use crate::interpreter::{convert_treasure_text_codes, give_treasure, Treasure, TreasureRequest};
use crate::route::{CompiledRoute, RouteRunner, RouteStep};
use crate::scope::{self, EntityRef, SelfScopeRegistry, SelfVariableStore};
use crate::session::{EventOrigins, MoveRouteBehavior, OriginRequest, SaveData};
use crate::trigger::{self, RegionTracker, TriggerCatalog};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Plugin state for one running game
///
/// Created once at boot, reset by `new_game` and restored by `load`. Every
/// interpreter, route and hook receives it explicitly.
#[derive(Debug, Clone)]
pub struct EventAiSession {
    config: PluginConfig,
    registry: SelfScopeRegistry,
    self_variables: SelfVariableStore,
    origins: EventOrigins,
    last_treasure: Option<Treasure>,
    move_route_behavior: MoveRouteBehavior,
    triggers: TriggerCatalog,
    region_tracker: RegionTracker,
    rng: StdRng,
}

impl EventAiSession {
    pub fn new(config: PluginConfig, registry: SelfScopeRegistry) -> Self {
        Self::with_rng(config, registry, StdRng::from_entropy())
    }

    /// Deterministic session for replays and tests
    pub fn with_seed(config: PluginConfig, registry: SelfScopeRegistry, seed: u64) -> Self {
        Self::with_rng(config, registry, StdRng::seed_from_u64(seed))
    }

    /// Build the self-scope registry from the database's switch and variable names
    pub fn from_database<S: AsRef<str>>(
        config: PluginConfig,
        switch_names: &[S],
        variable_names: &[S],
    ) -> Self {
        let registry =
            SelfScopeRegistry::from_names(switch_names, variable_names, &config.self_scope_prefix);
        debug!(
            self_switches = registry.self_switch_count(),
            self_variables = registry.self_variable_count(),
            "self-scoped ids registered"
        );
        Self::new(config, registry)
    }

    fn with_rng(config: PluginConfig, registry: SelfScopeRegistry, rng: StdRng) -> Self {
        Self {
            move_route_behavior: config.move_route_behavior,
            config,
            registry,
            self_variables: SelfVariableStore::new(),
            origins: EventOrigins::default(),
            last_treasure: None,
            triggers: TriggerCatalog::default(),
            region_tracker: RegionTracker::default(),
            rng,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Reset everything a new game starts without
    pub fn new_game(&mut self) {
        self.self_variables = SelfVariableStore::new();
        self.origins.clear();
        self.last_treasure = None;
        self.move_route_behavior = self.config.move_route_behavior;
        self.triggers = TriggerCatalog::default();
        self.region_tracker = RegionTracker::default();
    }

    pub fn save_data(&self) -> SaveData {
        SaveData {
            self_variables: self.self_variables.clone(),
            event_origins: self.origins.clone(),
        }
    }

    /// Restore persisted state; transient state starts fresh
    pub fn load(&mut self, data: SaveData) {
        self.new_game();
        self.self_variables = data.self_variables;
        self.origins = data.event_origins;
    }

    pub fn load_json(&mut self, json: &str) -> Result<()> {
        self.load(SaveData::from_json(json)?);
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn registry(&self) -> &SelfScopeRegistry {
        &self.registry
    }

    pub fn self_variables(&self) -> &SelfVariableStore {
        &self.self_variables
    }

    pub fn origins(&self) -> &EventOrigins {
        &self.origins
    }

    pub fn last_treasure(&self) -> Option<&Treasure> {
        self.last_treasure.as_ref()
    }

    pub fn move_route_behavior(&self) -> MoveRouteBehavior {
        self.move_route_behavior
    }

    pub fn set_move_route_behavior(&mut self, behavior: MoveRouteBehavior) {
        if behavior != self.move_route_behavior {
            debug!(?behavior, "move route behavior changed");
        }
        self.move_route_behavior = behavior;
    }

    /// Step one character's route under the global behavior
    pub fn step_route<'r, H: MovementRouteHost + ?Sized>(
        &self,
        runner: &mut RouteRunner,
        route: &'r CompiledRoute,
        host: &mut H,
    ) -> RouteStep<'r> {
        runner.step(route, host, self.move_route_behavior)
    }

    pub fn triggers(&self) -> &TriggerCatalog {
        &self.triggers
    }

    pub fn region_tracker(&self) -> &RegionTracker {
        &self.region_tracker
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    // ========================================================================
    // Map and player hooks
    // ========================================================================

    /// Map finished loading: classify triggers, seed the region tracker and
    /// start map-setup events
    pub fn on_map_setup<H: MapHost + ?Sized>(&mut self, host: &mut H) -> usize {
        self.triggers.rebuild(&*host, &self.config.plugin_name);
        self.region_tracker.reset(host.player().region_id);
        trigger::start_map_setup(&self.triggers, host)
    }

    /// An event's active page changed
    pub fn on_page_refresh(&mut self, event: &EventInfo) {
        self.triggers.refresh_event(event, &self.config.plugin_name);
    }

    /// The player was placed without walking, e.g. by a transfer
    pub fn on_player_placed<H: MapHost + ?Sized>(&mut self, host: &H) {
        self.region_tracker.reset(host.player().region_id);
    }

    /// The player finished a step (`was_moving`) or stood still this frame
    pub fn on_player_arrival<H: MapHost + ?Sized>(&mut self, host: &mut H, was_moving: bool) -> usize {
        trigger::on_player_arrival(&mut self.region_tracker, &self.triggers, host, was_moving)
    }

    pub fn check_party_touch<H: MapHost + ?Sized>(&self, host: &mut H) -> Vec<i32> {
        trigger::check_party_touch_here(&self.triggers, host, self.move_route_behavior)
    }

    pub fn check_event_touch<H: MapHost + ?Sized>(
        &self,
        host: &mut H,
        event_id: i32,
        target: Point,
    ) -> bool {
        trigger::check_event_touch(&self.triggers, host, self.move_route_behavior, event_id, target)
    }

    // ========================================================================
    // Switches and variables
    // ========================================================================

    pub fn switch_value<H: SelfScopeStore + VariableHost + ?Sized>(
        &self,
        host: &H,
        scope: EntityRef,
        switch_id: i32,
    ) -> bool {
        scope::switch_value(&self.registry, host, scope, switch_id)
    }

    pub fn set_switch_value<H: SelfScopeStore + VariableHost + ?Sized>(
        &self,
        host: &mut H,
        scope: EntityRef,
        switch_id: i32,
        value: bool,
    ) {
        scope::set_switch_value(&self.registry, host, scope, switch_id, value);
    }

    pub fn variable_value<H: VariableHost + ?Sized>(
        &self,
        host: &H,
        scope: EntityRef,
        variable_id: i32,
    ) -> i32 {
        scope::variable_value(&self.registry, &self.self_variables, host, scope, variable_id)
    }

    pub fn set_variable_value<H: VariableHost + ?Sized>(
        &mut self,
        host: &mut H,
        scope: EntityRef,
        variable_id: i32,
        value: i32,
    ) {
        scope::set_variable_value(
            &self.registry,
            &mut self.self_variables,
            host,
            scope,
            variable_id,
            value,
        );
    }

    /// Page conditions of an event page owned by `owner`
    pub fn meets_page_conditions<H: SelfScopeStore + VariableHost + ?Sized>(
        &self,
        host: &H,
        owner: EntityRef,
        conditions: &PageConditions,
    ) -> bool {
        scope::meets_page_conditions(&self.registry, &self.self_variables, host, owner, conditions)
    }

    // ========================================================================
    // Treasure
    // ========================================================================

    /// Give a treasure and remember it for the treasure text codes
    pub fn give_treasure<I: Inventory + ?Sized>(
        &mut self,
        request: &TreasureRequest,
        inventory: &mut I,
    ) -> Result<Treasure> {
        let treasure = give_treasure(request, inventory)?;
        self.last_treasure = Some(treasure.clone());
        Ok(treasure)
    }

    /// Give a treasure outside any interpreter, queueing the display common event
    pub fn give_treasure_and_notify<H: MapHost + Inventory + ?Sized>(
        &mut self,
        request: &TreasureRequest,
        host: &mut H,
    ) -> Result<Treasure> {
        let treasure = self.give_treasure(request, host)?;
        if let Some(common_event_id) = self.config.treasure_display_common_event {
            host.reserve_common_event(common_event_id);
        }
        Ok(treasure)
    }

    pub fn convert_text_codes<'t>(&self, text: &'t str) -> Cow<'t, str> {
        convert_treasure_text_codes(text, self.last_treasure.as_ref())
    }

    // ========================================================================
    // Event origins
    // ========================================================================

    /// Where an event spawns when its map loads
    pub fn spawn_position(&self, map_id: i32, event_id: i32, authored: Point) -> Point {
        self.origins.origin_of(map_id, event_id, authored)
    }

    /// Move an event's spawn position; returns the new origin
    pub fn set_origin<H: MapHost + ?Sized>(
        &mut self,
        host: &H,
        entity: EntityRef,
        request: &OriginRequest,
    ) -> Option<Point> {
        let anchor = if entity.map_id == host.map_id() {
            host.event(entity.event_id)
                .map(|event| (event.position, event.direction))
        } else {
            host.load_map_events(entity.map_id)
                .and_then(|events| events.into_iter().find(|event| event.id == entity.event_id))
                .map(|event| {
                    let position = self.origins.origin_of(entity.map_id, event.id, event.position);
                    (position, event.direction)
                })
        };
        let Some(anchor) = anchor else {
            warn!(
                map_id = entity.map_id,
                event_id = entity.event_id,
                "set new origin: event not found"
            );
            return None;
        };
        let player = host.player();
        let origin = request.resolve(anchor, (player.position, player.direction));
        self.origins.set(entity.map_id, entity.event_id, origin);
        debug!(
            map_id = entity.map_id,
            event_id = entity.event_id,
            x = origin.x,
            y = origin.y,
            "event origin set"
        );
        Some(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Direction, Relativity};
    use crate::interpreter::TreasureKind;
    use crate::scope::SelfScopeKey;
    use crate::testing::TestWorld;

    fn new_session() -> EventAiSession {
        let registry = SelfScopeRegistry::from_names(&["", "s:Opened"], &["", "s:Count", "Gold"], "s:");
        EventAiSession::with_seed(PluginConfig::default(), registry, 1)
    }

    #[test]
    fn test_self_variables_are_per_entity() {
        let mut session = new_session();
        let mut world = TestWorld::new(3);

        session.set_variable_value(&mut world, EntityRef::new(3, 5), 1, 10);
        session.set_variable_value(&mut world, EntityRef::new(3, 6), 1, 20);
        assert_eq!(session.variable_value(&world, EntityRef::new(3, 5), 1), 10);
        assert_eq!(session.variable_value(&world, EntityRef::new(3, 6), 1), 20);

        session.set_variable_value(&mut world, EntityRef::new(3, 5), 2, 99);
        assert_eq!(world.variable(2), 99);
        assert_eq!(session.variable_value(&world, EntityRef::new(3, 6), 2), 99);
    }

    #[test]
    fn test_self_switch_goes_to_keyed_store() {
        let session = new_session();
        let mut world = TestWorld::new(3);
        session.set_switch_value(&mut world, EntityRef::new(3, 5), 1, true);
        assert!(!world.switch(1));
        assert!(world.self_switch(&SelfScopeKey::new(3, 5, 1)));
        assert!(!session.switch_value(&world, EntityRef::new(3, 6), 1));
    }

    #[test]
    fn test_save_round_trip_and_new_game() {
        let mut session = new_session();
        let mut world = TestWorld::new(3);
        session.set_variable_value(&mut world, EntityRef::new(3, 5), 1, 7);
        world.add_event(5, "Guard", "", Point::new(2, 2));
        session.set_origin(&world, EntityRef::new(3, 5), &OriginRequest::default());

        let json = session.save_data().to_json().unwrap();
        let mut restored = new_session();
        restored.load_json(&json).unwrap();
        assert_eq!(restored.save_data(), session.save_data());

        restored.new_game();
        assert!(restored.self_variables().is_empty());
        assert!(restored.origins().is_empty());
    }

    #[test]
    fn test_set_origin_relative_to_player() {
        let mut session = new_session();
        let mut world = TestWorld::new(3);
        world.add_event(5, "Guard", "", Point::new(2, 2));
        world.player.position = Point::new(10, 10);
        world.player.direction = Direction::Right;
        let request = OriginRequest {
            x: 0,
            y: 0,
            relativity: Relativity::RelativeToPlayer,
            forward: 2,
            rightward: 0,
        };
        let origin = session.set_origin(&world, EntityRef::new(3, 5), &request);
        assert_eq!(origin, Some(Point::new(12, 10)));
        assert_eq!(session.spawn_position(3, 5, Point::new(2, 2)), Point::new(12, 10));
        assert_eq!(session.spawn_position(3, 6, Point::new(2, 2)), Point::new(2, 2));
    }

    #[test]
    fn test_give_treasure_and_notify_reserves_display() {
        let config = PluginConfig {
            treasure_display_common_event: Some(4),
            ..Default::default()
        };
        let mut session = EventAiSession::with_seed(config, SelfScopeRegistry::default(), 1);
        let mut world = TestWorld::new(1);
        world.add_item(TreasureKind::Item, 1, "Potion", 176);

        let request = TreasureRequest::ById {
            kind: TreasureKind::Item,
            id: 1,
            quantity: 1,
        };
        session.give_treasure_and_notify(&request, &mut world).unwrap();
        assert_eq!(world.reserved_common_events, vec![4]);
        assert_eq!(session.convert_text_codes("<treasure name>"), "Potion");
    }

    #[test]
    fn test_route_steps_follow_global_behavior() {
        use crate::command::Command;
        use crate::testing::RouteActor;

        let mut session = new_session();
        let route = CompiledRoute::from_commands(&[Command::new(1, 0, vec![])], false).unwrap();
        let mut runner = RouteRunner::new();
        let mut actor = RouteActor::default();

        session.set_move_route_behavior(MoveRouteBehavior::Freeze);
        assert_eq!(session.step_route(&mut runner, &route, &mut actor), RouteStep::Frozen);

        session.set_move_route_behavior(MoveRouteBehavior::Normal);
        assert!(matches!(
            session.step_route(&mut runner, &route, &mut actor),
            RouteStep::Host(_)
        ));
        assert_eq!(session.step_route(&mut runner, &route, &mut actor), RouteStep::Finished);
    }
}
