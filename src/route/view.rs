//! Route conditions read through the character running the route

use crate::condition::{ConditionSource, Property};
use crate::geometry::{box_distance, manhattan_distance};
use crate::host::MovementRouteHost;
use crate::session::MoveRouteBehavior;

/// Condition source over one character's host
pub struct RouteView<'h, H: ?Sized> {
    host: &'h H,
    behavior: MoveRouteBehavior,
}

impl<'h, H: MovementRouteHost + ?Sized> RouteView<'h, H> {
    pub fn new(host: &'h H, behavior: MoveRouteBehavior) -> Self {
        Self { host, behavior }
    }
}

impl<H: MovementRouteHost + ?Sized> ConditionSource for RouteView<'_, H> {
    /// Player-relative properties are unobservable while routes ignore the player
    fn property(&self, property: Property) -> Option<i32> {
        if property.reads_player() && self.behavior == MoveRouteBehavior::IgnorePlayer {
            return None;
        }
        let character = self.host.character();
        let value = match property {
            Property::Switch(id) => self.host.switch(id) as i32,
            Property::Variable(id) => self.host.variable(id),
            Property::SelfSwitch(letter) => self.host.self_switch(letter) as i32,
            Property::PlayerDistance => {
                box_distance(character.position, self.host.player().position) as i32
            }
            Property::PlayerManhattan => {
                manhattan_distance(character.position, self.host.player().position) as i32
            }
            Property::Region => character.region_id as i32,
            Property::PlayerRegion => self.host.player().region_id as i32,
            Property::Direction => character.direction.code() as i32,
            Property::X => character.position.x,
            Property::Y => character.position.y,
        };
        Some(value)
    }
}
