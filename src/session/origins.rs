//! Event origin overrides

use crate::geometry::{resolve_relative, Direction, Point, Relativity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Arguments of the Set New Origin command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRequest {
    pub x: i32,
    pub y: i32,
    pub relativity: Relativity,
    pub forward: i32,
    pub rightward: i32,
}

impl OriginRequest {
    /// Map coordinates this request designates
    pub fn resolve(&self, event: (Point, Direction), player: (Point, Direction)) -> Point {
        resolve_relative(
            self.relativity,
            self.x,
            self.y,
            event,
            player,
            self.forward,
            self.rightward,
        )
    }
}

/// Spawn positions replacing the authored ones, keyed `"mapId eventId"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventOrigins {
    origins: BTreeMap<String, Point>,
}

fn origin_key(map_id: i32, event_id: i32) -> String {
    format!("{} {}", map_id, event_id)
}

impl EventOrigins {
    pub fn set(&mut self, map_id: i32, event_id: i32, origin: Point) {
        self.origins.insert(origin_key(map_id, event_id), origin);
    }

    pub fn get(&self, map_id: i32, event_id: i32) -> Option<Point> {
        self.origins.get(&origin_key(map_id, event_id)).copied()
    }

    /// Override for the event, or its authored position
    pub fn origin_of(&self, map_id: i32, event_id: i32, authored: Point) -> Point {
        self.get(map_id, event_id).unwrap_or(authored)
    }

    pub fn clear(&mut self) {
        self.origins.clear();
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}
