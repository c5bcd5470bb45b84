//! Identity keys for self-scoped slots

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Which slot of an entity: a lettered self switch or a numbered switch/variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyId {
    Letter(char),
    Index(i32),
}

impl From<char> for PropertyId {
    fn from(letter: char) -> Self {
        PropertyId::Letter(letter)
    }
}

impl From<i32> for PropertyId {
    fn from(index: i32) -> Self {
        PropertyId::Index(index)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyId::Letter(letter) => write!(f, "{}", letter),
            PropertyId::Index(index) => write!(f, "{}", index),
        }
    }
}

impl FromStr for PropertyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<i32>() {
            return Ok(PropertyId::Index(index));
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_alphabetic() => {
                Ok(PropertyId::Letter(letter.to_ascii_uppercase()))
            }
            _ => Err(format!("invalid property id: {}", s)),
        }
    }
}

/// The executing (or linked) entity: an event on a map
///
/// Event id 0 means "no owning event", e.g. a common event run from the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub map_id: i32,
    pub event_id: i32,
}

impl EntityRef {
    pub const fn new(map_id: i32, event_id: i32) -> Self {
        Self { map_id, event_id }
    }

    pub fn key(self, property: impl Into<PropertyId>) -> SelfScopeKey {
        SelfScopeKey {
            map_id: self.map_id,
            event_id: self.event_id,
            property: property.into(),
        }
    }
}

/// `(map, event, property)` identifying one self switch or self variable
///
/// Serialized as `"map,event,property"` so it can key a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelfScopeKey {
    pub map_id: i32,
    pub event_id: i32,
    pub property: PropertyId,
}

impl SelfScopeKey {
    pub fn new(map_id: i32, event_id: i32, property: impl Into<PropertyId>) -> Self {
        EntityRef::new(map_id, event_id).key(property)
    }

    pub fn entity(&self) -> EntityRef {
        EntityRef::new(self.map_id, self.event_id)
    }
}

impl fmt::Display for SelfScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.map_id, self.event_id, self.property)
    }
}

impl FromStr for SelfScopeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(format!("invalid self scope key: {}", s));
        }
        let map_id = parts[0]
            .trim()
            .parse()
            .map_err(|_| format!("invalid map id in key: {}", s))?;
        let event_id = parts[1]
            .trim()
            .parse()
            .map_err(|_| format!("invalid event id in key: {}", s))?;
        Ok(SelfScopeKey {
            map_id,
            event_id,
            property: parts[2].parse()?,
        })
    }
}

impl Serialize for SelfScopeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SelfScopeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
