//! Link requests and the per-interpreter link

use crate::scope::EntityRef;
use serde::{Deserialize, Serialize};

/// Which map a link command searches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapSelector {
    #[default]
    Current,
    Id(i32),
    Name(String),
}

impl MapSelector {
    /// Blank, `0`, `current` and `this` select the current map
    pub fn from_arg(arg: Option<&str>) -> Self {
        let Some(arg) = arg.map(str::trim).filter(|arg| !arg.is_empty()) else {
            return MapSelector::Current;
        };
        if arg.eq_ignore_ascii_case("current") || arg.eq_ignore_ascii_case("this") {
            return MapSelector::Current;
        }
        match arg.parse::<i32>() {
            Ok(0) => MapSelector::Current,
            Ok(id) => MapSelector::Id(id),
            Err(_) => MapSelector::Name(arg.to_string()),
        }
    }
}

/// Which event a link command looks for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSelector {
    /// Nearest event passing the filters
    #[default]
    Any,
    Id(i32),
    Name(String),
}

impl EventSelector {
    pub fn from_arg(arg: Option<&str>) -> Self {
        let Some(arg) = arg.map(str::trim).filter(|arg| !arg.is_empty()) else {
            return EventSelector::Any;
        };
        match arg.parse::<i32>() {
            Ok(0) => EventSelector::Any,
            Ok(id) => EventSelector::Id(id),
            Err(_) => EventSelector::Name(arg.to_string()),
        }
    }
}

/// Arguments of the Link Event command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkRequest {
    pub map: MapSelector,
    pub event: EventSelector,
    /// Exact, case-sensitive note match
    pub note: Option<String>,
    /// Reference point for distance filtering and sorting
    pub location: Option<String>,
    pub max_distance: Option<u32>,
}

/// The link held by one interpreter; unset means "act on myself"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkedEvent {
    target: Option<EntityRef>,
}

impl LinkedEvent {
    pub fn set(&mut self, target: EntityRef) {
        self.target = Some(target);
    }

    pub fn clear(&mut self) {
        self.target = None;
    }

    pub fn is_linked(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<EntityRef> {
        self.target
    }

    /// The linked entity, or `own` when nothing is linked
    pub fn resolve(&self, own: EntityRef) -> EntityRef {
        self.target.unwrap_or(own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_selector_from_arg() {
        assert_eq!(MapSelector::from_arg(None), MapSelector::Current);
        assert_eq!(MapSelector::from_arg(Some(" ")), MapSelector::Current);
        assert_eq!(MapSelector::from_arg(Some("0")), MapSelector::Current);
        assert_eq!(MapSelector::from_arg(Some("This")), MapSelector::Current);
        assert_eq!(MapSelector::from_arg(Some("12")), MapSelector::Id(12));
        assert_eq!(
            MapSelector::from_arg(Some("Old Mill")),
            MapSelector::Name("Old Mill".to_string())
        );
    }

    #[test]
    fn test_event_selector_from_arg() {
        assert_eq!(EventSelector::from_arg(Some("0")), EventSelector::Any);
        assert_eq!(EventSelector::from_arg(Some("7")), EventSelector::Id(7));
        assert_eq!(
            EventSelector::from_arg(Some("Chest")),
            EventSelector::Name("Chest".to_string())
        );
    }

    #[test]
    fn test_linked_event_resolves_to_self_when_unset() {
        let own = EntityRef::new(1, 4);
        let mut link = LinkedEvent::default();
        assert_eq!(link.resolve(own), own);

        link.set(EntityRef::new(2, 9));
        assert!(link.is_linked());
        assert_eq!(link.resolve(own), EntityRef::new(2, 9));

        link.clear();
        assert_eq!(link.resolve(own), own);
    }
}
