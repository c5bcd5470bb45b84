//! Finding the event a link command points at

use crate::error::{EventAiError, Result};
use crate::geometry::{box_distance, Point};
use crate::host::{EventInfo, MapHost};
use crate::link::{EventSelector, LinkRequest, LocationRef, MapSelector};
use crate::scope::EntityRef;
use crate::session::EventOrigins;
use tracing::warn;

/// Resolve a map selector to a map id
pub fn resolve_map<H: MapHost + ?Sized>(selector: &MapSelector, host: &H) -> Result<i32> {
    match selector {
        MapSelector::Current => Ok(host.map_id()),
        MapSelector::Id(id) => Ok(*id),
        MapSelector::Name(name) => host
            .map_id_by_name(name)
            .ok_or_else(|| EventAiError::UnknownMap(name.clone())),
    }
}

/// Position on the current map that distances are measured from
fn reference_point<H: MapHost + ?Sized>(
    location: LocationRef,
    host: &H,
    own: EntityRef,
) -> Result<Point> {
    match location {
        LocationRef::Player => Ok(host.player().position),
        LocationRef::Point(point) => Ok(point),
        LocationRef::ThisEvent => local_position(host, own.event_id),
        LocationRef::Event(event_id) => local_position(host, event_id),
    }
}

fn local_position<H: MapHost + ?Sized>(host: &H, event_id: i32) -> Result<Point> {
    host.event(event_id)
        .map(|event| event.position)
        .ok_or_else(|| EventAiError::EventNotFound(format!("event {}", event_id)))
}

/// Events of `map_id` eligible as link targets
fn candidates<H: MapHost + ?Sized>(
    host: &H,
    map_id: i32,
    selector: &EventSelector,
    origins: &EventOrigins,
) -> Result<Vec<EventInfo>> {
    if map_id == host.map_id() {
        return Ok(match selector {
            EventSelector::Id(id) => host.event(*id).into_iter().collect(),
            _ => host.events().into_iter().filter(|event| !event.erased).collect(),
        });
    }

    let mut events = host
        .load_map_events(map_id)
        .ok_or_else(|| EventAiError::UnknownMap(map_id.to_string()))?;
    for event in &mut events {
        if let Some(origin) = origins.get(map_id, event.id) {
            event.position = origin;
        }
    }
    if let EventSelector::Id(id) = selector {
        events.retain(|event| event.id == *id);
    }
    Ok(events)
}

/// Find the entity a Link Event command designates
///
/// Candidates are narrowed by id or name, then by exact note, then by
/// distance from the reference point. Without an id the nearest survivor
/// wins.
pub fn resolve_link<H: MapHost + ?Sized>(
    request: &LinkRequest,
    host: &H,
    own: EntityRef,
    origins: &EventOrigins,
) -> Result<EntityRef> {
    let map_id = resolve_map(&request.map, host)?;
    let mut events = candidates(host, map_id, &request.event, origins)?;

    if let EventSelector::Name(name) = &request.event {
        events.retain(|event| &event.name == name);
    }
    if let Some(note) = &request.note {
        events.retain(|event| &event.note == note);
    }

    let location = match request.location.as_deref() {
        Some(text) => LocationRef::parse(text).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unrecognized link location");
            LocationRef::Player
        }),
        None => LocationRef::Player,
    };
    let origin = reference_point(location, host, own)?;

    if let Some(max_distance) = request.max_distance {
        events.retain(|event| box_distance(origin, event.position) <= max_distance);
    }
    if !matches!(request.event, EventSelector::Id(_)) {
        events.sort_by_key(|event| (box_distance(origin, event.position), event.id));
    }

    events
        .first()
        .map(|event| EntityRef::new(map_id, event.id))
        .ok_or_else(|| EventAiError::EventNotFound(format!("{:?} on map {}", request.event, map_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestWorld;

    fn world() -> TestWorld {
        let mut world = TestWorld::new(1);
        world.player.position = Point::new(5, 5);
        world.add_event(1, "Chest", "", Point::new(9, 5));
        world.add_event(2, "Chest", "gold", Point::new(6, 6));
        world.add_event(3, "Door", "", Point::new(5, 4));
        world
    }

    fn request(event: EventSelector) -> LinkRequest {
        LinkRequest {
            event,
            ..Default::default()
        }
    }

    #[test]
    fn test_nearest_by_name() {
        let world = world();
        let target = resolve_link(
            &request(EventSelector::Name("Chest".to_string())),
            &world,
            EntityRef::new(1, 3),
            &EventOrigins::default(),
        )
        .unwrap();
        assert_eq!(target, EntityRef::new(1, 2));
    }

    #[test]
    fn test_note_and_distance_filters() {
        let world = world();
        let mut req = request(EventSelector::Any);
        req.note = Some("gold".to_string());
        let target = resolve_link(&req, &world, EntityRef::new(1, 3), &EventOrigins::default());
        assert_eq!(target.unwrap(), EntityRef::new(1, 2));

        let mut req = request(EventSelector::Name("Chest".to_string()));
        req.location = Some("9,5".to_string());
        req.max_distance = Some(0);
        let target = resolve_link(&req, &world, EntityRef::new(1, 3), &EventOrigins::default());
        assert_eq!(target.unwrap(), EntityRef::new(1, 1));
    }

    #[test]
    fn test_erased_events_are_skipped_without_id() {
        let mut world = world();
        world.erase_event_now(2);
        let target = resolve_link(
            &request(EventSelector::Name("Chest".to_string())),
            &world,
            EntityRef::new(1, 3),
            &EventOrigins::default(),
        )
        .unwrap();
        assert_eq!(target, EntityRef::new(1, 1));
    }

    #[test]
    fn test_no_match_is_an_error() {
        let world = world();
        let result = resolve_link(
            &request(EventSelector::Name("Well".to_string())),
            &world,
            EntityRef::new(1, 3),
            &EventOrigins::default(),
        );
        assert!(matches!(result, Err(EventAiError::EventNotFound(_))));
    }

    #[test]
    fn test_remote_map_uses_origin_overrides() {
        let mut world = world();
        world.add_remote_event(7, "Cellar", 1, "Barrel", Point::new(0, 0));
        world.add_remote_event(7, "Cellar", 2, "Barrel", Point::new(20, 20));
        world.player.position = Point::new(19, 19);

        let mut origins = EventOrigins::default();
        let mut req = request(EventSelector::Name("Barrel".to_string()));
        req.map = MapSelector::Name("Cellar".to_string());
        let target = resolve_link(&req, &world, EntityRef::new(1, 3), &origins).unwrap();
        assert_eq!(target, EntityRef::new(7, 2));

        origins.set(7, 1, Point::new(19, 18));
        let target = resolve_link(&req, &world, EntityRef::new(1, 3), &origins).unwrap();
        assert_eq!(target, EntityRef::new(7, 1));
    }

    #[test]
    fn test_unknown_map_name() {
        let world = world();
        let mut req = request(EventSelector::Any);
        req.map = MapSelector::Name("Nowhere".to_string());
        let result = resolve_link(&req, &world, EntityRef::new(1, 3), &EventOrigins::default());
        assert!(matches!(result, Err(EventAiError::UnknownMap(_))));
    }
}
