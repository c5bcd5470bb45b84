//! Location filter parsing

use crate::error::{EventAiError, Result};
use crate::geometry::Point;
use once_cell::sync::Lazy;
use regex::Regex;

static EVENT_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^event\s*#?\s*(\d+)$").expect("valid event reference pattern")
});

static POINT_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?\s*(-?\d+)\s*,\s*(-?\d+)\s*\)?$").expect("valid point pattern")
});

/// Reference point of a link command's distance filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocationRef {
    #[default]
    Player,
    /// The event running the link command
    ThisEvent,
    /// An event on the current map
    Event(i32),
    Point(Point),
}

impl LocationRef {
    /// Parse `player`, `this`, `event N` or `x,y`
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        match text.to_ascii_lowercase().as_str() {
            "" | "player" => return Ok(LocationRef::Player),
            "this" | "this event" | "self" => return Ok(LocationRef::ThisEvent),
            _ => {}
        }
        if let Some(caps) = EVENT_REF.captures(text) {
            let id = caps[1]
                .parse()
                .map_err(|_| EventAiError::InvalidFilter(text.to_string()))?;
            return Ok(LocationRef::Event(id));
        }
        if let Some(caps) = POINT_REF.captures(text) {
            let x = caps[1]
                .parse()
                .map_err(|_| EventAiError::InvalidFilter(text.to_string()))?;
            let y = caps[2]
                .parse()
                .map_err(|_| EventAiError::InvalidFilter(text.to_string()))?;
            return Ok(LocationRef::Point(Point::new(x, y)));
        }
        Err(EventAiError::InvalidFilter(text.to_string()))
    }
}
