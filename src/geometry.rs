//! Tile coordinates, facing directions and distance helpers

use serde::{Deserialize, Serialize};

/// A tile position on a map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Facing direction, numbered like a numeric keypad (2 down, 4 left, 6 right, 8 up)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    #[default]
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    /// Unit step taken when moving forward
    pub fn forward(self) -> (i32, i32) {
        match self {
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
        }
    }

    /// Unit step toward the character's own right hand
    pub fn rightward(self) -> (i32, i32) {
        let (fx, fy) = self.forward();
        (-fy, fx)
    }

    pub fn code(self) -> u8 {
        match self {
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 6,
            Direction::Up => 8,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            2 => Ok(Direction::Down),
            4 => Ok(Direction::Left),
            6 => Ok(Direction::Right),
            8 => Ok(Direction::Up),
            other => Err(format!("invalid direction code: {}", other)),
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> u8 {
        direction.code()
    }
}

/// Chebyshev distance: the larger of the two axis deltas
#[inline]
pub fn box_distance(a: Point, b: Point) -> u32 {
    (a.x - b.x).unsigned_abs().max((a.y - b.y).unsigned_abs())
}

/// Manhattan distance: the sum of both axis deltas
#[inline]
pub fn manhattan_distance(a: Point, b: Point) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

/// Shift `base` by `forward` steps along `facing` and `rightward` steps to its right
pub fn shift_by_facing(base: Point, facing: Direction, forward: i32, rightward: i32) -> Point {
    let (fx, fy) = facing.forward();
    let (rx, ry) = facing.rightward();
    base.offset(fx * forward + rx * rightward, fy * forward + ry * rightward)
}

/// How a coordinate pair in a command argument is anchored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relativity {
    #[default]
    Absolute,
    RelativeToEvent,
    RelativeToPlayer,
}

impl Relativity {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "" | "absolute" => Some(Relativity::Absolute),
            "event" | "relative_to_event" => Some(Relativity::RelativeToEvent),
            "player" | "relative_to_player" => Some(Relativity::RelativeToPlayer),
            _ => None,
        }
    }
}

/// Resolve `(x, y)` against an anchor, then apply a facing-relative shift
///
/// `Absolute` treats `(x, y)` as map coordinates and shifts along the event's
/// facing. The relative modes add `(x, y)` to the anchor's position and shift
/// along the anchor's facing.
pub fn resolve_relative(
    relativity: Relativity,
    x: i32,
    y: i32,
    event: (Point, Direction),
    player: (Point, Direction),
    forward: i32,
    rightward: i32,
) -> Point {
    let (base, facing) = match relativity {
        Relativity::Absolute => (Point::new(x, y), event.1),
        Relativity::RelativeToEvent => (event.0.offset(x, y), event.1),
        Relativity::RelativeToPlayer => (player.0.offset(x, y), player.1),
    };
    shift_by_facing(base, facing, forward, rightward)
}
