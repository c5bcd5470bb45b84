//! Global move route behavior

use serde::{Deserialize, Serialize};

/// How autonomous move routes behave map-wide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveRouteBehavior {
    #[default]
    Normal,
    /// Routes do not step
    Freeze,
    /// Routes and touch triggers act as if the player were absent
    IgnorePlayer,
}

impl MoveRouteBehavior {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "normal" => Some(MoveRouteBehavior::Normal),
            "freeze" => Some(MoveRouteBehavior::Freeze),
            "ignore-player" => Some(MoveRouteBehavior::IgnorePlayer),
            _ => None,
        }
    }
}
