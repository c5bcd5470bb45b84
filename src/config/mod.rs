//! Plugin configuration
//!
//! This module handles deserialization of the plugin parameters, either from
//! a JSON document or from the host's string-typed parameter table.

use crate::error::Result;
use crate::session::MoveRouteBehavior;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_PLUGIN_NAME: &str = "Tyruswoo_EventAI";
pub const DEFAULT_SELF_SCOPE_PREFIX: &str = "s:";
pub const DEFAULT_MAX_COMMON_EVENT_DEPTH: u32 = 100;

/// Plugin parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Owner name plugin commands must carry to be read by this crate
    pub plugin_name: String,
    /// Common event run after every treasure command
    #[serde(alias = "Treasure Display Common Event")]
    pub treasure_display_common_event: Option<i32>,
    /// Name prefix marking a switch or variable as self-scoped
    #[serde(alias = "Self Scope Prefix")]
    pub self_scope_prefix: String,
    #[serde(alias = "Move Route Behavior")]
    pub move_route_behavior: MoveRouteBehavior,
    pub max_common_event_depth: u32,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            plugin_name: DEFAULT_PLUGIN_NAME.to_string(),
            treasure_display_common_event: None,
            self_scope_prefix: DEFAULT_SELF_SCOPE_PREFIX.to_string(),
            move_route_behavior: MoveRouteBehavior::Normal,
            max_common_event_depth: DEFAULT_MAX_COMMON_EVENT_DEPTH,
        }
    }
}

impl PluginConfig {
    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build from the host's parameter table, where every value is a string
    ///
    /// Blank or `0` common event ids mean "none"; unparsable numbers are
    /// ignored in favor of the default.
    pub fn from_parameters(parameters: &HashMap<String, String>) -> Self {
        let mut config = Self::default();
        let get = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| parameters.get(*name))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        if let Some(name) = get(&["plugin_name", "Plugin Name"]) {
            config.plugin_name = name.to_string();
        }
        config.treasure_display_common_event = get(&[
            "treasure_display_common_event",
            "Treasure Display Common Event",
        ])
        .and_then(|value| value.parse::<i32>().ok())
        .filter(|id| *id > 0);
        if let Some(prefix) = get(&["self_scope_prefix", "Self Scope Prefix"]) {
            config.self_scope_prefix = prefix.to_string();
        }
        if let Some(mode) = get(&["move_route_behavior", "Move Route Behavior"]) {
            if let Some(behavior) = MoveRouteBehavior::from_arg(mode) {
                config.move_route_behavior = behavior;
            }
        }
        if let Some(depth) = get(&["max_common_event_depth"]).and_then(|v| v.parse().ok()) {
            config.max_common_event_depth = depth;
        }
        config
    }
}
