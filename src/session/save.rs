//! Blocks appended to the host's save file

use crate::error::Result;
use crate::scope::SelfVariableStore;
use crate::session::EventOrigins;
use serde::{Deserialize, Serialize};

/// Everything the plugin persists
///
/// Missing blocks (a save made before the plugin was installed) load as
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    pub self_variables: SelfVariableStore,
    pub event_origins: EventOrigins,
}

impl SaveData {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
