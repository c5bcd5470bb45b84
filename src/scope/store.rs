//! Keyed storage for self-scoped values

use crate::host::SelfScopeStore;
use crate::scope::SelfScopeKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Values of self-scoped variables; persisted with the save file
///
/// Unset slots read as 0. Slots are never removed, only overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelfVariableStore {
    values: BTreeMap<SelfScopeKey, i32>,
}

impl SelfVariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, key: &SelfScopeKey) -> i32 {
        self.values.get(key).copied().unwrap_or(0)
    }

    pub fn set_value(&mut self, key: SelfScopeKey, value: i32) {
        self.values.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SelfScopeKey, &i32)> {
        self.values.iter()
    }
}

/// A self-switch table for hosts that do not keep their own
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelfSwitchTable {
    on: BTreeSet<SelfScopeKey>,
}

impl SelfScopeStore for SelfSwitchTable {
    fn self_switch(&self, key: &SelfScopeKey) -> bool {
        self.on.contains(key)
    }

    fn set_self_switch(&mut self, key: SelfScopeKey, value: bool) {
        if value {
            self.on.insert(key);
        } else {
            self.on.remove(&key);
        }
    }
}
