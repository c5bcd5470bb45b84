//! Switch and variable access with self-scope interception

use crate::host::{PageConditions, SelfScopeStore, VariableHost};
use crate::scope::{EntityRef, PropertyId, SelfScopeRegistry, SelfVariableStore};
use std::borrow::Cow;

/// Read a switch; self-scoped ids read the slot of `scope`
pub fn switch_value<H: SelfScopeStore + VariableHost + ?Sized>(
    registry: &SelfScopeRegistry,
    host: &H,
    scope: EntityRef,
    switch_id: i32,
) -> bool {
    if registry.is_self_switch(switch_id) {
        host.self_switch(&scope.key(switch_id))
    } else {
        host.switch(switch_id)
    }
}

pub fn set_switch_value<H: SelfScopeStore + VariableHost + ?Sized>(
    registry: &SelfScopeRegistry,
    host: &mut H,
    scope: EntityRef,
    switch_id: i32,
    value: bool,
) {
    if registry.is_self_switch(switch_id) {
        host.set_self_switch(scope.key(switch_id), value);
    } else {
        host.set_switch(switch_id, value);
    }
}

/// Read a variable; self-scoped ids read the slot of `scope`
pub fn variable_value<H: VariableHost + ?Sized>(
    registry: &SelfScopeRegistry,
    store: &SelfVariableStore,
    host: &H,
    scope: EntityRef,
    variable_id: i32,
) -> i32 {
    if registry.is_self_variable(variable_id) {
        store.value(&scope.key(variable_id))
    } else {
        host.variable(variable_id)
    }
}

pub fn set_variable_value<H: VariableHost + ?Sized>(
    registry: &SelfScopeRegistry,
    store: &mut SelfVariableStore,
    host: &mut H,
    scope: EntityRef,
    variable_id: i32,
    value: i32,
) {
    if registry.is_self_variable(variable_id) {
        store.set_value(scope.key(variable_id), value);
    } else {
        host.set_variable(variable_id, value);
    }
}

/// Evaluate page conditions, reading self-scoped ids from the page owner
///
/// Self-scoped conditions are checked here against `owner` (never against an
/// active link) and blanked out of a copy handed to the host's own check. The
/// caller's `conditions` are left untouched for the next frame's evaluation.
pub fn meets_page_conditions<H: SelfScopeStore + VariableHost + ?Sized>(
    registry: &SelfScopeRegistry,
    store: &SelfVariableStore,
    host: &H,
    owner: EntityRef,
    conditions: &PageConditions,
) -> bool {
    let mut remaining = Cow::Borrowed(conditions);

    if conditions.switch1_valid && registry.is_self_switch(conditions.switch1_id) {
        if !host.self_switch(&owner.key(conditions.switch1_id)) {
            return false;
        }
        remaining.to_mut().switch1_valid = false;
    }
    if conditions.switch2_valid && registry.is_self_switch(conditions.switch2_id) {
        if !host.self_switch(&owner.key(conditions.switch2_id)) {
            return false;
        }
        remaining.to_mut().switch2_valid = false;
    }
    if conditions.variable_valid && registry.is_self_variable(conditions.variable_id) {
        let value = store.value(&owner.key(PropertyId::Index(conditions.variable_id)));
        if value < conditions.variable_value {
            return false;
        }
        remaining.to_mut().variable_valid = false;
    }

    host.meets_conditions(&remaining)
}
