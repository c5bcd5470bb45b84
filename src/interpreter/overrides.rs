//! Host commands whose meaning changes under linking and self scope

use crate::command::{codes, Command};
use crate::error::EventAiError;
use crate::host::GameHost;
use crate::interpreter::engine::{Flow, Interpreter};
use crate::scope::{EntityRef, PropertyId};
use crate::session::EventAiSession;
use rand::Rng;
use tracing::{debug, warn};

/// Floor division as the host's variable operations round it
fn floor_div(left: i32, right: i32) -> Option<i32> {
    let quotient = left.checked_div(right)?;
    if left % right != 0 && ((left < 0) != (right < 0)) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

fn operate(operation: i32, old: i32, value: i32) -> i32 {
    match operation {
        0 => value,
        1 => old.saturating_add(value),
        2 => old.saturating_sub(value),
        3 => old.saturating_mul(value),
        4 => floor_div(old, value).unwrap_or(old),
        5 => old.checked_rem(value).unwrap_or(old),
        _ => old,
    }
}

fn compare(operator: i32, left: i32, right: i32) -> bool {
    match operator {
        0 => left == right,
        1 => left >= right,
        2 => left <= right,
        3 => left > right,
        4 => left < right,
        5 => left != right,
        _ => false,
    }
}

impl Interpreter {
    /// Conditional branch; switch, variable and self switch checks are read here
    pub(crate) fn evaluate_branch<H: GameHost + ?Sized>(
        &mut self,
        command: &Command,
        session: &mut EventAiSession,
        host: &mut H,
    ) -> bool {
        let scope = self.active_scope();
        let param = |i| command.int_param(i).unwrap_or(0);
        match command.int_param(0) {
            Some(codes::BRANCH_ON_SWITCH) => {
                session.switch_value(&*host, scope, param(1)) == (param(2) == 0)
            }
            Some(codes::BRANCH_ON_VARIABLE) => {
                let left = session.variable_value(&*host, scope, param(1));
                let right = if param(2) == 0 {
                    param(3)
                } else {
                    session.variable_value(&*host, scope, param(3))
                };
                compare(param(4), left, right)
            }
            Some(codes::BRANCH_ON_SELF_SWITCH) => {
                if scope.event_id <= 0 {
                    return false;
                }
                let Some(letter) = self_switch_letter(command.str_param(1)) else {
                    return false;
                };
                host.self_switch(&scope.key(letter)) == (param(2) == 0)
            }
            _ => host.evaluate_condition(command, scope),
        }
    }

    /// Control Self Switch, acting on the linked event when one is set
    pub(crate) fn command_control_self_switch<H: GameHost + ?Sized>(
        &mut self,
        command: &Command,
        host: &mut H,
    ) -> Flow {
        let scope = self.active_scope();
        if scope.event_id > 0 {
            if let Some(letter) = self_switch_letter(command.str_param(0)) {
                let value = command.int_param(1) == Some(0);
                host.set_self_switch(scope.key(letter), value);
            }
        }
        Flow::Continue
    }

    pub(crate) fn command_control_switches<H: GameHost + ?Sized>(
        &mut self,
        command: &Command,
        session: &mut EventAiSession,
        host: &mut H,
    ) -> Flow {
        let scope = self.active_scope();
        let (Some(start), Some(end)) = (command.int_param(0), command.int_param(1)) else {
            return Flow::Continue;
        };
        let value = command.int_param(2) == Some(0);
        for switch_id in start..=end {
            session.set_switch_value(host, scope, switch_id, value);
        }
        Flow::Continue
    }

    /// Control Variables with constant, variable and random operands
    ///
    /// Other operand kinds read game data the host owns, so the host runs them.
    pub(crate) fn command_control_variables<H: GameHost + ?Sized>(
        &mut self,
        command: &Command,
        session: &mut EventAiSession,
        host: &mut H,
    ) -> Flow {
        let scope = self.active_scope();
        let param = |i| command.int_param(i).unwrap_or(0);
        let (start, end, operation) = (param(0), param(1), param(2));
        let (base, random_span) = match param(3) {
            0 => (param(4), 1),
            1 => (session.variable_value(&*host, scope, param(4)), 1),
            2 => (param(4), (i64::from(param(5)) - i64::from(param(4)) + 1).max(1)),
            _ => return host.execute_command(command, scope).into(),
        };
        for variable_id in start..=end {
            let value = if random_span > 1 {
                // Stays within [min, max]
                (i64::from(base) + session.rng().gen_range(0..random_span)) as i32
            } else {
                base
            };
            let old = session.variable_value(&*host, scope, variable_id);
            session.set_variable_value(host, scope, variable_id, operate(operation, old, value));
        }
        Flow::Continue
    }

    /// Common Event; under a link the child runs as the linked event
    pub(crate) fn command_common_event<H: GameHost + ?Sized>(
        &mut self,
        command: &Command,
        session: &mut EventAiSession,
        host: &mut H,
    ) -> Flow {
        if let Some(common_event_id) = command.int_param(0) {
            self.run_common_event(common_event_id, session, host);
        }
        Flow::Continue
    }

    pub(crate) fn run_common_event<H: GameHost + ?Sized>(
        &mut self,
        common_event_id: i32,
        session: &mut EventAiSession,
        host: &mut H,
    ) {
        if self.depth + 1 > session.config().max_common_event_depth {
            warn!(common_event_id, depth = self.depth, "common event nesting too deep, skipping");
            return;
        }
        let Some(common_event) = host.common_event(common_event_id) else {
            warn!(common_event_id, "common event not found");
            return;
        };
        let map_id = host.map_id();
        let event_id = match self.link.target() {
            Some(target) if target.map_id == map_id => target.event_id,
            Some(_) => 0,
            None => self.owner.event_id,
        };
        self.setup_child(
            common_event.list,
            EntityRef::new(map_id, event_id),
            &session.config().plugin_name,
        );
    }

    /// Erase Event; under a link erases the linked event and drops the link
    pub(crate) fn command_erase_event<H: GameHost + ?Sized>(
        &mut self,
        session: &mut EventAiSession,
        host: &mut H,
    ) -> Flow {
        let current_map_id = host.map_id();
        let erased = match self.link.target() {
            Some(target) if target.map_id != current_map_id => {
                let err = EventAiError::CrossMapErase {
                    event_id: target.event_id,
                    map_id: target.map_id,
                    current_map_id,
                };
                warn!(error = %err, "erase event ignored");
                return Flow::Continue;
            }
            Some(target) => {
                self.link.clear();
                debug!(event_id = target.event_id, "linked event erased, link cleared");
                target.event_id
            }
            None if self.owner.map_id == current_map_id && self.owner.event_id > 0 => {
                self.owner.event_id
            }
            None => return Flow::Continue,
        };
        host.erase_event(erased);
        if let Some(event) = host.event(erased) {
            session.on_page_refresh(&event);
        }
        Flow::Continue
    }
}

/// The self switch letter parameter, upper-cased
fn self_switch_letter(param: Option<&str>) -> Option<PropertyId> {
    let letter: PropertyId = param?.parse().ok()?;
    matches!(letter, PropertyId::Letter(_)).then_some(letter)
}
