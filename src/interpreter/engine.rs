//! Frame-driven command list interpreter

use crate::command::{codes, Command};
use crate::host::{CommandOutcome, GameHost};
use crate::interpreter::{BranchIndex, WeightBranchState};
use crate::link::LinkedEvent;
use crate::scope::EntityRef;
use crate::session::EventAiSession;
use ahash::AHashMap;
use std::sync::Arc;

/// What the update loop does after one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    /// Yield until the next frame
    Wait,
    Finished,
}

impl From<CommandOutcome> for Flow {
    fn from(outcome: CommandOutcome) -> Self {
        match outcome {
            CommandOutcome::Continue => Flow::Continue,
            CommandOutcome::Wait => Flow::Wait,
        }
    }
}

/// One instruction pointer over a command list
///
/// Common events run in a child interpreter that finishes before the parent
/// resumes.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    pub(crate) list: Option<Arc<[Command]>>,
    pub(crate) branches: BranchIndex,
    pub(crate) index: usize,
    pub(crate) indent: u32,
    pub(crate) owner: EntityRef,
    /// Result of the last conditional branch per indent
    pub(crate) branch: AHashMap<u32, bool>,
    pub(crate) link: LinkedEvent,
    pub(crate) weights: WeightBranchState,
    pub(crate) child: Option<Box<Interpreter>>,
    pub(crate) depth: u32,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn nested(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Start running `list` on behalf of `owner`
    ///
    /// `owner.event_id` is 0 for common events run without an event.
    pub fn setup(&mut self, list: Arc<[Command]>, owner: EntityRef, plugin_name: &str) {
        self.clear();
        self.branches = BranchIndex::build(&list, plugin_name);
        self.list = Some(list);
        self.owner = owner;
    }

    /// Stop and forget the list, the link and every weight selection
    pub fn clear(&mut self) {
        self.list = None;
        self.branches = BranchIndex::default();
        self.index = 0;
        self.indent = 0;
        self.branch.clear();
        self.link.clear();
        self.weights.clear();
        self.child = None;
    }

    pub fn is_running(&self) -> bool {
        self.list.is_some()
    }

    pub fn owner(&self) -> EntityRef {
        self.owner
    }

    pub fn link(&self) -> &LinkedEvent {
        &self.link
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn child(&self) -> Option<&Interpreter> {
        self.child.as_deref()
    }

    /// The entity self switches, self variables and erasing act on
    pub fn active_scope(&self) -> EntityRef {
        self.link.resolve(self.owner)
    }

    /// Run commands until one waits or the list ends
    ///
    /// Returns whether the interpreter is still running.
    pub fn update<H: GameHost + ?Sized>(&mut self, session: &mut EventAiSession, host: &mut H) -> bool {
        loop {
            if let Some(child) = self.child.as_mut() {
                if child.update(session, host) {
                    return true;
                }
                self.child = None;
            }
            if self.list.is_none() {
                return false;
            }
            match self.execute_command(session, host) {
                Flow::Continue => {}
                Flow::Wait => return true,
                Flow::Finished => {
                    self.clear();
                    return false;
                }
            }
        }
    }

    fn execute_command<H: GameHost + ?Sized>(
        &mut self,
        session: &mut EventAiSession,
        host: &mut H,
    ) -> Flow {
        let Some(list) = self.list.clone() else {
            return Flow::Finished;
        };
        let Some(command) = list.get(self.index) else {
            return Flow::Finished;
        };
        self.indent = command.indent;
        self.weights.prune(self.indent);

        let flow = match command.code {
            codes::CONDITIONAL_BRANCH => {
                let result = self.evaluate_branch(command, session, host);
                self.branch.insert(self.indent, result);
                if !result {
                    self.skip_branch(&list);
                }
                Flow::Continue
            }
            codes::ELSE => {
                if self.branch.get(&self.indent) != Some(&false) {
                    self.skip_branch(&list);
                }
                Flow::Continue
            }
            codes::END | codes::BRANCH_END | codes::LOOP | codes::PLUGIN_COMMAND_TEXT => {
                Flow::Continue
            }
            codes::REPEAT_ABOVE => {
                self.jump_to_loop_start(&list);
                Flow::Wait
            }
            codes::BREAK_LOOP => {
                self.break_loop(&list);
                Flow::Continue
            }
            codes::EXIT_EVENT => return Flow::Finished,
            codes::COMMON_EVENT => self.command_common_event(command, session, host),
            codes::CONTROL_SWITCHES => self.command_control_switches(command, session, host),
            codes::CONTROL_VARIABLES => self.command_control_variables(command, session, host),
            codes::CONTROL_SELF_SWITCH => self.command_control_self_switch(command, host),
            codes::ERASE_EVENT => self.command_erase_event(session, host),
            codes::PLUGIN_COMMAND => self.command_plugin(command, session, host),
            _ => host.execute_command(command, self.active_scope()).into(),
        };
        self.index += 1;
        flow
    }

    /// Advance past every command nested deeper than the current one
    pub(crate) fn skip_branch(&mut self, list: &[Command]) {
        while list
            .get(self.index + 1)
            .is_some_and(|command| command.indent > self.indent)
        {
            self.index += 1;
        }
    }

    fn jump_to_loop_start(&mut self, list: &[Command]) {
        while self.index > 0 {
            self.index -= 1;
            if list[self.index].indent == self.indent {
                break;
            }
        }
    }

    fn break_loop(&mut self, list: &[Command]) {
        let mut depth = 0;
        while self.index + 1 < list.len() {
            self.index += 1;
            match list[self.index].code {
                codes::LOOP => depth += 1,
                codes::REPEAT_ABOVE if depth > 0 => depth -= 1,
                codes::REPEAT_ABOVE => break,
                _ => {}
            }
        }
    }

    /// Run `list` in a child interpreter before this one continues
    pub(crate) fn setup_child(&mut self, list: Arc<[Command]>, owner: EntityRef, plugin_name: &str) {
        let mut child = Interpreter::nested(self.depth + 1);
        child.setup(list, owner, plugin_name);
        self.child = Some(Box::new(child));
    }
}
