//! Per-character move route evaluator

use crate::command::{codes, Command};
use crate::condition::{check, AstNode};
use crate::host::MovementRouteHost;
use crate::route::compiled::CompiledRoute;
use crate::route::script::RouteCommand;
use crate::route::view::RouteView;
use crate::session::MoveRouteBehavior;
use smallvec::SmallVec;
use tracing::trace;

/// What the host should do with the character this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteStep<'r> {
    /// Run this movement command
    Host(&'r Command),
    /// The route ran out and does not repeat
    Finished,
    /// A repeating route has nothing for the host to run
    Idle,
    /// Routes are frozen globally
    Frozen,
}

/// Instruction pointer and branch state of one character's route
///
/// Branch markers and effect helpers are consumed inside `step` without
/// costing a frame; only host commands are handed back.
#[derive(Debug, Clone, Default)]
pub struct RouteRunner {
    index: usize,
    /// Whether a branch of each open chain has been taken
    taken: SmallVec<[bool; 4]>,
    last_host: Option<usize>,
    last_sound: Option<String>,
    last_balloon: Option<i32>,
}

impl RouteRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over for a new route
    ///
    /// The last sound and balloon belong to the character and survive.
    pub fn reset(&mut self) {
        self.index = 0;
        self.taken.clear();
        self.last_host = None;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of open branch chains
    pub fn depth(&self) -> usize {
        self.taken.len()
    }

    pub fn last_sound(&self) -> Option<&str> {
        self.last_sound.as_deref()
    }

    pub fn last_balloon(&self) -> Option<i32> {
        self.last_balloon
    }

    /// Point back at the last host command so it is retried next frame
    pub fn rewind(&mut self) {
        if let Some(index) = self.last_host {
            self.index = index;
        }
    }

    /// Advance to the next command the host has to run
    pub fn step<'r, H: MovementRouteHost + ?Sized>(
        &mut self,
        route: &'r CompiledRoute,
        host: &mut H,
        behavior: MoveRouteBehavior,
    ) -> RouteStep<'r> {
        if behavior == MoveRouteBehavior::Freeze {
            return RouteStep::Frozen;
        }

        let mut wrapped = false;
        loop {
            let command = match route.get(self.index) {
                Some(RouteCommand::Host(command)) if command.code != codes::END => command,
                Some(RouteCommand::Host(_)) | None => {
                    if !route.repeat() {
                        return RouteStep::Finished;
                    }
                    if wrapped {
                        return RouteStep::Idle;
                    }
                    wrapped = true;
                    self.index = 0;
                    self.taken.clear();
                    continue;
                }
                Some(marker) => {
                    self.apply(route, marker, host, behavior);
                    continue;
                }
            };
            self.last_host = Some(self.index);
            self.index += 1;
            return RouteStep::Host(command);
        }
    }

    fn apply<H: MovementRouteHost + ?Sized>(
        &mut self,
        route: &CompiledRoute,
        command: &RouteCommand,
        host: &mut H,
        behavior: MoveRouteBehavior,
    ) {
        let index = self.index;
        let jump = route.jump(index);
        self.index += 1;

        match command {
            RouteCommand::If(condition) => {
                let holds = Self::holds(condition, host, behavior);
                self.taken.push(holds);
                if !holds {
                    self.skip_to(jump.map(|j| j.next));
                }
            }
            RouteCommand::ElseIf(_) | RouteCommand::Else
                if self.taken.last().copied().unwrap_or(false) =>
            {
                self.skip_to(jump.map(|j| j.end));
            }
            RouteCommand::ElseIf(condition) => {
                if Self::holds(condition, host, behavior) {
                    self.mark_taken();
                } else {
                    self.skip_to(jump.map(|j| j.next));
                }
            }
            RouteCommand::Else => self.mark_taken(),
            RouteCommand::End => {
                self.taken.pop();
            }
            RouteCommand::SetSound(sound) => {
                if self.last_sound.as_deref() != Some(sound.name.as_str()) {
                    host.play_se(sound);
                    self.last_sound = Some(sound.name.clone());
                }
            }
            RouteCommand::UnsetSound => self.last_sound = None,
            RouteCommand::SetBalloon(balloon_id) => {
                if self.last_balloon != Some(*balloon_id) {
                    host.request_balloon(*balloon_id);
                    self.last_balloon = Some(*balloon_id);
                }
            }
            RouteCommand::UnsetBalloon => self.last_balloon = None,
            RouteCommand::ShowBalloon(balloon_id) => host.request_balloon(*balloon_id),
            RouteCommand::Unreadable | RouteCommand::Host(_) => {}
        }
    }

    fn holds<H: MovementRouteHost + ?Sized>(
        condition: &AstNode,
        host: &H,
        behavior: MoveRouteBehavior,
    ) -> bool {
        check(condition, &RouteView::new(host, behavior))
    }

    fn mark_taken(&mut self) {
        if let Some(taken) = self.taken.last_mut() {
            *taken = true;
        }
    }

    fn skip_to(&mut self, target: Option<usize>) {
        if let Some(target) = target {
            trace!(from = self.index - 1, to = target, "route branch skipped");
            self.index = target;
        }
    }
}
