//! This plugin's commands inside a running list

use crate::command::{Command, EventAiCommand};
use crate::error::EventAiError;
use crate::host::GameHost;
use crate::interpreter::draw_branch;
use crate::interpreter::engine::{Flow, Interpreter};
use crate::link::resolve_link;
use crate::session::EventAiSession;
use smallvec::SmallVec;
use tracing::{debug, warn};

impl Interpreter {
    pub(crate) fn command_plugin<H: GameHost + ?Sized>(
        &mut self,
        command: &Command,
        session: &mut EventAiSession,
        host: &mut H,
    ) -> Flow {
        let scope = self.active_scope();
        let Some(plugin_command) = command.as_plugin_command() else {
            return host.execute_command(command, scope).into();
        };
        if plugin_command.plugin != session.config().plugin_name {
            return host.execute_command(command, scope).into();
        }
        // Weights are indexed at setup, unreadable ones included
        if self.branches.set_of(self.index).is_some() {
            self.command_weight(session);
            return Flow::Continue;
        }
        match EventAiCommand::decode(&plugin_command) {
            Ok(Some(decoded)) => self.run_plugin_command(decoded, session, host),
            // Commands of this plugin the crate leaves to the host, e.g. sprite helpers
            Ok(None) => host.execute_command(command, scope).into(),
            Err(err) => {
                warn!(command = plugin_command.name, error = %err, "skipping malformed plugin command");
                Flow::Continue
            }
        }
    }

    fn run_plugin_command<H: GameHost + ?Sized>(
        &mut self,
        command: EventAiCommand,
        session: &mut EventAiSession,
        host: &mut H,
    ) -> Flow {
        match command {
            // Trigger declarations are read at page setup
            EventAiCommand::TriggerRegionEntry { .. }
            | EventAiCommand::TriggerPartyTouch
            | EventAiCommand::TriggerMapSetup
            | EventAiCommand::Weight(_) => {}
            EventAiCommand::EndWeightBranches => {
                if !self.weights.close(self.indent) {
                    let err = EventAiError::NoOpenWeightBranches(self.indent);
                    warn!(error = %err, index = self.index, "end weight branches ignored");
                }
            }
            EventAiCommand::LinkEvent(request) => {
                match resolve_link(&request, &*host, self.owner, session.origins()) {
                    Ok(target) => {
                        debug!(map_id = target.map_id, event_id = target.event_id, "event linked");
                        self.link.set(target);
                    }
                    Err(err) => warn!(error = %err, "link event failed, link unchanged"),
                }
            }
            EventAiCommand::UnlinkEvent => {
                if self.link.is_linked() {
                    debug!("event unlinked");
                }
                self.link.clear();
            }
            EventAiCommand::Treasure(request) => match session.give_treasure(&request, host) {
                Ok(_) => {
                    if let Some(common_event_id) = session.config().treasure_display_common_event {
                        self.run_common_event(common_event_id, session, host);
                    }
                }
                Err(err) => warn!(error = %err, "treasure not given"),
            },
            EventAiCommand::SetNewOrigin(request) => {
                session.set_origin(&*host, self.active_scope(), &request);
            }
            EventAiCommand::GlobalMoveRouteBehavior(behavior) => {
                session.set_move_route_behavior(behavior);
            }
        }
        Flow::Continue
    }

    /// Draw or reuse the selection of this Weight's set, then enter or skip its branch
    fn command_weight(&mut self, session: &mut EventAiSession) {
        let Some((set_id, members)) = self.branches.set_of(self.index) else {
            return;
        };
        let depth = self.indent;
        let selected = match self.weights.selection(depth, set_id) {
            Some(selected) => selected,
            None => {
                let weights: SmallVec<[f64; 8]> = members.iter().map(|(_, weight)| *weight).collect();
                let selected = members[draw_branch(&weights, session.rng())].0;
                self.weights.record(depth, set_id, selected);
                debug!(depth, selected, branches = members.len(), "weight branch drawn");
                selected
            }
        };
        if selected != self.index {
            if let Some(next) = self.branches.next_sibling(self.index) {
                // The loop's increment lands on the next sibling
                self.index = next - 1;
            }
        }
    }
}
