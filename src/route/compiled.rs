//! Move route pre-pass
//!
//! Branch chains are matched once when a route is compiled. Each marker
//! records where the next alternative of its chain starts and where the
//! chain ends, so the runner never rescans the list.

use crate::command::Command;
use crate::error::{EventAiError, Result};
use crate::route::script::RouteCommand;
use serde::{Deserialize, Serialize};

/// A move route as the host stores it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoveRoute {
    pub list: Vec<Command>,
    pub repeat: bool,
    pub skippable: bool,
    pub wait: bool,
}

/// Jump targets of one branch marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jump {
    /// Next `rbElse`/`rbEnd` of the same chain
    pub next: usize,
    /// Closing `rbEnd` of the chain
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRoute {
    commands: Vec<RouteCommand>,
    jumps: Vec<Option<Jump>>,
    repeat: bool,
}

impl CompiledRoute {
    pub fn compile(route: &MoveRoute) -> Result<Self> {
        Self::from_commands(&route.list, route.repeat)
    }

    /// Decode and match branch markers
    ///
    /// `rbElse`/`rbEnd` without an open `rbIf`, and an `rbIf` that is never
    /// closed, are rejected.
    pub fn from_commands(list: &[Command], repeat: bool) -> Result<Self> {
        let commands: Vec<RouteCommand> = list.iter().map(RouteCommand::decode).collect();
        let mut jumps = vec![None; commands.len()];
        let mut open: Vec<Vec<usize>> = Vec::new();

        for (index, command) in commands.iter().enumerate() {
            match command {
                RouteCommand::If(_) => open.push(vec![index]),
                RouteCommand::ElseIf(_) | RouteCommand::Else => {
                    open.last_mut()
                        .ok_or_else(|| {
                            EventAiError::MalformedRoute(format!(
                                "rbElse at {} has no open rbIf",
                                index
                            ))
                        })?
                        .push(index);
                }
                RouteCommand::End => {
                    let chain = open.pop().ok_or_else(|| {
                        EventAiError::MalformedRoute(format!("rbEnd at {} has no open rbIf", index))
                    })?;
                    for (k, &marker) in chain.iter().enumerate() {
                        let next = chain.get(k + 1).copied().unwrap_or(index);
                        jumps[marker] = Some(Jump { next, end: index });
                    }
                }
                _ => {}
            }
        }

        if let Some(chain) = open.last() {
            return Err(EventAiError::MalformedRoute(format!(
                "rbIf at {} is never closed",
                chain[0]
            )));
        }

        Ok(Self {
            commands,
            jumps,
            repeat,
        })
    }

    pub fn commands(&self) -> &[RouteCommand] {
        &self.commands
    }

    pub fn get(&self, index: usize) -> Option<&RouteCommand> {
        self.commands.get(index)
    }

    /// Jump targets of the marker at `index`
    pub fn jump(&self, index: usize) -> Option<Jump> {
        self.jumps.get(index).copied().flatten()
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::codes;

    fn script(line: &str) -> Command {
        Command::new(codes::ROUTE_SCRIPT, 0, vec![serde_json::json!(line)])
    }

    fn step() -> Command {
        Command::new(1, 0, vec![])
    }

    #[test]
    fn test_chain_jumps() {
        let list = vec![
            script("this.rbIf('S1')"),
            step(),
            script("this.rbElse('S2')"),
            step(),
            script("this.rbElse()"),
            step(),
            script("this.rbEnd()"),
        ];
        let route = CompiledRoute::from_commands(&list, false).unwrap();
        assert_eq!(route.jump(0), Some(Jump { next: 2, end: 6 }));
        assert_eq!(route.jump(2), Some(Jump { next: 4, end: 6 }));
        assert_eq!(route.jump(4), Some(Jump { next: 6, end: 6 }));
        assert_eq!(route.jump(1), None);
    }

    #[test]
    fn test_nested_chains_skip_inner_markers() {
        let list = vec![
            script("this.rbIf('S1')"),
            script("this.rbIf('S2')"),
            step(),
            script("this.rbElse()"),
            step(),
            script("this.rbEnd()"),
            script("this.rbElse()"),
            step(),
            script("this.rbEnd()"),
        ];
        let route = CompiledRoute::from_commands(&list, false).unwrap();
        assert_eq!(route.jump(0), Some(Jump { next: 6, end: 8 }));
        assert_eq!(route.jump(1), Some(Jump { next: 3, end: 5 }));
    }

    #[test]
    fn test_malformed_nesting_is_rejected() {
        let stray_end = vec![step(), script("this.rbEnd()")];
        assert!(matches!(
            CompiledRoute::from_commands(&stray_end, false),
            Err(EventAiError::MalformedRoute(_))
        ));

        let stray_else = vec![script("this.rbElse()")];
        assert!(CompiledRoute::from_commands(&stray_else, false).is_err());

        let unclosed = vec![script("this.rbIf('S1')"), step()];
        assert!(CompiledRoute::from_commands(&unclosed, false).is_err());
    }

    #[test]
    fn test_bad_effect_helper_keeps_route() {
        let list = vec![
            step(),
            script("this.setBln('sparkle')"),
            script("this.setSe('Step', loud)"),
            step(),
        ];
        let route = CompiledRoute::from_commands(&list, false).unwrap();
        assert_eq!(route.len(), 4);
        assert_eq!(route.get(1), Some(&RouteCommand::Unreadable));
        assert_eq!(route.get(3), Some(&RouteCommand::Host(step())));
    }

    #[test]
    fn test_compile_host_route_json() {
        let json = r#"{"list":[{"code":45,"indent":null,"parameters":["this.rbIf('true')"]},{"code":45,"indent":null,"parameters":["this.rbEnd()"]},{"code":0,"parameters":[]}],"repeat":true,"skippable":false,"wait":false}"#;
        let route: MoveRoute = serde_json::from_str(json).unwrap();
        let compiled = CompiledRoute::compile(&route).unwrap();
        assert!(compiled.repeat());
        assert_eq!(compiled.len(), 3);
        assert_eq!(compiled.jump(0), Some(Jump { next: 1, end: 1 }));
    }
}
