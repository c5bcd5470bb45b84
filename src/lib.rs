//! Event AI Core - Event trigger and interpreter extension for tile-based RPGs
//!
//! This crate adds custom page triggers (region entry, party touch, map
//! setup), weighted random branches, linked events, self-scoped switches and
//! variables, treasure commands, event origins and move route branching to a
//! host engine. The host implements the capability traits in [`host`]; the
//! plugin's state lives in an [`EventAiSession`] handed to every operation.
//!
//! # Example
//!
//! ```no_run
//! use event_ai_core::{EventAiSession, PluginConfig, SelfScopeRegistry};
//!
//! let config = PluginConfig::from_json(r#"{"treasure_display_common_event": 4}"#)?;
//! let registry = SelfScopeRegistry::from_names(&["", "s:Opened"], &["", "s:Visits"], "s:");
//! let session = EventAiSession::new(config, registry);
//! assert!(session.self_variables().is_empty());
//! # Ok::<(), event_ai_core::EventAiError>(())
//! ```

pub mod command;
pub mod condition;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod interpreter;
pub mod link;
pub mod route;
pub mod scope;
pub mod session;
pub mod trigger;

#[cfg(test)]
mod testing;

pub use command::{Command, EventAiCommand};
pub use config::PluginConfig;
pub use error::{EventAiError, Result};
pub use host::{GameHost, MovementRouteHost, TriggerOwner};
pub use interpreter::{Interpreter, Treasure, TreasureKind, TreasureRequest};
pub use link::{LinkRequest, LinkedEvent};
pub use route::{CompiledRoute, MoveRoute, RouteRunner, RouteStep};
pub use scope::{EntityRef, SelfScopeKey, SelfScopeRegistry};
pub use session::{EventAiSession, MoveRouteBehavior, SaveData};
pub use trigger::{TriggerCatalog, TriggerKind};
