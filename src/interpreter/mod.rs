//! Event interpreter extension
//!
//! `Interpreter` walks an event page or common event list one command at a
//! time. It runs this plugin's commands, intercepts the host commands whose
//! meaning changes under linking or self scope, and hands everything else to
//! the host through `CommandHost`.

mod commands;
mod engine;
mod overrides;
mod treasure;
mod weight;


pub use engine::*;
pub use treasure::*;
pub use weight::*;
