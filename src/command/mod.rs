//! Event command lists and this plugin's command vocabulary
//!
//! Commands are kept in the host's serialized shape (`code`, `indent`,
//! `parameters`) so page lists can be deserialized straight from map data.

mod model;
pub mod plugin;

pub use model::*;
pub use plugin::*;
