//! Capability interfaces the host engine implements
//!
//! The plugin never reaches into host objects directly. Everything it needs
//! from the map, party, inventory and command interpreter goes through these
//! traits, and the data it reads comes back as the plain carriers in `data`.

mod data;
mod traits;

pub use data::*;
pub use traits::*;
