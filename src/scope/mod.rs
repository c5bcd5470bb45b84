//! Self-scoped switches and variables
//!
//! A self-scoped slot belongs to one event on one map. Slots are addressed by
//! a `SelfScopeKey` and compared by value, so a key rebuilt from the same
//! three parts always finds the same slot.

mod access;
mod key;
mod registry;
mod store;


pub use access::*;
pub use key::*;
pub use registry::*;
pub use store::*;
