//! Custom page triggers
//!
//! Pages and common events declare a plugin trigger by placing a trigger
//! command at the top of their list. The classifier reads those commands once
//! per page setup, the catalog caches the result per event, and the dispatcher
//! starts matching events from the player and map update hooks.

mod catalog;
mod classifier;
mod dispatcher;


pub use catalog::*;
pub use classifier::*;
pub use dispatcher::*;
