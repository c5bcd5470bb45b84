//! Session state shared by every interpreter and route on a save file
//!
//! `EventAiSession` owns what the plugin keeps between frames: self-variable
//! values, event origin overrides, the last treasure given, the global move
//! route behavior, the trigger catalog of the current map and the RNG.

mod behavior;
mod context;
mod origins;
mod save;


pub use behavior::*;
pub use context::*;
pub use origins::*;
pub use save::*;
