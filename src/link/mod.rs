//! Linked events
//!
//! A running interpreter may point at another event, on this map or another
//! one, and have self switches, self variables, common events and erasing act
//! on that event instead of itself.

mod filter;
mod reference;
mod resolver;


pub use filter::*;
pub use reference::*;
pub use resolver::*;
