//! Move route branching and per-character effects
//!
//! Script entries calling `rbIf`/`rbElse`/`rbEnd` form branch chains inside a
//! move route; `setSe`, `setBln` and `showBln` play sounds and balloons only
//! when they change. Routes are decoded and matched once into a
//! `CompiledRoute`, then driven frame by frame by a `RouteRunner`.

mod compiled;
mod runner;
mod script;
mod view;


pub use compiled::*;
pub use runner::*;
pub use script::*;
pub use view::*;
