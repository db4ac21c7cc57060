//! Domain Services
//!
//! Deterministic, stateless transformations between domain entities.

mod script_composer;
mod text;
mod visual_planner;

pub use script_composer::*;
pub use visual_planner::*;
