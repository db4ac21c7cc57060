//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod niche_filter;
mod pipeline_stage;
mod platform;

pub use niche_filter::*;
pub use pipeline_stage::*;
pub use platform::*;
