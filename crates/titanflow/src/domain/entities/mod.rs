//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - VideoRecord: validated input unit
//! - ContentAnalysis: structured insights from the analysis stage
//! - Script: composed short-form script
//! - VisualPlan: timestamped scene breakdown
//! - MemoryEntry: cached analysis row

mod analysis;
mod memory_entry;
mod script;
mod video;
mod visual_plan;

pub use analysis::*;
pub use memory_entry::*;
pub use script::*;
pub use video::*;
pub use visual_plan::*;
