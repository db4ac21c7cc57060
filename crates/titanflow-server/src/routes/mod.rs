//! TitanFlow API Routes
//!
//! - /analyze, /niche-analysis - Analysis Engine
//! - /generate-script - Script Composer
//! - /create-visual-plan - Visual Planner
//! - /full-pipeline - All three stages in order
//! - /memory - Content memory maintenance
//! - /, /health, /sample - Service information

pub mod analysis;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod script;
pub mod swagger;
pub mod system;
pub mod visual;
