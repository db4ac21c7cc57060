//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the content analyzer, the content memory and the domain services.

mod analysis_service;
mod pipeline_service;

#[cfg(test)]
pub(crate) mod testing;

pub use analysis_service::{AnalysisService, AnalyzeOptions, CacheMode};
pub use pipeline_service::{PipelineConfig, PipelineOutcome, PipelineRequest, PipelineService};

/// Analysis type used when a request does not name one
pub const DEFAULT_ANALYSIS_TYPE: &str = "full";
