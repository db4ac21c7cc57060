//! TitanFlow API Models
//!
//! Request/response DTOs for the HTTP layer.
//! - Analysis: analyze and niche-analysis requests
//! - Script / Visual: intermediate stage requests
//! - Pipeline: full pipeline request and result
//! - Memory: content memory maintenance

mod analysis;
mod memory;
mod pipeline;
mod script;
mod visual;

pub use analysis::*;
pub use memory::*;
pub use pipeline::*;
pub use script::*;
pub use visual::*;

fn default_analysis_type() -> String {
    crate::application::DEFAULT_ANALYSIS_TYPE.to_string()
}
