//! Service Ports
//!
//! Abstract interfaces for external services.

mod clock;
mod content_analyzer;

pub use clock::*;
pub use content_analyzer::*;
