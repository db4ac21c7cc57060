//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod gemini;
pub mod sqlite;

// Re-exports
pub use gemini::GeminiContentAnalyzer;
pub use sqlite::{MemoryConfig, SqliteContentMemory};
