//! TitanFlow Domain Library
//!
//! Core domain types and interfaces for the TitanFlow short-form content
//! pipeline: analysis of viral video records, script composition and
//! visual production planning.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (VideoRecord, ContentAnalysis, Script, VisualPlan, MemoryEntry)
//!   - `value_objects/`: Immutable value types (Platform, NicheFilter, PipelineStage)
//!   - `services/`: Deterministic transformations (ScriptComposer, VisualPlanner)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Content memory store
//!   - `services/`: External analysis capability and clock
//!
//! # Usage
//!
//! ```rust,ignore
//! use titanflow::domain::{ScriptComposer, VisualPlanner, Platform};
//! use titanflow::ports::{ContentAnalyzer, ContentMemoryRepository};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    estimate_duration, format_timestamp, ComposerConfig, ContentAnalysis, DomainError,
    HookPattern, MemoryEntry, NicheAttributes, NicheFilter, NicheInsights, PipelineError,
    PipelineStage, PipelineState, Platform, PlannerConfig, Scene, SceneKind, Script,
    ScriptComposer, VideoRecord, VideoRecordInput, VisualPlan, VisualPlanner,
};
pub use ports::{Clock, ContentAnalyzer, ContentMemoryRepository, SystemClock};
