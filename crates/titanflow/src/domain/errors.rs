//! Domain Errors
//!
//! Error types for domain operations. Each pipeline component raises its
//! own kind; callers translate them into protocol-level responses.

use thiserror::Error;

use crate::domain::entities::{ContentAnalysis, Script};
use crate::domain::value_objects::PipelineStage;

/// Domain layer errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Analysis unavailable: {0}")]
    AnalysisUnavailable(String),

    #[error("Composition error: {0}")]
    Composition(String),

    #[error("Planning error: {0}")]
    Planning(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn analysis_unavailable(message: impl Into<String>) -> Self {
        Self::AnalysisUnavailable(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation_error",
            DomainError::AnalysisUnavailable(_) => "analysis_unavailable",
            DomainError::Composition(_) => "composition_error",
            DomainError::Planning(_) => "planning_error",
            DomainError::Storage(_) => "storage_error",
        }
    }
}

/// A pipeline failure annotated with the stage that raised it.
///
/// The source error is forwarded untouched, together with the outputs of
/// the stages that completed before it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub source: DomainError,
    pub analysis: Option<ContentAnalysis>,
    pub script: Option<Script>,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, source: DomainError) -> Self {
        Self {
            stage,
            source,
            analysis: None,
            script: None,
        }
    }

    pub fn with_analysis(mut self, analysis: ContentAnalysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn with_script(mut self, script: Script) -> Self {
        self.script = Some(script);
        self
    }
}
