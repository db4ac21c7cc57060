//! Content Analyzer Port
//!
//! Abstract interface for the external text-analysis capability.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, ContentAnalysis, VideoRecord};

/// Service interface for summarizing video records into analysis fields
#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    /// Produce the five base analysis fields for `records`.
    ///
    /// Records arrive with niche fields already stripped. Implementations
    /// leave `niche_insights` unset and report unreachable or malformed
    /// output as `DomainError::AnalysisUnavailable`.
    async fn summarize(&self, records: &[VideoRecord]) -> Result<ContentAnalysis, DomainError>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}
