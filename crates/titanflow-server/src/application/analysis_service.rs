//! Analysis Engine Application Service (Use Case)
//!
//! Filters records by niche, strips niche fields, delegates to the content
//! analyzer under a timeout and attaches niche insights. Results can be
//! cached in the content memory.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

use titanflow::{
    ContentAnalysis, ContentAnalyzer, ContentMemoryRepository, DomainError, NicheFilter,
    NicheInsights, Platform, VideoRecord,
};

/// How an analysis interacts with the content memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheMode {
    #[default]
    Disabled,
    /// Key derived from the request contents
    Auto,
    /// Caller-supplied video id
    Key(String),
}

/// Per-request analysis options
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// `Some` selects the niche path, even when the filter itself is empty
    pub niche_filter: Option<NicheFilter>,
    pub analysis_type: String,
    pub platform: Platform,
    pub cache: CacheMode,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            niche_filter: None,
            analysis_type: super::DEFAULT_ANALYSIS_TYPE.to_string(),
            platform: Platform::default(),
            cache: CacheMode::Disabled,
        }
    }
}

/// Application service for the analysis stage
pub struct AnalysisService<M: ContentMemoryRepository> {
    analyzer: Option<Arc<dyn ContentAnalyzer>>,
    memory: Option<Arc<M>>,
    timeout: Duration,
}

impl<M: ContentMemoryRepository> AnalysisService<M> {
    pub fn new(
        analyzer: Option<Arc<dyn ContentAnalyzer>>,
        memory: Option<Arc<M>>,
        timeout: Duration,
    ) -> Self {
        Self {
            analyzer,
            memory,
            timeout,
        }
    }

    /// Name of the configured analyzer, `None` in degraded mode
    pub fn analyzer_name(&self) -> Option<&str> {
        self.analyzer.as_ref().map(|a| a.name())
    }

    pub async fn analyze(
        &self,
        records: Vec<VideoRecord>,
        options: AnalyzeOptions,
    ) -> Result<ContentAnalysis, DomainError> {
        let cache_key = match &options.cache {
            CacheMode::Disabled => None,
            CacheMode::Auto => Some(derive_cache_key(&records, &options)?),
            CacheMode::Key(key) => Some(key.clone()),
        };

        if let (Some(memory), Some(key)) = (&self.memory, &cache_key) {
            if let Some(cached) = memory.get_content(key).await? {
                tracing::info!("Cache hit for {} ({})", key, options.analysis_type);
                return Ok(cached);
            }
            tracing::info!("Cache miss for {} ({})", key, options.analysis_type);
        }

        let analysis = match &options.niche_filter {
            Some(filter) => self.analyze_niche(records, filter, &options).await?,
            None => {
                let stripped: Vec<VideoRecord> =
                    records.iter().map(VideoRecord::without_niche_fields).collect();
                self.delegate(&stripped, &options.analysis_type).await?
            }
        };

        if let (Some(memory), Some(key)) = (&self.memory, &cache_key) {
            memory.add_content(key, options.platform, &analysis).await?;
        }

        Ok(analysis)
    }

    async fn analyze_niche(
        &self,
        records: Vec<VideoRecord>,
        filter: &NicheFilter,
        options: &AnalyzeOptions,
    ) -> Result<ContentAnalysis, DomainError> {
        let filtered = filter.apply(&records);
        tracing::debug!(
            "Niche filter kept {} of {} records ({:?})",
            filtered.len(),
            records.len(),
            filter
        );

        let insights = NicheInsights::from_records(&filtered);
        let stripped: Vec<VideoRecord> = filtered
            .iter()
            .map(VideoRecord::without_niche_fields)
            .collect();

        let mut analysis = self.delegate(&stripped, &options.analysis_type).await?;
        analysis.niche_insights = insights;
        Ok(analysis)
    }

    /// Call the analyzer. An empty record set never reaches it.
    async fn delegate(
        &self,
        records: &[VideoRecord],
        analysis_type: &str,
    ) -> Result<ContentAnalysis, DomainError> {
        if records.is_empty() {
            tracing::info!("No records left to analyze, returning empty analysis");
            return Ok(ContentAnalysis::empty());
        }

        let analyzer = self.analyzer.as_ref().ok_or_else(|| {
            DomainError::analysis_unavailable("no content analyzer is configured")
        })?;

        tracing::info!(
            "Analyzing {} records with {} ({})",
            records.len(),
            analyzer.name(),
            analysis_type
        );

        let mut analysis = tokio::time::timeout(self.timeout, analyzer.summarize(records))
            .await
            .map_err(|_| {
                DomainError::analysis_unavailable(format!(
                    "{} did not answer within {:?}",
                    analyzer.name(),
                    self.timeout
                ))
            })??;

        analysis.niche_insights = None;
        Ok(analysis)
    }
}

/// Stable key for a request: records, filter and analysis type
fn derive_cache_key(
    records: &[VideoRecord],
    options: &AnalyzeOptions,
) -> Result<String, DomainError> {
    let material = serde_json::to_vec(&(records, &options.niche_filter, &options.analysis_type))
        .map_err(|e| DomainError::storage(format!("Failed to derive cache key: {}", e)))?;
    let digest = Sha256::digest(&material);
    Ok(format!("auto-{}", &hex::encode(digest)[..32]))
}
