//! Pipeline Orchestrator Application Service (Use Case)
//!
//! Runs Analysis -> Script -> Visual Plan for one request, tracking
//! `PipelineState` and annotating the first failure with its stage.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use titanflow::domain::{has_niche_shape, parse_raw_records};
use titanflow::{
    ContentAnalysis, ContentMemoryRepository, DomainError, NicheFilter, PipelineError,
    PipelineStage, PipelineState, Platform, Script, ScriptComposer, VisualPlan, VisualPlanner,
};

use super::{AnalysisService, AnalyzeOptions, CacheMode, DEFAULT_ANALYSIS_TYPE};

/// Pipeline defaults
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub default_platform: Platform,
    /// Tone handed to the visual planner when a request names none
    pub default_tone: String,
    /// Upper bound for one content analyzer call
    pub analysis_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_platform: Platform::TikTok,
            default_tone: "engaging and informative".to_string(),
            analysis_timeout: Duration::from_secs(60),
        }
    }
}

/// One full-pipeline invocation
#[derive(Debug, Clone, Default)]
pub struct PipelineRequest {
    /// Raw record mappings; niche keys select the niche path
    pub records: Vec<Value>,
    pub platform: Option<Platform>,
    pub target_niche: Option<String>,
    pub target_problem: Option<String>,
    pub tone: Option<String>,
    /// Cache the analysis under this id
    pub video_id: Option<String>,
}

/// Composite result of a successful run
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    pub analysis: ContentAnalysis,
    pub script: Script,
    pub visual_plan: VisualPlan,
}

/// Application service for the full pipeline and its intermediate stages
pub struct PipelineService<M: ContentMemoryRepository> {
    analysis: Arc<AnalysisService<M>>,
    composer: ScriptComposer,
    planner: VisualPlanner,
    config: PipelineConfig,
}

impl<M: ContentMemoryRepository> PipelineService<M> {
    pub fn new(
        analysis: Arc<AnalysisService<M>>,
        composer: ScriptComposer,
        planner: VisualPlanner,
        config: Option<PipelineConfig>,
    ) -> Self {
        Self {
            analysis,
            composer,
            planner,
            config: config.unwrap_or_default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn composer(&self) -> &ScriptComposer {
        &self.composer
    }

    /// Script stage on its own
    pub fn compose_script(
        &self,
        analysis: &ContentAnalysis,
        platform: Option<Platform>,
    ) -> Result<Script, DomainError> {
        self.composer
            .compose(analysis, platform.unwrap_or(self.config.default_platform))
    }

    /// Visual plan stage on its own
    pub fn plan_visuals(
        &self,
        script: &Script,
        tone: Option<&str>,
    ) -> Result<VisualPlan, DomainError> {
        self.planner
            .plan(script, tone.unwrap_or(&self.config.default_tone))
    }

    /// Run every stage in order. Stops at the first failing stage.
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline", %run_id);
        self.run_stages(run_id, request).instrument(span).await
    }

    async fn run_stages(
        &self,
        run_id: Uuid,
        request: PipelineRequest,
    ) -> Result<PipelineOutcome, PipelineError> {
        let mut state = PipelineState::Received;
        let platform = request.platform.unwrap_or(self.config.default_platform);
        let tone = request
            .tone
            .clone()
            .unwrap_or_else(|| self.config.default_tone.clone());
        tracing::info!(
            "Pipeline {} for {} records on {}",
            state,
            request.records.len(),
            platform
        );

        // Analysis
        let analysis = self
            .analysis_stage(&request, platform)
            .await
            .map_err(|e| fail(&mut state, e))?;
        state = transition(state);

        // Script
        let script = self
            .composer
            .compose(&analysis, platform)
            .map_err(|e| fail(&mut state, e).with_analysis(analysis.clone()))?;
        state = transition(state);

        // Visual plan
        let visual_plan = self.planner.plan(&script, &tone).map_err(|e| {
            fail(&mut state, e)
                .with_analysis(analysis.clone())
                .with_script(script.clone())
        })?;
        state = transition(state);
        state = transition(state);
        debug_assert_eq!(state, PipelineState::Done);

        Ok(PipelineOutcome {
            run_id,
            analysis,
            script,
            visual_plan,
        })
    }

    async fn analysis_stage(
        &self,
        request: &PipelineRequest,
        platform: Platform,
    ) -> Result<ContentAnalysis, DomainError> {
        let records = parse_raw_records(&request.records)?;
        let filter = NicheFilter::new(
            request.target_niche.clone(),
            request.target_problem.clone(),
            None,
        );
        let niche_path = has_niche_shape(&request.records) || filter.is_active();
        tracing::debug!(niche_path, "Detected record shape");

        let options = AnalyzeOptions {
            niche_filter: niche_path.then_some(filter),
            analysis_type: DEFAULT_ANALYSIS_TYPE.to_string(),
            platform,
            cache: request
                .video_id
                .clone()
                .map(CacheMode::Key)
                .unwrap_or_default(),
        };

        self.analysis.analyze(records, options).await
    }
}

fn transition(state: PipelineState) -> PipelineState {
    let next = state.advance();
    tracing::info!("Pipeline {} -> {}", state, next);
    next
}

fn fail(state: &mut PipelineState, source: DomainError) -> PipelineError {
    let stage = state.pending_stage().unwrap_or(PipelineStage::Analysis);
    *state = state.fail(stage);
    tracing::warn!("Pipeline {}: {}", state, source);
    PipelineError::new(stage, source)
}
