//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use titanflow::{
    ContentAnalysis, HookPattern, NicheAttributes, NicheInsights, PipelineStage, Scene, SceneKind,
    Script, VideoRecordInput, VisualPlan,
};

use crate::application::PipelineOutcome;
use crate::models::{
    AnalyzeRequest, BackupRequest, BackupResponse, CleanupResponse, FullPipelineRequest,
    MemoryEntryResponse, NicheAnalyzeRequest, PipelineFailure, ScriptRequest, VisualPlanRequest,
};

// Local route types
use super::system::{HealthCheck, IndexResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // System endpoints
        super::system::index,
        super::system::health_check,
        super::system::sample,
        // Analysis endpoints
        super::analysis::analyze,
        super::analysis::niche_analysis,
        // Script endpoints
        super::script::generate_script,
        // Visual endpoints
        super::visual::create_visual_plan,
        // Pipeline endpoints
        super::pipeline::full_pipeline,
        // Memory endpoints
        super::memory::get_entry,
        super::memory::cleanup,
        super::memory::backup,
    ),
    info(
        title = "TitanFlow Content Strategy API",
        version = "0.1.0",
        description = "Viral short-form video content from analysis to visual production plans.\n\nAnalysis Engine -> Script Composer -> Visual Planner, with a retention-bounded content memory.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "System", description = "Index, health check and sample requests"),
        (name = "Analysis", description = "Analysis - Insights from viral video records"),
        (name = "Script", description = "Script - Short-form script composition"),
        (name = "Visual", description = "Visual - Scene-by-scene production plans"),
        (name = "Pipeline", description = "Pipeline - Analysis, script and visual plan in one call"),
        (name = "Memory", description = "Memory - Cached analyses, cleanup and backup"),
    ),
    components(
        schemas(
            // Analysis
            VideoRecordInput,
            NicheAttributes,
            HookPattern,
            NicheInsights,
            ContentAnalysis,
            AnalyzeRequest,
            NicheAnalyzeRequest,
            // Script
            Script,
            ScriptRequest,
            // Visual
            SceneKind,
            Scene,
            VisualPlan,
            VisualPlanRequest,
            // Pipeline
            FullPipelineRequest,
            PipelineOutcome,
            PipelineFailure,
            PipelineStage,
            // Memory
            MemoryEntryResponse,
            CleanupResponse,
            BackupRequest,
            BackupResponse,
            // System
            IndexResponse,
            HealthCheck,
        )
    ),
)]
pub struct ApiDoc;
