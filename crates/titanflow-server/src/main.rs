use anyhow::Context;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;
mod services;

use adapters::{GeminiContentAnalyzer, SqliteContentMemory};
use application::{AnalysisService, PipelineService};
use config::AppConfig;
use services::scheduler;
use titanflow::{ContentAnalyzer, ComposerConfig, PlannerConfig, ScriptComposer, VisualPlanner};

/// Type aliases for application services with concrete repository implementations
pub type AppAnalysisService = AnalysisService<SqliteContentMemory>;
pub type AppPipelineService = PipelineService<SqliteContentMemory>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub analysis_service: Arc<AppAnalysisService>,
    pub pipeline_service: Arc<AppPipelineService>,
    pub memory: Arc<SqliteContentMemory>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,titanflow_server=debug,sqlx=warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::info!("TitanFlow API initializing...");

    let config = AppConfig::from_env().context("Invalid configuration")?;

    if let Some(api_key) = config.api_key.clone() {
        auth::init_api_key(api_key);
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!("No TITANFLOW_API_KEY set - authentication disabled");
    }

    // Content memory (runs migrations)
    let memory = Arc::new(
        SqliteContentMemory::connect(config.memory.clone())
            .await
            .with_context(|| {
                format!(
                    "Failed to open content memory at {}",
                    config.memory.db_path.display()
                )
            })?,
    );
    tracing::info!(
        "Content memory ready ({}, retention {} days)",
        config.memory.db_path.display(),
        config.memory.retention_days
    );

    let analyzer: Option<Arc<dyn ContentAnalyzer>> = match config.gemini_api_key.clone() {
        Some(key) => {
            let gemini = GeminiContentAnalyzer::new(key).with_model(config.gemini_model.clone());
            tracing::info!("Content analyzer initialized (Gemini {})", gemini.model());
            let gemini: Arc<dyn ContentAnalyzer> = Arc::new(gemini);
            Some(gemini)
        }
        None => {
            tracing::warn!("No GEMINI_API_KEY set - analysis endpoints will answer 503");
            None
        }
    };

    // Initialize application services
    let analysis_service = Arc::new(AnalysisService::new(
        analyzer,
        Some(memory.clone()),
        config.pipeline.analysis_timeout,
    ));
    let composer = ScriptComposer::new(Some(ComposerConfig::default()));
    let planner = VisualPlanner::new(Some(PlannerConfig {
        words_per_second: composer.words_per_second(),
        ..Default::default()
    }));
    let pipeline_service = Arc::new(PipelineService::new(
        analysis_service.clone(),
        composer,
        planner,
        Some(config.pipeline.clone()),
    ));

    let state = AppState {
        analysis_service,
        pipeline_service,
        memory: memory.clone(),
    };

    if let Some(_handle) = scheduler::maybe_start_scheduler(
        memory,
        config.memory.backup_location.clone(),
        config.maintenance_interval,
    ) {
        tracing::info!("Maintenance scheduler started");
    } else {
        tracing::info!("Maintenance scheduler disabled (TITANFLOW_MAINTENANCE_INTERVAL_SECS not set)");
    }

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("TitanFlow API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Public system routes and docs, plus the authenticated API
fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::analysis::router())
        .merge(routes::script::router())
        .merge(routes::visual::router())
        .merge(routes::pipeline::router())
        .merge(routes::memory::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(routes::system::router())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{memory_store, sample_raw_records, StubAnalyzer};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    async fn app(dir: &tempfile::TempDir, analyzer: Option<Arc<dyn ContentAnalyzer>>) -> Router {
        let memory = Arc::new(memory_store(dir).await);
        let analysis_service = Arc::new(AnalysisService::new(
            analyzer,
            Some(memory.clone()),
            Duration::from_secs(5),
        ));
        let pipeline_service = Arc::new(PipelineService::new(
            analysis_service.clone(),
            ScriptComposer::default(),
            VisualPlanner::default(),
            None,
        ));
        build_router(AppState {
            analysis_service,
            pipeline_service,
            memory,
        })
    }

    fn stub() -> Option<Arc<dyn ContentAnalyzer>> {
        let analyzer: Arc<dyn ContentAnalyzer> = Arc::new(StubAnalyzer::default());
        Some(analyzer)
    }

    async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_full_pipeline_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = post(
            app(&dir, stub()).await,
            "/full-pipeline",
            json!({"videos": sample_raw_records(None), "platform": "tiktok"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["script"]["platform"], "TikTok");
        assert!(!body["visual_plan"]["scenes"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_degraded_mode_answers_503_but_scripts_still_work() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir, None).await;

        let (status, _) = post(
            app.clone(),
            "/analyze",
            json!({"videos": sample_raw_records(None)}),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = post(
            app,
            "/generate-script",
            json!({
                "hook_patterns": [{"type": "question-based", "example": "Did you know this?"}],
                "summary": "Quick tips perform well.",
                "platform": "YouTube Shorts"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["platform"], "YouTube Shorts");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir, stub()).await;

        let (status, _) = post(
            app.clone(),
            "/generate-script",
            json!({"platform": "vine", "summary": "s"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(app.clone(), "/generate-script", json!({})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // niche filter matches nothing: empty analysis, script stage fails
        let (status, body) = post(
            app,
            "/full-pipeline",
            json!({"videos": sample_raw_records(None), "target_niche": "cooking"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["stage"], "script");
        assert_eq!(body["kind"], "composition_error");
        assert_eq!(body["analysis"]["hook_patterns"], json!([]));
        assert!(body["script"].is_null());
    }

    #[tokio::test]
    async fn test_backup_names_stay_inside_backup_directory() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir, stub()).await;

        let (status, _) = post(
            app.clone(),
            "/memory/backup",
            json!({"file_name": "../outside.db"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("outside.db").exists());

        let (status, body) = post(app, "/memory/backup", json!({"file_name": "manual.db"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["path"],
            dir.path().join("backups").join("manual.db").display().to_string()
        );
    }

    #[tokio::test]
    async fn test_missing_memory_entry_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir, stub())
            .await
            .oneshot(Request::get("/memory/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
