//! TitanFlow API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// API Client for TitanFlow
pub struct TitanFlowClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptResponse {
    pub title: String,
    pub script: String,
    pub cta: String,
    pub theme: String,
    pub hook_type: String,
    pub estimated_duration: u32,
    pub platform: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneResponse {
    pub index: usize,
    pub kind: String,
    pub timestamp: String,
    pub script_excerpt: String,
    pub footage: String,
    pub text_overlay: String,
    #[serde(default)]
    pub effect: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualPlanResponse {
    pub scenes: Vec<SceneResponse>,
    pub total_duration: u32,
    pub voiceover_guidance: String,
    pub music_guidance: String,
    pub platform: String,
    #[serde(default)]
    pub platform_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub run_id: Uuid,
    pub analysis: Value,
    pub script: ScriptResponse,
    pub visual_plan: VisualPlanResponse,
}

#[derive(Debug, Deserialize)]
pub struct MemoryEntryResponse {
    pub video_id: String,
    pub platform: String,
    pub analysis: Value,
    pub created_at: String,
    pub last_updated: String,
}

#[derive(Debug, Deserialize)]
pub struct CleanupResponse {
    pub deleted: u64,
    pub retention_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct BackupResponse {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct IndexResponse {
    pub analyzer_loaded: bool,
    pub analyzer: Option<String>,
}

#[derive(Debug, Serialize)]
struct BackupRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<&'a str>,
}

impl TitanFlowClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(|k| k.to_string()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = self
            .authorized(request)
            .send()
            .await
            .context("Failed to connect to TitanFlow API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// Service index (degraded-mode flag)
    pub async fn index(&self) -> Result<IndexResponse> {
        self.send(self.client.get(self.url("/"))).await
    }

    /// Analyze videos; `niche` switches to the niche analysis endpoint
    pub async fn analyze(&self, body: &Value, niche: bool) -> Result<Value> {
        let path = if niche { "/niche-analysis" } else { "/analyze" };
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    /// Generate a script from an analysis
    pub async fn generate_script(&self, body: &Value) -> Result<ScriptResponse> {
        self.send(self.client.post(self.url("/generate-script")).json(body))
            .await
    }

    /// Create a visual plan from a script
    pub async fn create_visual_plan(&self, body: &Value) -> Result<VisualPlanResponse> {
        self.send(self.client.post(self.url("/create-visual-plan")).json(body))
            .await
    }

    /// Run the full pipeline
    pub async fn full_pipeline(&self, body: &Value) -> Result<PipelineResponse> {
        self.send(self.client.post(self.url("/full-pipeline")).json(body))
            .await
    }

    /// Get a cached analysis
    pub async fn get_memory(&self, video_id: &str) -> Result<MemoryEntryResponse> {
        let url = self.url(&format!("/memory/{}", urlencoding::encode(video_id)));
        self.send(self.client.get(url)).await
    }

    /// Remove expired entries
    pub async fn cleanup_memory(&self) -> Result<CleanupResponse> {
        self.send(self.client.post(self.url("/memory/cleanup")))
            .await
    }

    /// Back up the memory database into the server's backup directory
    pub async fn backup_memory(&self, file_name: Option<&str>) -> Result<BackupResponse> {
        let request = BackupRequest { file_name };
        self.send(self.client.post(self.url("/memory/backup")).json(&request))
            .await
    }
}
