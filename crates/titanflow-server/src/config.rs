//! Server configuration from the environment

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use titanflow::Platform;

use crate::adapters::gemini::DEFAULT_MODEL;
use crate::adapters::MemoryConfig;
use crate::application::PipelineConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server reads from its environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Enables the maintenance scheduler when set
    pub maintenance_interval: Option<Duration>,
    pub memory: MemoryConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let memory_defaults = MemoryConfig::default();
        let pipeline_defaults = PipelineConfig::default();

        let memory = MemoryConfig {
            db_path: get("TITANFLOW_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(memory_defaults.db_path),
            retention_days: parse_var(&get, "TITANFLOW_RETENTION_DAYS")?
                .unwrap_or(memory_defaults.retention_days),
            backup_location: get("TITANFLOW_BACKUP_DIR")
                .map(PathBuf::from)
                .unwrap_or(memory_defaults.backup_location),
        };

        let default_platform = match get("TITANFLOW_DEFAULT_PLATFORM") {
            Some(value) => value.parse::<Platform>().map_err(|reason| ConfigError::Invalid {
                var: "TITANFLOW_DEFAULT_PLATFORM",
                value,
                reason,
            })?,
            None => pipeline_defaults.default_platform,
        };

        let pipeline = PipelineConfig {
            default_platform,
            analysis_timeout: parse_var::<u64>(&get, "TITANFLOW_ANALYSIS_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(pipeline_defaults.analysis_timeout),
            ..pipeline_defaults
        };

        Ok(Self {
            port: parse_var(&get, "PORT")?.unwrap_or(8000),
            api_key: get("TITANFLOW_API_KEY"),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            maintenance_interval: parse_var::<u64>(&get, "TITANFLOW_MAINTENANCE_INTERVAL_SECS")?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            memory,
            pipeline,
        })
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(var)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.memory.retention_days, 30);
        assert_eq!(config.memory.db_path, PathBuf::from("content_memory.db"));
        assert_eq!(config.memory.backup_location, PathBuf::from("backups"));
        assert_eq!(config.pipeline.default_platform, Platform::TikTok);
        assert_eq!(config.pipeline.analysis_timeout, Duration::from_secs(60));
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert!(config.gemini_api_key.is_none());
        assert!(config.maintenance_interval.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("TITANFLOW_RETENTION_DAYS", "7"),
            ("TITANFLOW_DEFAULT_PLATFORM", "instagram_reels"),
            ("TITANFLOW_MAINTENANCE_INTERVAL_SECS", "3600"),
            ("GEMINI_API_KEY", "key"),
            ("TITANFLOW_API_KEY", ""),
        ])
        .unwrap();
        assert_eq!(config.memory.retention_days, 7);
        assert_eq!(config.pipeline.default_platform, Platform::InstagramReels);
        assert_eq!(config.maintenance_interval, Some(Duration::from_secs(3600)));
        assert_eq!(config.gemini_api_key.as_deref(), Some("key"));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(config(&[("TITANFLOW_RETENTION_DAYS", "-1")]).is_err());
        assert!(config(&[("TITANFLOW_DEFAULT_PLATFORM", "vine")]).is_err());
        assert!(config(&[("PORT", "http")]).is_err());
    }
}
