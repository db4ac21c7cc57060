//! Content memory DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use utoipa::ToSchema;

use titanflow::{ContentAnalysis, DomainError, MemoryEntry};

/// Live memory entry
#[derive(Debug, Serialize, ToSchema)]
pub struct MemoryEntryResponse {
    pub video_id: String,
    #[schema(example = "tiktok")]
    pub platform: String,
    pub analysis: ContentAnalysis,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<MemoryEntry> for MemoryEntryResponse {
    fn from(entry: MemoryEntry) -> Self {
        Self {
            video_id: entry.video_id,
            platform: entry.platform.code().to_string(),
            analysis: entry.analysis,
            created_at: entry.created_at,
            last_updated: entry.last_updated,
        }
    }
}

/// Cleanup result
#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResponse {
    pub deleted: u64,
    pub retention_days: u32,
}

/// Backup request
/// Backups always land in the configured backup directory
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BackupRequest {
    /// Plain file name; a timestamped name is used when omitted
    #[serde(alias = "destination")]
    #[schema(example = "before_upgrade.db")]
    pub file_name: Option<String>,
}

impl BackupRequest {
    /// Backup destination inside `backup_location`
    pub fn resolve(&self, backup_location: &Path) -> Result<PathBuf, DomainError> {
        let Some(name) = self.file_name.as_deref().map(str::trim) else {
            return Ok(backup_location.to_path_buf());
        };

        let mut components = Path::new(name).components();
        let file_name = match (components.next(), components.next()) {
            (Some(Component::Normal(file_name)), None) => file_name,
            _ => {
                return Err(DomainError::validation(format!(
                    "backup file name must be a plain file name, got '{}'",
                    name
                )))
            }
        };

        let path = backup_location.join(file_name);
        if path.extension().is_none() {
            Ok(path.with_extension("db"))
        } else {
            Ok(path)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BackupResponse {
    pub path: String,
}
