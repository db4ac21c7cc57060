//! Content Memory Repository Port
//!
//! Retention-bounded cache of analyses keyed by `video_id`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::{errors::DomainError, ContentAnalysis, MemoryEntry, Platform};

/// Repository interface for cached content analyses
#[async_trait]
pub trait ContentMemoryRepository: Send + Sync {
    /// Insert or fully replace the entry for `video_id`, refreshing `last_updated`.
    ///
    /// All-or-nothing: a failed write leaves any previous entry untouched.
    async fn add_content(
        &self,
        video_id: &str,
        platform: Platform,
        analysis: &ContentAnalysis,
    ) -> Result<(), DomainError>;

    /// Stored analysis, or `None` when missing or past the retention window.
    /// Expired rows are not deleted by reads.
    async fn get_content(&self, video_id: &str) -> Result<Option<ContentAnalysis>, DomainError>;

    /// Full live entry, with the same expiry rule as `get_content`
    async fn find_entry(&self, video_id: &str) -> Result<Option<MemoryEntry>, DomainError>;

    /// Physically delete every entry older than the retention window.
    /// Returns the number of rows removed.
    async fn cleanup_old_entries(&self) -> Result<u64, DomainError>;

    /// Write a point-in-time copy of the store.
    ///
    /// `destination` may be a directory (a timestamped file is created inside
    /// it) or a file path. Returns the path written.
    async fn backup(&self, destination: &Path) -> Result<PathBuf, DomainError>;
}
