//! SQLite implementation of ContentMemoryRepository

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use titanflow::{
    Clock, ContentAnalysis, ContentMemoryRepository, DomainError, MemoryEntry, Platform,
    SystemClock,
};

/// Memory store configuration
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    pub db_path: PathBuf,
    /// Entries older than this are expired on read and removed by cleanup
    pub retention_days: u32,
    /// Default backup directory
    pub backup_location: PathBuf,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("content_memory.db"),
            retention_days: 30,
            backup_location: PathBuf::from("backups"),
        }
    }
}

impl MemoryConfig {
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.retention_days))
    }
}

/// SQLite-backed content memory.
///
/// Each write is a single upsert statement, so an entry is replaced
/// all-or-nothing. Cleanup and backup take the maintenance lock exclusively;
/// writers share it.
pub struct SqliteContentMemory {
    pool: SqlitePool,
    config: MemoryConfig,
    clock: Arc<dyn Clock>,
    maintenance: RwLock<()>,
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ContentMemoryRow {
    video_id: String,
    platform: String,
    analysis_data: String,
    created_at: i64,
    last_updated: i64,
}

impl TryFrom<ContentMemoryRow> for MemoryEntry {
    type Error = DomainError;

    fn try_from(row: ContentMemoryRow) -> Result<Self, Self::Error> {
        let platform = row
            .platform
            .parse::<Platform>()
            .map_err(DomainError::storage)?;
        let analysis: ContentAnalysis = serde_json::from_str(&row.analysis_data).map_err(|e| {
            DomainError::storage(format!("Corrupt analysis for '{}': {}", row.video_id, e))
        })?;

        Ok(Self {
            video_id: row.video_id,
            platform,
            analysis,
            created_at: from_millis(row.created_at)?,
            last_updated: from_millis(row.last_updated)?,
        })
    }
}

fn from_millis(millis: i64) -> Result<chrono::DateTime<chrono::Utc>, DomainError> {
    chrono::DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DomainError::storage(format!("Invalid timestamp: {}", millis)))
}

impl SqliteContentMemory {
    /// Open (or create) the database at `config.db_path` and run migrations
    pub async fn connect(config: MemoryConfig) -> Result<Self, DomainError> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to open memory store: {}", e)))?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to run migrations: {}", e)))?;

        tracing::info!(
            "Content memory opened at {} (retention: {} days)",
            config.db_path.display(),
            config.retention_days
        );

        Ok(Self {
            pool,
            config,
            clock: Arc::new(SystemClock),
            maintenance: RwLock::new(()),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Oldest `last_updated` (millis) that is still live
    fn cutoff_millis(&self) -> i64 {
        self.clock
            .now()
            .checked_sub_signed(self.config.retention())
            .map(|cutoff| cutoff.timestamp_millis())
            .unwrap_or(i64::MIN)
    }

    fn backup_target(&self, destination: &Path) -> PathBuf {
        if destination.extension().is_some() && !destination.is_dir() {
            destination.to_path_buf()
        } else {
            let stamp = self.clock.now().format("%Y%m%d_%H%M%S");
            destination.join(format!("content_memory_{}.db", stamp))
        }
    }
}

#[async_trait]
impl ContentMemoryRepository for SqliteContentMemory {
    async fn add_content(
        &self,
        video_id: &str,
        platform: Platform,
        analysis: &ContentAnalysis,
    ) -> Result<(), DomainError> {
        if video_id.trim().is_empty() {
            return Err(DomainError::validation("video_id must not be empty"));
        }

        let payload = serde_json::to_string(analysis)
            .map_err(|e| DomainError::storage(format!("Failed to encode analysis: {}", e)))?;

        let _shared = self.maintenance.read().await;
        let now = self.clock.now().timestamp_millis();

        sqlx::query(
            r#"
            INSERT INTO content_memory (video_id, platform, analysis_data, created_at, last_updated)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(video_id) DO UPDATE SET
                platform = excluded.platform,
                analysis_data = excluded.analysis_data,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(video_id)
        .bind(platform.code())
        .bind(&payload)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to store '{}': {}", video_id, e)))?;

        tracing::debug!("Stored analysis for {} ({})", video_id, platform.code());
        Ok(())
    }

    async fn get_content(&self, video_id: &str) -> Result<Option<ContentAnalysis>, DomainError> {
        Ok(self.find_entry(video_id).await?.map(|entry| entry.analysis))
    }

    async fn find_entry(&self, video_id: &str) -> Result<Option<MemoryEntry>, DomainError> {
        let row = sqlx::query_as::<_, ContentMemoryRow>(
            r#"
            SELECT video_id, platform, analysis_data, created_at, last_updated
            FROM content_memory
            WHERE video_id = ? AND last_updated >= ?
            "#,
        )
        .bind(video_id)
        .bind(self.cutoff_millis())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to read '{}': {}", video_id, e)))?;

        row.map(MemoryEntry::try_from).transpose()
    }

    async fn cleanup_old_entries(&self) -> Result<u64, DomainError> {
        let _exclusive = self.maintenance.write().await;

        let result = sqlx::query("DELETE FROM content_memory WHERE last_updated < ?")
            .bind(self.cutoff_millis())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Cleanup failed: {}", e)))?;

        let deleted = result.rows_affected();
        tracing::info!(
            "Removed {} expired entries (retention: {} days)",
            deleted,
            self.config.retention_days
        );
        Ok(deleted)
    }

    async fn backup(&self, destination: &Path) -> Result<PathBuf, DomainError> {
        let target = self.backup_target(destination);
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to create backup directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let _exclusive = self.maintenance.write().await;

        // VACUUM INTO will not overwrite, so write a sibling and rename it over the target
        let staging = staging_path(&target);
        remove_if_present(&staging).await?;

        let vacuum = sqlx::query("VACUUM INTO ?")
            .bind(staging.to_string_lossy().into_owned())
            .execute(&self.pool)
            .await;
        if let Err(e) = vacuum {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(DomainError::storage(format!(
                "Backup to {} failed: {}",
                target.display(),
                e
            )));
        }

        tokio::fs::rename(&staging, &target).await.map_err(|e| {
            DomainError::storage(format!("Backup to {} failed: {}", target.display(), e))
        })?;

        tracing::info!("Backed up content memory to {}", target.display());
        Ok(target)
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    target.with_file_name(name)
}

async fn remove_if_present(path: &Path) -> Result<(), DomainError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DomainError::storage(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Mutex;
    use titanflow::HookPattern;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(
                Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            )))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    async fn store(dir: &tempfile::TempDir, clock: Arc<ManualClock>) -> SqliteContentMemory {
        let config = MemoryConfig {
            db_path: dir.path().join("content_memory.db"),
            retention_days: 30,
            backup_location: dir.path().join("backups"),
        };
        SqliteContentMemory::connect(config)
            .await
            .unwrap()
            .with_clock(clock)
    }

    fn analysis(summary: &str) -> ContentAnalysis {
        ContentAnalysis {
            hook_patterns: vec![HookPattern::new("question-based", "Why does this work?")],
            summary: summary.to_string(),
            ..Default::default()
        }
    }

    async fn row_count(memory: &SqliteContentMemory) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM content_memory")
            .fetch_one(&memory.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let memory = store(&dir, ManualClock::new()).await;

        let a = analysis("first");
        memory.add_content("vid-1", Platform::TikTok, &a).await.unwrap();

        assert_eq!(memory.get_content("vid-1").await.unwrap(), Some(a));
        assert_eq!(memory.get_content("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_replaces_payload_and_keeps_created_at() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();
        let memory = store(&dir, clock.clone()).await;

        memory
            .add_content("vid-1", Platform::TikTok, &analysis("first"))
            .await
            .unwrap();
        let created = memory.find_entry("vid-1").await.unwrap().unwrap().created_at;

        clock.advance(Duration::hours(2));
        memory
            .add_content("vid-1", Platform::InstagramReels, &analysis("second"))
            .await
            .unwrap();

        let entry = memory.find_entry("vid-1").await.unwrap().unwrap();
        assert_eq!(entry.analysis.summary, "second");
        assert_eq!(entry.platform, Platform::InstagramReels);
        assert_eq!(entry.created_at, created);
        assert_eq!(entry.last_updated, created + Duration::hours(2));
        assert_eq!(row_count(&memory).await, 1);
    }

    #[tokio::test]
    async fn test_expired_entries_are_hidden_but_kept() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();
        let memory = store(&dir, clock.clone()).await;

        memory
            .add_content("vid-1", Platform::TikTok, &analysis("old"))
            .await
            .unwrap();

        clock.advance(Duration::days(30));
        assert!(memory.get_content("vid-1").await.unwrap().is_some());

        clock.advance(Duration::seconds(1));
        assert!(memory.get_content("vid-1").await.unwrap().is_none());
        assert_eq!(row_count(&memory).await, 1);
    }

    #[tokio::test]
    async fn test_cleanup_removes_exactly_expired_rows() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();
        let memory = store(&dir, clock.clone()).await;

        memory
            .add_content("old", Platform::TikTok, &analysis("old"))
            .await
            .unwrap();
        clock.advance(Duration::days(10));
        memory
            .add_content("boundary", Platform::TikTok, &analysis("boundary"))
            .await
            .unwrap();
        clock.advance(Duration::days(20));
        memory
            .add_content("fresh", Platform::TikTok, &analysis("fresh"))
            .await
            .unwrap();
        clock.advance(Duration::days(1));

        // old: 31 days, boundary: 21 days, fresh: 1 day
        assert_eq!(memory.cleanup_old_entries().await.unwrap(), 1);
        assert_eq!(row_count(&memory).await, 2);
        assert!(memory.get_content("boundary").await.unwrap().is_some());
        assert!(memory.get_content("fresh").await.unwrap().is_some());

        clock.advance(Duration::days(9));
        // boundary is exactly at the retention limit and survives
        assert_eq!(memory.cleanup_old_entries().await.unwrap(), 0);

        clock.advance(Duration::milliseconds(1));
        assert_eq!(memory.cleanup_old_entries().await.unwrap(), 1);
        assert_eq!(row_count(&memory).await, 1);
    }

    #[tokio::test]
    async fn test_backup_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let memory = store(&dir, ManualClock::new()).await;
        memory
            .add_content("vid-1", Platform::TikTok, &analysis("kept"))
            .await
            .unwrap();

        let backup_dir = dir.path().join("nested").join("backups");
        let path = memory.backup(&backup_dir).await.unwrap();

        assert_eq!(path, backup_dir.join("content_memory_20250301_120000.db"));
        assert!(path.exists());

        let copy = SqliteContentMemory::connect(MemoryConfig {
            db_path: path,
            ..MemoryConfig::default()
        })
        .await
        .unwrap()
        .with_clock(ManualClock::new());
        assert_eq!(
            copy.get_content("vid-1").await.unwrap().unwrap().summary,
            "kept"
        );
    }

    #[tokio::test]
    async fn test_repeated_backups_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let memory = store(&dir, ManualClock::new()).await;
        memory
            .add_content("vid-1", Platform::TikTok, &analysis("first"))
            .await
            .unwrap();

        // same clock second, so both land on the same file name
        let backup_dir = dir.path().join("backups");
        let first = memory.backup(&backup_dir).await.unwrap();
        memory
            .add_content("vid-2", Platform::TikTok, &analysis("second"))
            .await
            .unwrap();
        let second = memory.backup(&backup_dir).await.unwrap();
        assert_eq!(first, second);

        let file = dir.path().join("snapshot.db");
        memory.backup(&file).await.unwrap();
        assert_eq!(memory.backup(&file).await.unwrap(), file);

        let copy = SqliteContentMemory::connect(MemoryConfig {
            db_path: second,
            ..MemoryConfig::default()
        })
        .await
        .unwrap()
        .with_clock(ManualClock::new());
        assert!(copy.get_content("vid-2").await.unwrap().is_some());
        assert!(!staging_path(&file).exists());
    }

    #[tokio::test]
    async fn test_backup_to_unwritable_path_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let memory = store(&dir, ManualClock::new()).await;

        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = memory.backup(&blocker.join("backups")).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new();
        let memory = store(&dir, clock.clone()).await;

        memory
            .add_content("vid-1", Platform::TikTok, &analysis("original"))
            .await
            .unwrap();
        let before = memory.find_entry("vid-1").await.unwrap().unwrap();

        sqlx::query(
            "CREATE TRIGGER reject_updates BEFORE UPDATE ON content_memory \
             BEGIN SELECT RAISE(ABORT, 'writes rejected'); END",
        )
        .execute(&memory.pool)
        .await
        .unwrap();

        clock.advance(Duration::hours(1));
        let err = memory
            .add_content("vid-1", Platform::YoutubeShorts, &analysis("replacement"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));

        let after = memory.find_entry("vid-1").await.unwrap().unwrap();
        assert_eq!(after, before);
        assert_eq!(after.analysis.summary, "original");
        assert_eq!(after.last_updated, before.last_updated);
    }

    #[tokio::test]
    async fn test_huge_retention_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let memory = SqliteContentMemory::connect(MemoryConfig {
            db_path: dir.path().join("content_memory.db"),
            retention_days: u32::MAX,
            backup_location: dir.path().join("backups"),
        })
        .await
        .unwrap()
        .with_clock(ManualClock::new());

        memory
            .add_content("vid-1", Platform::TikTok, &analysis("kept"))
            .await
            .unwrap();
        assert!(memory.get_content("vid-1").await.unwrap().is_some());
        assert_eq!(memory.cleanup_old_entries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_writes() {
        let dir = tempfile::tempdir().unwrap();
        let memory = Arc::new(store(&dir, ManualClock::new()).await);

        let mut handles = Vec::new();
        for i in 0..16 {
            let memory = memory.clone();
            handles.push(tokio::spawn(async move {
                let key = if i % 2 == 0 { "shared".to_string() } else { format!("vid-{}", i) };
                memory
                    .add_content(&key, Platform::TikTok, &analysis(&format!("write {}", i)))
                    .await
            }));
        }
        let cleanup = {
            let memory = memory.clone();
            tokio::spawn(async move { memory.cleanup_old_entries().await })
        };

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(cleanup.await.unwrap().unwrap(), 0);

        let shared = memory.get_content("shared").await.unwrap().unwrap();
        assert!(shared.summary.starts_with("write "));
        assert_eq!(row_count(&memory).await, 9);
    }

    #[tokio::test]
    async fn test_empty_video_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let memory = store(&dir, ManualClock::new()).await;
        let err = memory
            .add_content("  ", Platform::TikTok, &analysis("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
