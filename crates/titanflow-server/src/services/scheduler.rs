//! Scheduler Service - Content memory maintenance
//!
//! Periodically removes expired entries and then writes a backup.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use titanflow::ContentMemoryRepository;

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between maintenance cycles
    pub interval: Duration,
    /// Directory backups are written to
    pub backup_location: PathBuf,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(86_400), // 1 day
            backup_location: PathBuf::from("backups"),
        }
    }
}

/// Outcome of one maintenance cycle
#[derive(Debug)]
pub struct MaintenanceReport {
    pub deleted: u64,
    pub backup: PathBuf,
}

/// Maintenance scheduler
pub struct MaintenanceScheduler<M: ContentMemoryRepository> {
    memory: Arc<M>,
    config: SchedulerConfig,
}

impl<M: ContentMemoryRepository + 'static> MaintenanceScheduler<M> {
    pub fn new(memory: Arc<M>, config: Option<SchedulerConfig>) -> Self {
        Self {
            memory,
            config: config.unwrap_or_default(),
        }
    }

    /// Start the scheduler (runs in background)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Cleanup, then backup
    pub async fn run_once(&self) -> Result<MaintenanceReport, titanflow::DomainError> {
        let deleted = self.memory.cleanup_old_entries().await?;
        let backup = self.memory.backup(&self.config.backup_location).await?;
        Ok(MaintenanceReport { deleted, backup })
    }

    async fn run(self) {
        tracing::info!(
            "Maintenance scheduler started (interval: {:?})",
            self.config.interval
        );

        let mut ticker = interval(self.config.interval);

        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match self.run_once().await {
                Ok(report) => tracing::info!(
                    "Maintenance cycle completed ({} expired entries removed, backup at {})",
                    report.deleted,
                    report.backup.display()
                ),
                Err(e) => tracing::warn!("Maintenance cycle failed: {}", e),
            }
        }
    }
}

/// Start the scheduler when an interval is configured
pub fn maybe_start_scheduler<M: ContentMemoryRepository + 'static>(
    memory: Arc<M>,
    backup_location: PathBuf,
    interval: Option<Duration>,
) -> Option<tokio::task::JoinHandle<()>> {
    let interval = interval?;

    let config = SchedulerConfig {
        interval,
        backup_location,
    };

    Some(MaintenanceScheduler::new(memory, Some(config)).start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::memory_store;
    use titanflow::{ContentAnalysis, Platform};

    #[tokio::test]
    async fn test_run_once_cleans_then_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let memory = Arc::new(memory_store(&dir).await);
        memory
            .add_content("vid-1", Platform::TikTok, &ContentAnalysis::empty())
            .await
            .unwrap();

        let scheduler = MaintenanceScheduler::new(
            memory,
            Some(SchedulerConfig {
                backup_location: dir.path().join("backups"),
                ..Default::default()
            }),
        );

        let report = scheduler.run_once().await.unwrap();
        assert_eq!(report.deleted, 0);
        assert!(report.backup.exists());
        assert!(report.backup.starts_with(dir.path().join("backups")));
    }

    #[tokio::test]
    async fn test_scheduler_starts_only_with_interval() {
        let dir = tempfile::tempdir().unwrap();
        let memory = Arc::new(memory_store(&dir).await);
        let backups = dir.path().join("backups");

        assert!(maybe_start_scheduler(memory.clone(), backups.clone(), None).is_none());

        let handle = maybe_start_scheduler(memory, backups, Some(Duration::from_secs(3600)))
            .expect("scheduler should start");
        assert!(!handle.is_finished());
        handle.abort();
    }
}
