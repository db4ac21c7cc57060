//! Shared fixtures for application tests

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use titanflow::{ContentAnalysis, ContentAnalyzer, DomainError, HookPattern, NicheAttributes, VideoRecord};

use crate::adapters::{MemoryConfig, SqliteContentMemory};

/// Deterministic analyzer deriving every insight from the records it receives
#[derive(Default)]
pub struct StubAnalyzer {
    calls: AtomicUsize,
    saw_niche: AtomicBool,
    delay: Option<Duration>,
}

impl StubAnalyzer {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn saw_no_niche_fields(&self) -> bool {
        !self.saw_niche.load(Ordering::SeqCst)
    }
}

fn hook_type(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    if lower.contains('?') {
        "question-based"
    } else if lower.contains("wrong") || lower.contains("never") {
        "shock-based"
    } else if lower.starts_with(|c: char| c.is_ascii_digit()) {
        "list-based"
    } else {
        "story-based"
    }
}

#[async_trait]
impl ContentAnalyzer for StubAnalyzer {
    async fn summarize(&self, records: &[VideoRecord]) -> Result<ContentAnalysis, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if records.iter().any(VideoRecord::has_niche_fields) {
            self.saw_niche.store(true, Ordering::SeqCst);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let total_views: u64 = records.iter().map(VideoRecord::views).sum();
        Ok(ContentAnalysis {
            hook_patterns: records
                .iter()
                .map(|r| HookPattern::new(hook_type(r.title()), r.title()))
                .collect(),
            format_trends: vec!["Hook -> Insight -> Visual Demo -> CTA".to_string()],
            engagement_tactics: vec![
                "Open loops (e.g., 'Wait for it...')".to_string(),
                "Direct CTAs ('Follow me for more')".to_string(),
            ],
            content_themes: records.iter().map(|r| r.description().to_string()).collect(),
            summary: format!(
                "{} videos with {} combined views. {}",
                records.len(),
                total_views,
                records
                    .iter()
                    .map(|r| r.description())
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            niche_insights: None,
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// The two sample videos as raw request mappings, optionally tagged with a niche
pub fn sample_raw_records(niche: Option<&str>) -> Vec<Value> {
    let mut records = vec![
        json!({
            "title": "5 Morning Habits That Changed My Life",
            "description": "I tried these 5 morning habits for 30 days and here's what happened...",
            "views": 1500000,
            "publishedAt": "2023-05-15",
            "channel": "ProductivityGuru"
        }),
        json!({
            "title": "You've Been Charging Your Phone Wrong",
            "description": "This simple trick will make your battery last twice as long!",
            "views": 2300000,
            "publishedAt": "2023-06-02",
            "channel": "TechHacks"
        }),
    ];
    if let Some(niche) = niche {
        for record in &mut records {
            record["niche"] = json!(niche);
        }
    }
    records
}

pub fn sample_records(niche: Option<NicheAttributes>) -> Vec<VideoRecord> {
    let niche = niche.unwrap_or_default();
    vec![
        VideoRecord::new(
            "5 Morning Habits That Changed My Life",
            "I tried these 5 morning habits for 30 days and here's what happened...",
            1_500_000,
            NaiveDate::from_ymd_opt(2023, 5, 15).unwrap(),
            "ProductivityGuru",
            niche.clone(),
        )
        .unwrap(),
        VideoRecord::new(
            "You've Been Charging Your Phone Wrong",
            "This simple trick will make your battery last twice as long!",
            2_300_000,
            NaiveDate::from_ymd_opt(2023, 6, 2).unwrap(),
            "TechHacks",
            niche,
        )
        .unwrap(),
    ]
}

pub async fn memory_store(dir: &tempfile::TempDir) -> SqliteContentMemory {
    SqliteContentMemory::connect(MemoryConfig {
        db_path: dir.path().join("content_memory.db"),
        retention_days: 30,
        backup_location: dir.path().join("backups"),
    })
    .await
    .unwrap()
}
