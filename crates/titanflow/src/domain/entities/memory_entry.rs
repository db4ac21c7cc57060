//! MemoryEntry - A cached analysis keyed by video id

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ContentAnalysis;
use crate::domain::value_objects::Platform;

/// A stored analysis. Owned by the memory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub video_id: String,
    pub platform: Platform,
    pub analysis: ContentAnalysis,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl MemoryEntry {
    /// An entry is live while `now - last_updated <= retention`
    pub fn is_live(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        now.signed_duration_since(self.last_updated) <= retention
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liveness_boundary_is_inclusive() {
        let now = Utc::now();
        let entry = MemoryEntry {
            video_id: "v".to_string(),
            platform: Platform::TikTok,
            analysis: ContentAnalysis::empty(),
            created_at: now - Duration::days(30),
            last_updated: now - Duration::days(30),
        };
        assert!(entry.is_live(now, Duration::days(30)));
        assert!(!entry.is_live(now + Duration::seconds(1), Duration::days(30)));
    }
}
