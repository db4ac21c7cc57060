//! NicheFilter - Conjunctive, case-insensitive substring filter over niche fields

use serde::{Deserialize, Serialize};

use crate::domain::entities::VideoRecord;

/// Target niche / problem / audience filter.
///
/// Each supplied target must appear (case-insensitively) as a substring of the
/// record's corresponding field. A record missing a filtered field never
/// matches. Blank targets are treated as not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NicheFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_niche: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_problem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
}

impl NicheFilter {
    pub fn new(
        target_niche: Option<String>,
        target_problem: Option<String>,
        target_audience: Option<String>,
    ) -> Self {
        Self {
            target_niche: normalize(target_niche),
            target_problem: normalize(target_problem),
            target_audience: normalize(target_audience),
        }
    }

    /// True when at least one target is set
    pub fn is_active(&self) -> bool {
        self.target_niche.is_some() || self.target_problem.is_some() || self.target_audience.is_some()
    }

    pub fn matches(&self, record: &VideoRecord) -> bool {
        let niche = record.niche();
        field_matches(&self.target_niche, &niche.niche)
            && field_matches(&self.target_problem, &niche.problem)
            && field_matches(&self.target_audience, &niche.audience)
    }

    /// Keep only the matching records, preserving order
    pub fn apply(&self, records: &[VideoRecord]) -> Vec<VideoRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

fn normalize(target: Option<String>) -> Option<String> {
    target
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn field_matches(target: &Option<String>, field: &Option<String>) -> bool {
    match (target, field) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(t), Some(f)) => f.to_lowercase().contains(&t.to_lowercase()),
    }
}
