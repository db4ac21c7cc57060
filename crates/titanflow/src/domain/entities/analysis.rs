//! ContentAnalysis - Structured content-strategy insights

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

use crate::domain::entities::VideoRecord;

/// A hook archetype with a representative line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HookPattern {
    #[serde(rename = "type")]
    pub hook_type: String,
    pub example: String,
}

impl HookPattern {
    pub fn new(hook_type: impl Into<String>, example: impl Into<String>) -> Self {
        Self {
            hook_type: hook_type.into(),
            example: example.into(),
        }
    }
}

/// Distinct niche values observed across a filtered record set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NicheInsights {
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub problems: BTreeSet<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub audiences: BTreeSet<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub solutions: BTreeSet<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub emotional_triggers: BTreeSet<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub niches: BTreeSet<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub sub_niches: BTreeSet<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub pain_points: BTreeSet<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub value_propositions: BTreeSet<String>,
}

impl NicheInsights {
    /// Per-category union of the non-empty niche values across `records`.
    ///
    /// Returns `None` when no record carries any niche attribute.
    pub fn from_records(records: &[VideoRecord]) -> Option<Self> {
        if !records.iter().any(VideoRecord::has_niche_fields) {
            return None;
        }

        let mut insights = Self::default();
        for record in records {
            let niche = record.niche();
            insert_value(&mut insights.problems, &niche.problem);
            insert_value(&mut insights.audiences, &niche.audience);
            insert_value(&mut insights.solutions, &niche.solution);
            insert_value(&mut insights.emotional_triggers, &niche.emotional_triggers);
            insert_value(&mut insights.niches, &niche.niche);
            insert_value(&mut insights.sub_niches, &niche.sub_niche);
            insert_value(&mut insights.pain_points, &niche.pain_points);
            insert_value(&mut insights.value_propositions, &niche.value_proposition);
        }
        Some(insights)
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
            && self.audiences.is_empty()
            && self.solutions.is_empty()
            && self.emotional_triggers.is_empty()
            && self.niches.is_empty()
            && self.sub_niches.is_empty()
            && self.pain_points.is_empty()
            && self.value_propositions.is_empty()
    }
}

fn insert_value(set: &mut BTreeSet<String>, value: &Option<String>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            set.insert(trimmed.to_string());
        }
    }
}

/// Content analysis produced by the analysis stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContentAnalysis {
    #[serde(default)]
    pub hook_patterns: Vec<HookPattern>,
    #[serde(default)]
    pub format_trends: Vec<String>,
    #[serde(default)]
    pub engagement_tactics: Vec<String>,
    #[serde(default)]
    pub content_themes: Vec<String>,
    #[serde(default)]
    pub summary: String,
    /// Present only when the analysis came from niche-filtered input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub niche_insights: Option<NicheInsights>,
}

impl ContentAnalysis {
    /// Analysis of an empty record set
    pub fn empty() -> Self {
        Self::default()
    }

    /// The dominant theme, taken to be the first listed one
    pub fn dominant_theme(&self) -> Option<&str> {
        self.content_themes
            .iter()
            .map(|t| t.trim())
            .find(|t| !t.is_empty())
    }
}
