//! Script - A short-form video script composed from one analysis

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::value_objects::Platform;

/// Composed script. Stateless and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Script {
    /// Hook line, doubling as the video title
    pub title: String,
    /// Spoken body; beats are separated by blank lines
    #[serde(rename = "script")]
    pub body: String,
    pub cta: String,
    pub theme: String,
    pub hook_type: String,
    /// Estimated length in whole seconds, always positive
    pub estimated_duration: u32,
    #[schema(value_type = String, example = "TikTok")]
    pub platform: Platform,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Script {
    /// Body beats in order, skipping blank paragraphs
    pub fn beats(&self) -> Vec<&str> {
        self.body
            .split("\n\n")
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .collect()
    }
}
