//! VideoRecord - Validated input unit describing a short-form video

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

/// Keys whose presence on a raw record mapping marks it as niche-enhanced
pub const NICHE_KEYS: [&str; 8] = [
    "problem",
    "audience",
    "solution",
    "emotional_triggers",
    "niche",
    "sub_niche",
    "pain_points",
    "value_proposition",
];

/// Optional niche-specific attributes of a video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NicheAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_triggers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_niche: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_points: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_proposition: Option<String>,
}

impl NicheAttributes {
    /// True when at least one attribute carries a value
    pub fn is_present(&self) -> bool {
        [
            &self.problem,
            &self.audience,
            &self.solution,
            &self.emotional_triggers,
            &self.niche,
            &self.sub_niche,
            &self.pain_points,
            &self.value_proposition,
        ]
        .iter()
        .any(|v| v.is_some())
    }
}

/// Wire shape of a video record, before validation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoRecordInput {
    pub title: String,
    pub description: String,
    pub views: i64,
    #[serde(rename = "publishedAt", alias = "published_at")]
    pub published_at: String,
    pub channel: String,
    #[serde(flatten)]
    pub niche: NicheAttributes,
}

/// A validated video record. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRecord {
    title: String,
    description: String,
    views: u64,
    #[serde(rename = "publishedAt")]
    published_at: NaiveDate,
    channel: String,
    #[serde(flatten)]
    niche: NicheAttributes,
}

impl VideoRecord {
    /// Create a validated record
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        views: u64,
        published_at: NaiveDate,
        channel: impl Into<String>,
        niche: NicheAttributes,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let channel = channel.into();

        if title.trim().is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        if channel.trim().is_empty() {
            return Err(DomainError::validation("channel must not be empty"));
        }

        Ok(Self {
            title,
            description: description.into(),
            views,
            published_at,
            channel,
            niche,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn views(&self) -> u64 {
        self.views
    }

    pub fn published_at(&self) -> NaiveDate {
        self.published_at
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn niche(&self) -> &NicheAttributes {
        &self.niche
    }

    pub fn has_niche_fields(&self) -> bool {
        self.niche.is_present()
    }

    /// Copy of this record with every niche attribute removed
    pub fn without_niche_fields(&self) -> Self {
        Self {
            niche: NicheAttributes::default(),
            ..self.clone()
        }
    }
}

impl TryFrom<VideoRecordInput> for VideoRecord {
    type Error = DomainError;

    fn try_from(input: VideoRecordInput) -> Result<Self, Self::Error> {
        let views = u64::try_from(input.views).map_err(|_| {
            DomainError::validation(format!("views must be non-negative, got {}", input.views))
        })?;
        let published_at = parse_published_at(&input.published_at)?;

        VideoRecord::new(
            input.title,
            input.description,
            views,
            published_at,
            input.channel,
            input.niche,
        )
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
fn parse_published_at(raw: &str) -> Result<NaiveDate, DomainError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| DomainError::validation(format!("publishedAt is not a valid date: '{}'", raw)))
}

/// Validate a batch of wire records, reporting the offending index
pub fn validate_records(inputs: Vec<VideoRecordInput>) -> Result<Vec<VideoRecord>, DomainError> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            VideoRecord::try_from(input).map_err(|e| match e {
                DomainError::Validation(msg) => {
                    DomainError::validation(format!("record {}: {}", i, msg))
                }
                other => other,
            })
        })
        .collect()
}

/// Parse raw record mappings (as received by the full pipeline)
pub fn parse_raw_records(raw: &[serde_json::Value]) -> Result<Vec<VideoRecord>, DomainError> {
    let inputs = raw
        .iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value::<VideoRecordInput>(value.clone())
                .map_err(|e| DomainError::validation(format!("record {}: {}", i, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_records(inputs)
}

/// True when any raw mapping carries a niche key, even with a null value
pub fn has_niche_shape(raw: &[serde_json::Value]) -> bool {
    raw.iter().any(|value| {
        value
            .as_object()
            .map(|map| NICHE_KEYS.iter().any(|key| map.contains_key(*key)))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(title: &str, views: i64, published_at: &str) -> VideoRecordInput {
        VideoRecordInput {
            title: title.to_string(),
            description: "desc".to_string(),
            views,
            published_at: published_at.to_string(),
            channel: "Channel".to_string(),
            niche: NicheAttributes::default(),
        }
    }

    #[test]
    fn test_valid_record() {
        let record = VideoRecord::try_from(input("Title", 10, "2023-05-15")).unwrap();
        assert_eq!(record.views(), 10);
        assert_eq!(
            record.published_at(),
            NaiveDate::from_ymd_opt(2023, 5, 15).unwrap()
        );
        assert!(!record.has_niche_fields());
    }

    #[test]
    fn test_rfc3339_date_accepted() {
        let record = VideoRecord::try_from(input("Title", 1, "2023-06-02T10:00:00Z")).unwrap();
        assert_eq!(
            record.published_at(),
            NaiveDate::from_ymd_opt(2023, 6, 2).unwrap()
        );
    }

    #[test]
    fn test_invalid_records_rejected() {
        assert!(matches!(
            VideoRecord::try_from(input("Title", -1, "2023-05-15")),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            VideoRecord::try_from(input("  ", 1, "2023-05-15")),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            VideoRecord::try_from(input("Title", 1, "yesterday")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_records_reports_index() {
        let err = validate_records(vec![input("ok", 1, "2023-01-01"), input("bad", -5, "2023-01-01")])
            .unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_raw_records_and_shape_detection() {
        let plain = vec![json!({
            "title": "5 Morning Habits That Changed My Life",
            "description": "I tried these",
            "views": 1500000,
            "publishedAt": "2023-05-15",
            "channel": "ProductivityGuru"
        })];
        assert!(!has_niche_shape(&plain));
        let records = parse_raw_records(&plain).unwrap();
        assert_eq!(records[0].channel(), "ProductivityGuru");

        let enhanced = vec![json!({
            "title": "t",
            "description": "d",
            "views": 1,
            "publishedAt": "2023-05-15",
            "channel": "c",
            "niche": null
        })];
        assert!(has_niche_shape(&enhanced));

        let missing_title = vec![json!({"views": 1})];
        assert!(matches!(
            parse_raw_records(&missing_title),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_without_niche_fields() {
        let mut raw = input("Title", 1, "2023-05-15");
        raw.niche.niche = Some("productivity".to_string());
        let record = VideoRecord::try_from(raw).unwrap();
        assert!(record.has_niche_fields());
        let stripped = record.without_niche_fields();
        assert!(!stripped.has_niche_fields());
        assert_eq!(stripped.title(), record.title());
    }
}
