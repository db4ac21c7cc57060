//! Platform - Target short-form video platform

use serde::{Deserialize, Serialize};

/// Target platform for a script or visual plan.
///
/// Serialized with its display label (`"TikTok"`), parsed leniently from
/// either the label or the short code (`"tiktok"`, `"youtube_shorts"`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    #[default]
    TikTok,
    YoutubeShorts,
    InstagramReels,
    All,
}

impl Platform {
    /// Short code used in storage and on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Platform::TikTok => "tiktok",
            Platform::YoutubeShorts => "youtube_shorts",
            Platform::InstagramReels => "instagram_reels",
            Platform::All => "all",
        }
    }

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok",
            Platform::YoutubeShorts => "YouTube Shorts",
            Platform::InstagramReels => "Instagram Reels",
            Platform::All => "All",
        }
    }

    /// Upper bound of the duration the platform's audience sits through comfortably
    pub fn sweet_spot_secs(&self) -> u32 {
        match self {
            Platform::TikTok => 45,
            Platform::YoutubeShorts => 58,
            Platform::InstagramReels => 60,
            Platform::All => 45,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "tiktok" => Ok(Platform::TikTok),
            "youtubeshorts" | "shorts" | "youtube" => Ok(Platform::YoutubeShorts),
            "instagramreels" | "reels" | "instagram" => Ok(Platform::InstagramReels),
            "all" | "" => Ok(Platform::All),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.label().to_string()
    }
}
