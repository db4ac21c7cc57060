//! Script Composer - Turns a content analysis into a short-form script
//!
//! Deterministic: identical analysis and platform always produce the same
//! script. The hook is the pattern that correlates best with the dominant
//! theme, body beats come from format trends, engagement tactics and niche
//! insights, and the CTA follows the platform's conventions.

use crate::domain::entities::{ContentAnalysis, HookPattern, NicheInsights, Script};
use crate::domain::errors::DomainError;
use crate::domain::services::text;
use crate::domain::value_objects::Platform;

/// Average speaking pace used for duration estimates
pub const WORDS_PER_SECOND: f64 = 2.5;

/// Hook type keyword -> theme keywords that favour it
const HOOK_AFFINITIES: &[(&str, &[&str])] = &[
    ("shock", &["myth", "wrong", "mistake", "expos", "truth", "never"]),
    ("question", &["why", "what", "curious", "question", "wonder"]),
    ("curiosity", &["secret", "hidden", "nobody", "unknown", "behind"]),
    ("story", &["journey", "story", "life", "experience", "changed"]),
    ("list", &["tips", "habits", "ways", "steps", "hacks"]),
    ("pain", &["struggle", "problem", "pain", "stress", "overwhelm"]),
    ("how", &["guide", "tutorial", "hack", "management", "learn"]),
];

/// Composer tuning
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    pub words_per_second: f64,
    /// Format trends turned into stage directions
    pub max_format_beats: usize,
    /// Engagement tactics turned into spoken beats
    pub max_tactic_beats: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            words_per_second: WORDS_PER_SECOND,
            max_format_beats: 2,
            max_tactic_beats: 2,
        }
    }
}

/// What the CTA should ask the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CtaIntent {
    Follow,
    Comment,
    Save,
    Share,
    Stitch,
}

pub struct ScriptComposer {
    config: ComposerConfig,
}

impl Default for ScriptComposer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ScriptComposer {
    pub fn new(config: Option<ComposerConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
        }
    }

    pub fn words_per_second(&self) -> f64 {
        self.config.words_per_second
    }

    /// Compose a script for `platform` from `analysis`
    pub fn compose(
        &self,
        analysis: &ContentAnalysis,
        platform: Platform,
    ) -> Result<Script, DomainError> {
        let summary = analysis.summary.trim();
        if analysis.hook_patterns.is_empty() && summary.is_empty() {
            return Err(DomainError::Composition(
                "analysis has neither hook patterns nor a summary".to_string(),
            ));
        }

        let theme = analysis
            .dominant_theme()
            .map(str::to_string)
            .or_else(|| {
                analysis
                    .niche_insights
                    .as_ref()
                    .and_then(|n| n.niches.iter().next().cloned())
            })
            .unwrap_or_else(|| "General".to_string());

        let (title, hook_type) = match select_hook(&analysis.hook_patterns, analysis.dominant_theme())
        {
            Some(pattern) if !pattern.example.trim().is_empty() => {
                (pattern.example.trim().to_string(), pattern.hook_type.clone())
            }
            Some(pattern) => (
                text::first_sentence(summary).unwrap_or_else(|| pattern.hook_type.clone()),
                pattern.hook_type.clone(),
            ),
            None => (
                text::first_sentence(summary).unwrap_or_else(|| summary.to_string()),
                "summary-led".to_string(),
            ),
        };

        let body = self.body_beats(analysis, &theme).join("\n\n");
        let cta = cta_for(platform, &analysis.engagement_tactics).to_string();

        let spoken = format!("{} {} {}", title, body, cta);
        let estimated_duration = estimate_duration(&spoken, self.config.words_per_second);

        let notes = self.notes(analysis, platform, &theme, &hook_type, estimated_duration);

        tracing::debug!(
            hook_type = %hook_type,
            theme = %theme,
            estimated_duration,
            "Composed script"
        );

        Ok(Script {
            title,
            body,
            cta,
            theme,
            hook_type,
            estimated_duration,
            platform,
            notes,
        })
    }

    fn body_beats(&self, analysis: &ContentAnalysis, theme: &str) -> Vec<String> {
        let mut beats = Vec::new();
        let summary_sentences = text::sentences(&analysis.summary);

        // Opening: niche pain point, or the generic summary
        match &analysis.niche_insights {
            Some(insights) => {
                if let Some(opening) = niche_opening(insights) {
                    beats.push(opening);
                }
            }
            None => {
                if let Some(first) = summary_sentences.first() {
                    beats.push(first.clone());
                }
            }
        }

        if analysis.dominant_theme().is_some() {
            beats.push(format!(
                "Today it's all about {}.",
                text::trim_terminal(&text::lowercase_first(theme))
            ));
        }

        for tactic in analysis
            .engagement_tactics
            .iter()
            .filter_map(|t| tactic_line(t))
            .take(self.config.max_tactic_beats)
        {
            beats.push(tactic);
        }

        match &analysis.niche_insights {
            Some(insights) => {
                if let Some(payoff) = niche_payoff(insights) {
                    beats.push(payoff);
                }
            }
            None => {
                if summary_sentences.len() > 1 {
                    beats.push(summary_sentences[1..].join(" "));
                }
            }
        }

        if beats.is_empty() {
            beats.push(format!(
                "Here's what nobody tells you about {}.",
                text::trim_terminal(&text::lowercase_first(theme))
            ));
        }

        // Format trends ride along as stage directions on the leading beats
        for (beat, trend) in beats.iter_mut().zip(
            analysis
                .format_trends
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .take(self.config.max_format_beats),
        ) {
            beat.push_str(&format!(" [{}]", trend));
        }

        beats
    }

    fn notes(
        &self,
        analysis: &ContentAnalysis,
        platform: Platform,
        theme: &str,
        hook_type: &str,
        estimated_duration: u32,
    ) -> Vec<String> {
        let mut notes = vec![
            format!("Hook type '{}' chosen for theme '{}'.", hook_type, theme),
            format!(
                "Estimated {}s at {} words per second.",
                estimated_duration, self.config.words_per_second
            ),
        ];

        if estimated_duration > platform.sweet_spot_secs() {
            notes.push(format!(
                "Runs past the {}s sweet spot for {}; tighten the body to hold retention.",
                platform.sweet_spot_secs(),
                platform
            ));
        }

        if let Some(trend) = analysis.format_trends.first() {
            notes.push(format!("Follow the format: {}.", text::trim_terminal(trend)));
        }

        match &analysis.niche_insights {
            Some(insights) if !insights.niches.is_empty() => notes.push(format!(
                "Tailored to niche: {}.",
                insights.niches.iter().cloned().collect::<Vec<_>>().join(", ")
            )),
            Some(_) => notes.push("Tailored with niche insights.".to_string()),
            None => notes.push(
                "No niche insights supplied; body built from the general summary.".to_string(),
            ),
        }

        notes.push(platform_note(platform).to_string());
        notes
    }
}

/// Pick the pattern that correlates best with the dominant theme.
/// Ties keep the earliest pattern.
fn select_hook<'a>(patterns: &'a [HookPattern], theme: Option<&str>) -> Option<&'a HookPattern> {
    let theme = match theme {
        Some(t) => t,
        None => return patterns.first(),
    };
    let theme_lower = theme.to_lowercase();
    let theme_words = text::keywords(theme);

    let mut best: Option<(&HookPattern, usize)> = None;
    for pattern in patterns {
        let score = hook_score(pattern, &theme_lower, &theme_words);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((pattern, score)),
        }
    }
    best.map(|(p, _)| p)
}

fn hook_score(pattern: &HookPattern, theme_lower: &str, theme_words: &[String]) -> usize {
    let hook_type = pattern.hook_type.to_lowercase();

    let affinity = HOOK_AFFINITIES
        .iter()
        .filter(|(kind, theme_keys)| {
            hook_type.contains(kind) && theme_keys.iter().any(|k| theme_lower.contains(k))
        })
        .count();

    let pattern_words = text::keywords(&format!("{} {}", pattern.hook_type, pattern.example));
    let overlap = theme_words
        .iter()
        .filter(|w| pattern_words.contains(w))
        .count();

    affinity * 2 + overlap
}

fn niche_opening(insights: &NicheInsights) -> Option<String> {
    if let Some(pain) = insights.pain_points.iter().next() {
        return Some(format!(
            "Struggling with {}? You're not alone.",
            text::trim_terminal(&text::lowercase_first(pain))
        ));
    }
    if let Some(problem) = insights.problems.iter().next() {
        return Some(format!(
            "If {} sounds familiar, keep watching.",
            text::trim_terminal(&text::lowercase_first(problem))
        ));
    }
    None
}

fn niche_payoff(insights: &NicheInsights) -> Option<String> {
    if let Some(value) = insights.value_propositions.iter().next() {
        return Some(format!("The payoff: {}.", text::trim_terminal(value)));
    }
    if let Some(solution) = insights.solutions.iter().next() {
        return Some(format!("The fix: {}.", text::trim_terminal(solution)));
    }
    if insights.pain_points.is_empty() && insights.problems.is_empty() {
        let who = insights
            .audiences
            .iter()
            .next()
            .or_else(|| insights.niches.iter().next())?;
        return Some(format!(
            "This one is for {}.",
            text::trim_terminal(&text::lowercase_first(who))
        ));
    }
    None
}

/// Spoken line for an engagement tactic. CTA-style tactics are left to the CTA.
fn tactic_line(tactic: &str) -> Option<String> {
    let lower = tactic.to_lowercase();
    let line = if lower.contains("open loop") || lower.contains("wait for it") {
        "Stick around, because the last part is the one nobody talks about.".to_string()
    } else if lower.contains("question") || lower.contains("comment") {
        "Be honest, have you been doing this?".to_string()
    } else if lower.contains("cta") || lower.contains("follow") || lower.contains("subscribe") {
        return None;
    } else if lower.contains("interrupt") || lower.contains("twist") || lower.contains("surprise") {
        "But here's the twist.".to_string()
    } else if lower.contains("duet") || lower.contains("stitch") {
        "Try it and show me what happens.".to_string()
    } else {
        let trimmed = text::trim_terminal(tactic);
        if trimmed.is_empty() {
            return None;
        }
        format!("Pro tip: {}.", text::lowercase_first(trimmed))
    };
    Some(line)
}

fn cta_intent(tactics: &[String]) -> CtaIntent {
    let joined = tactics.join(" ").to_lowercase();
    if joined.contains("stitch") || joined.contains("duet") {
        CtaIntent::Stitch
    } else if joined.contains("comment") || joined.contains("question") {
        CtaIntent::Comment
    } else if joined.contains("save") || joined.contains("bookmark") {
        CtaIntent::Save
    } else if joined.contains("share") || joined.contains("tag a friend") {
        CtaIntent::Share
    } else {
        CtaIntent::Follow
    }
}

fn cta_for(platform: Platform, tactics: &[String]) -> &'static str {
    match (platform, cta_intent(tactics)) {
        (Platform::TikTok, CtaIntent::Follow) => "Follow for part 2!",
        (Platform::TikTok, CtaIntent::Comment) => {
            "Drop your answer in the comments and follow for part 2!"
        }
        (Platform::TikTok, CtaIntent::Save) => "Save this so you don't lose it!",
        (Platform::TikTok, CtaIntent::Share) => "Send this to someone who needs it!",
        (Platform::TikTok, CtaIntent::Stitch) => "Stitch this with your results!",

        (Platform::YoutubeShorts, CtaIntent::Comment) => {
            "Comment your answer and subscribe for more!"
        }
        (Platform::YoutubeShorts, CtaIntent::Share) => "Share this with a friend and subscribe!",
        (Platform::YoutubeShorts, _) => "Subscribe for more quick wins like this!",

        (Platform::InstagramReels, CtaIntent::Comment) => "Comment below and follow for more!",
        (Platform::InstagramReels, CtaIntent::Share) => {
            "Share this reel with a friend who needs it!"
        }
        (Platform::InstagramReels, CtaIntent::Save) => "Save this reel for later!",
        (Platform::InstagramReels, _) => "Follow for more and save this reel!",

        (Platform::All, CtaIntent::Comment) => "Tell me in the comments and follow for more!",
        (Platform::All, _) => "Follow for more tips like this!",
    }
}

fn platform_note(platform: Platform) -> &'static str {
    match platform {
        Platform::TikTok => "Burn in captions; most TikTok viewers start with sound off.",
        Platform::YoutubeShorts => "Loop the last frame into the first so Shorts replays feel seamless.",
        Platform::InstagramReels => "Keep text inside the safe zone clear of the Reels UI.",
        Platform::All => "Export 9:16 with captions so one cut works on every platform.",
    }
}

/// Whole seconds needed to speak `text`, never less than one
pub fn estimate_duration(text: &str, words_per_second: f64) -> u32 {
    let words = text::spoken_word_count(text) as f64;
    let pace = if words_per_second > 0.0 {
        words_per_second
    } else {
        WORDS_PER_SECOND
    };
    ((words / pace).ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample_analysis() -> ContentAnalysis {
        ContentAnalysis {
            hook_patterns: vec![
                HookPattern::new("shock-based", "You're doing this wrong, here's why."),
                HookPattern::new(
                    "question-based",
                    "What if I told you this one habit could change your life?",
                ),
            ],
            format_trends: vec![
                "Hook → Insight → Visual Demo → CTA".to_string(),
                "Fast-paced cuts with meme overlays and subtitles".to_string(),
            ],
            engagement_tactics: vec![
                "Open loops (e.g., 'Wait for it...')".to_string(),
                "Direct CTAs ('Follow me for more')".to_string(),
            ],
            content_themes: vec![
                "Time management hacks".to_string(),
                "Exposing common myths".to_string(),
            ],
            summary: "The most effective viral videos use fast-paced editing. They lead with a curiosity hook and close with direct CTAs.".to_string(),
            niche_insights: None,
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let composer = ScriptComposer::default();
        let a = composer.compose(&sample_analysis(), Platform::TikTok).unwrap();
        let b = composer.compose(&sample_analysis(), Platform::TikTok).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.platform, Platform::TikTok);
        assert!(a.estimated_duration > 0);
        assert!(!a.body.is_empty());
    }

    #[test]
    fn test_hook_follows_dominant_theme() {
        let mut analysis = sample_analysis();
        analysis.content_themes = vec!["Exposing common myths".to_string()];
        let script = ScriptComposer::default()
            .compose(&analysis, Platform::TikTok)
            .unwrap();
        assert_eq!(script.hook_type, "shock-based");

        analysis.content_themes = vec!["Life-changing habit stacks".to_string()];
        let script = ScriptComposer::default()
            .compose(&analysis, Platform::TikTok)
            .unwrap();
        assert_eq!(script.hook_type, "question-based");
    }

    #[test]
    fn test_hook_tie_breaks_by_input_order() {
        let mut analysis = sample_analysis();
        analysis.content_themes = vec!["Gardening".to_string()];
        let script = ScriptComposer::default()
            .compose(&analysis, Platform::All)
            .unwrap();
        assert_eq!(script.hook_type, "shock-based");
    }

    #[test]
    fn test_niche_insights_are_woven_in() {
        let mut analysis = sample_analysis();
        analysis.niche_insights = Some(NicheInsights {
            niches: BTreeSet::from(["productivity".to_string()]),
            pain_points: BTreeSet::from(["Never enough hours in the day".to_string()]),
            value_propositions: BTreeSet::from(["two extra focused hours daily".to_string()]),
            ..Default::default()
        });
        let script = ScriptComposer::default()
            .compose(&analysis, Platform::TikTok)
            .unwrap();
        assert!(script.body.contains("never enough hours in the day"));
        assert!(script.body.contains("two extra focused hours daily"));
        assert!(script.notes.iter().any(|n| n.contains("productivity")));
    }

    #[test]
    fn test_generic_fallback_uses_summary() {
        let script = ScriptComposer::default()
            .compose(&sample_analysis(), Platform::TikTok)
            .unwrap();
        assert!(script
            .body
            .starts_with("The most effective viral videos use fast-paced editing."));
    }

    #[test]
    fn test_cta_follows_platform() {
        let composer = ScriptComposer::default();
        let tiktok = composer.compose(&sample_analysis(), Platform::TikTok).unwrap();
        let shorts = composer
            .compose(&sample_analysis(), Platform::YoutubeShorts)
            .unwrap();
        assert_eq!(tiktok.cta, "Follow for part 2!");
        assert!(shorts.cta.contains("Subscribe"));

        let mut analysis = sample_analysis();
        analysis.engagement_tactics = vec!["Ask a question to drive comments".to_string()];
        let script = composer.compose(&analysis, Platform::InstagramReels).unwrap();
        assert_eq!(script.cta, "Comment below and follow for more!");
    }

    #[test]
    fn test_summary_only_analysis() {
        let analysis = ContentAnalysis {
            summary: "Short videos win with fast hooks. Keep it tight.".to_string(),
            ..Default::default()
        };
        let script = ScriptComposer::default()
            .compose(&analysis, Platform::All)
            .unwrap();
        assert_eq!(script.title, "Short videos win with fast hooks.");
        assert_eq!(script.hook_type, "summary-led");
        assert_eq!(script.theme, "General");
    }

    #[test]
    fn test_nothing_to_compose() {
        let err = ScriptComposer::default()
            .compose(&ContentAnalysis::empty(), Platform::TikTok)
            .unwrap_err();
        assert!(matches!(err, DomainError::Composition(_)));
    }

    #[test]
    fn test_estimate_duration() {
        assert_eq!(estimate_duration("", WORDS_PER_SECOND), 1);
        assert_eq!(estimate_duration("one two three four five", 2.5), 2);
        assert_eq!(estimate_duration("one two [not spoken at all] three", 1.0), 3);
    }
}
