//! Visual Planner - Breaks a script into timestamped scenes
//!
//! The estimated duration is partitioned into a hook scene, up to
//! `max_body_scenes` body scenes aligned on beat boundaries, and a closing
//! CTA scene. Scenes are contiguous and their lengths add up to exactly the
//! script's `estimated_duration`.

use crate::domain::entities::{format_timestamp, Scene, SceneKind, Script, VisualPlan};
use crate::domain::errors::DomainError;
use crate::domain::services::text;
use crate::domain::value_objects::Platform;

/// Keyword prefixes -> stock footage suggestion
const FOOTAGE_LOOKUP: &[(&[&str], &str)] = &[
    (
        &["phone", "battery", "charg", "screen", "app"],
        "Close-up of a phone on a desk, screen lighting up",
    ),
    (
        &["morning", "wake", "sunrise", "routine", "alarm"],
        "Sunrise through a bedroom window, alarm clock close-up",
    ),
    (
        &["money", "budget", "saving", "invest", "cash"],
        "Hands counting cash next to a budgeting spreadsheet",
    ),
    (
        &["time", "schedule", "calendar", "overwhelm", "busy", "deadline"],
        "Time-lapse of a packed calendar and a ticking clock",
    ),
    (
        &["workout", "fitness", "exercis", "gym", "run"],
        "Slow-motion gym footage, sweat and chalk dust",
    ),
    (
        &["food", "cook", "recipe", "meal", "kitchen"],
        "Top-down kitchen shot, ingredients hitting the pan",
    ),
    (
        &["sleep", "tired", "rest", "night"],
        "Dim bedroom, someone staring at the ceiling",
    ),
    (
        &["notebook", "list", "plan", "journal", "write"],
        "Over-the-shoulder shot of a handwritten checklist",
    ),
    (
        &["work", "office", "productiv", "focus", "desk"],
        "Clean desk setup, laptop open, hands typing",
    ),
    (
        &["secret", "hidden", "truth", "myth", "wrong", "mistake"],
        "Dramatic slow push-in on the presenter",
    ),
];

const BODY_EFFECTS: &[Option<&str>] = &[Some("Jump cut"), Some("Whip pan transition"), None];

/// Planner tuning
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Share of the duration given to the hook scene, in percent
    pub hook_share_pct: u32,
    /// Share of the duration given to the CTA scene, in percent
    pub cta_share_pct: u32,
    pub max_body_scenes: usize,
    /// Words shown in a text overlay
    pub overlay_words: usize,
    pub words_per_second: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            hook_share_pct: 12,
            cta_share_pct: 10,
            max_body_scenes: 4,
            overlay_words: 6,
            words_per_second: super::WORDS_PER_SECOND,
        }
    }
}

pub struct VisualPlanner {
    config: PlannerConfig,
}

impl Default for VisualPlanner {
    fn default() -> Self {
        Self::new(None)
    }
}

impl VisualPlanner {
    pub fn new(config: Option<PlannerConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
        }
    }

    /// Plan the scenes for `script`, with delivery guidance matched to `tone`
    pub fn plan(&self, script: &Script, tone: &str) -> Result<VisualPlan, DomainError> {
        if script.body.trim().is_empty() {
            return Err(DomainError::Planning("script body is empty".to_string()));
        }
        let duration = script.estimated_duration;
        if duration == 0 {
            return Err(DomainError::Planning(
                "script has no estimated duration".to_string(),
            ));
        }

        let units = planning_units(script);
        let cta = script.cta.trim();
        let has_cta_scene = !cta.is_empty() && duration >= 3;

        let body_capacity = duration - 1 - u32::from(has_cta_scene);
        let body_scenes = (self.config.max_body_scenes.min(units.len()) as u32).min(body_capacity);

        let hook_len = share(duration, self.config.hook_share_pct)
            .max(1)
            .min(duration - body_scenes - u32::from(has_cta_scene));
        let cta_len = if has_cta_scene {
            share(duration, self.config.cta_share_pct)
                .max(1)
                .min(duration - hook_len - body_scenes)
        } else {
            0
        };
        let body_total = duration - hook_len - cta_len;

        let hook_text = if script.title.trim().is_empty() {
            units.first().cloned().unwrap_or_default()
        } else {
            script.title.trim().to_string()
        };

        let mut scenes = Vec::new();
        let mut cursor = 0u32;

        self.push_scene(&mut scenes, &mut cursor, hook_len, SceneKind::Hook, &hook_text);

        if body_scenes > 0 {
            let groups = split_even(&units, body_scenes as usize);
            let lengths = split_secs(body_total, body_scenes);
            let last = groups.len() - 1;
            for (i, (group, len)) in groups.into_iter().zip(lengths).enumerate() {
                let mut excerpt = group.join(" ");
                if i == last && !has_cta_scene && !cta.is_empty() {
                    excerpt = format!("{} {}", excerpt, cta);
                }
                self.push_scene(&mut scenes, &mut cursor, len, SceneKind::Body, &excerpt);
            }
        }

        if has_cta_scene {
            self.push_scene(&mut scenes, &mut cursor, cta_len, SceneKind::CallToAction, cta);
        }

        tracing::debug!(
            scenes = scenes.len(),
            total_duration = cursor,
            platform = %script.platform,
            "Planned visuals"
        );

        Ok(VisualPlan {
            scenes,
            total_duration: cursor,
            voiceover_guidance: self.voiceover_guidance(tone),
            music_guidance: music_guidance(tone).to_string(),
            platform: script.platform,
            platform_tips: platform_tips(script.platform),
        })
    }

    fn push_scene(
        &self,
        scenes: &mut Vec<Scene>,
        cursor: &mut u32,
        len: u32,
        kind: SceneKind,
        raw: &str,
    ) {
        let start = *cursor;
        let end = start + len;
        let index = scenes.len();
        let body_index = scenes
            .iter()
            .filter(|s| s.kind == SceneKind::Body)
            .count();

        let effect = match kind {
            SceneKind::Hook => Some("Punch-in zoom on the first line"),
            SceneKind::Body => BODY_EFFECTS[body_index % BODY_EFFECTS.len()],
            SceneKind::CallToAction => Some("Fade to end card"),
        };

        scenes.push(Scene {
            index,
            kind,
            start_secs: start,
            end_secs: end,
            timestamp: format!("{}-{}", format_timestamp(start), format_timestamp(end)),
            script_excerpt: text::strip_directions(raw),
            footage: footage_for(raw, kind),
            text_overlay: overlay_for(raw, kind, self.config.overlay_words),
            effect: effect.map(str::to_string),
        });
        *cursor = end;
    }

    fn voiceover_guidance(&self, tone: &str) -> String {
        let tone = tone.to_lowercase();
        let delivery = if tone.contains("energetic") || tone.contains("hype") || tone.contains("excit")
        {
            "High energy, punchy delivery; cut every breath."
        } else if tone.contains("funny") || tone.contains("humor") || tone.contains("playful") {
            "Playful, conversational delivery; let the punchlines land before cutting."
        } else if tone.contains("calm") || tone.contains("serious") || tone.contains("emotional") {
            "Slow, sincere delivery; hold eye contact on the key line."
        } else if tone.contains("inform") || tone.contains("educat") {
            "Clear, confident delivery; pause briefly after each key point."
        } else {
            "Conversational and upbeat; land the hook in the first second."
        };
        format!(
            "{} Keep the pace near {} words per second.",
            delivery, self.config.words_per_second
        )
    }
}

/// Beats of the body, or its sentences when there is only one beat
fn planning_units(script: &Script) -> Vec<String> {
    let beats: Vec<String> = script.beats().into_iter().map(str::to_string).collect();
    if beats.len() >= 2 {
        return beats;
    }
    let sentences = text::sentences(&script.body);
    if sentences.len() > beats.len() {
        sentences
    } else {
        beats
    }
}

/// `pct` percent of `duration`, rounded half up
fn share(duration: u32, pct: u32) -> u32 {
    let scaled = (u64::from(duration) * u64::from(pct) + 50) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Split `total` seconds into `parts` lengths differing by at most one
fn split_secs(total: u32, parts: u32) -> Vec<u32> {
    let base = total / parts;
    let extra = total % parts;
    (0..parts).map(|i| base + u32::from(i < extra)).collect()
}

/// Split `units` into `parts` contiguous, non-empty groups
fn split_even(units: &[String], parts: usize) -> Vec<Vec<String>> {
    let base = units.len() / parts;
    let extra = units.len() % parts;
    let mut groups = Vec::with_capacity(parts);
    let mut offset = 0;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        groups.push(units[offset..offset + size].to_vec());
        offset += size;
    }
    groups
}

fn footage_for(raw: &str, kind: SceneKind) -> String {
    if let Some(direction) = text::directions(raw).into_iter().next() {
        return capitalize(&direction);
    }

    let words = text::keywords(raw);
    FOOTAGE_LOOKUP
        .iter()
        .find(|(keys, _)| {
            words
                .iter()
                .any(|w| keys.iter().any(|k| w.starts_with(k)))
        })
        .map(|(_, footage)| footage.to_string())
        .unwrap_or_else(|| {
            match kind {
                SceneKind::Hook => "Presenter close-up, talking straight to camera",
                SceneKind::Body => "B-roll illustrating the point, cut every 2-3 seconds",
                SceneKind::CallToAction => "Presenter pointing at the follow button over an end card",
            }
            .to_string()
        })
}

fn overlay_for(raw: &str, kind: SceneKind, max_words: usize) -> String {
    let source = match kind {
        SceneKind::Body => text::first_sentence(&text::strip_directions(raw)).unwrap_or_default(),
        _ => raw.to_string(),
    };
    let overlay = text::headline(&source, max_words);
    match kind {
        SceneKind::Hook => overlay.to_uppercase(),
        _ => overlay,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn music_guidance(tone: &str) -> &'static str {
    let tone = tone.to_lowercase();
    if tone.contains("energetic") || tone.contains("hype") || tone.contains("excit") {
        "Trending high-BPM track; drop the beat on the first cut."
    } else if tone.contains("funny") || tone.contains("humor") || tone.contains("playful") {
        "Quirky, bouncy background track with a record scratch before the twist."
    } else if tone.contains("calm") || tone.contains("serious") || tone.contains("emotional") {
        "Soft piano or ambient pad, low under the voice."
    } else {
        "Light lo-fi or upbeat instrumental at low volume; duck it under the voiceover."
    }
}

fn platform_tips(platform: Platform) -> Vec<String> {
    let tips: &[&str] = match platform {
        Platform::TikTok => &[
            "Shoot 9:16 and keep captions above the bottom caption bar.",
            "Use a trending sound at low volume under the voiceover.",
            "Show the payoff visually before second 3.",
        ],
        Platform::YoutubeShorts => &[
            "Keep it under 60 seconds and loop the ending into the opening.",
            "Put the key phrase in the first on-screen text for search.",
            "Use a bold title card in the first frame.",
        ],
        Platform::InstagramReels => &[
            "Keep text inside the center safe zone, clear of the Reels UI.",
            "Pick a cover frame with readable text for the profile grid.",
            "Use Instagram's native captions sticker for accessibility.",
        ],
        Platform::All => &[
            "Export 9:16 at 1080x1920 with burned-in captions.",
            "Keep key visuals in the center safe zone for every app's UI.",
            "Stay under 45 seconds so one cut fits every platform.",
        ],
    };
    tips.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(body: &str, duration: u32) -> Script {
        Script {
            title: "I can't believe I didn't know this secret sooner.".to_string(),
            body: body.to_string(),
            cta: "Stitch this with your results!".to_string(),
            theme: "productivity".to_string(),
            hook_type: "curiosity".to_string(),
            estimated_duration: duration,
            platform: Platform::TikTok,
            notes: vec![],
        }
    }

    const SAMPLE_BODY: &str = "We all struggle with having too much to do and too little time. [show overwhelmed person]\n\nHere's a simple system that changed everything for me: [cut to notebook] The 1-3-5 Rule. Each day, commit to 1 big thing, 3 medium things, and 5 small things. [show list]\n\nThis prevents overwhelm while still ensuring progress on what matters. [show completed list]";

    fn assert_contiguous(plan: &VisualPlan, duration: u32) {
        let mut cursor = 0;
        for (i, scene) in plan.scenes.iter().enumerate() {
            assert_eq!(scene.index, i);
            assert_eq!(scene.start_secs, cursor, "gap before scene {}", i);
            assert!(scene.end_secs > scene.start_secs, "empty scene {}", i);
            cursor = scene.end_secs;
        }
        assert_eq!(cursor, duration);
        assert_eq!(plan.total_duration, duration);
        let sum: u32 = plan.scenes.iter().map(Scene::duration).sum();
        assert_eq!(sum, duration);
    }

    #[test]
    fn test_scenes_cover_duration_exactly() {
        let planner = VisualPlanner::default();
        for duration in 1..=180 {
            let plan = planner.plan(&script(SAMPLE_BODY, duration), "informative").unwrap();
            assert_contiguous(&plan, duration);
        }
    }

    #[test]
    fn test_very_long_durations_are_planned() {
        let planner = VisualPlanner::default();
        for duration in [400_000_000, u32::MAX] {
            let plan = planner.plan(&script(SAMPLE_BODY, duration), "").unwrap();
            assert_contiguous(&plan, duration);
            assert_eq!(plan.scenes[0].duration(), share(duration, 12));
        }
        assert_eq!(share(400_000_000, 12), 48_000_000);
    }

    #[test]
    fn test_single_sentence_body() {
        let planner = VisualPlanner::default();
        for duration in [1, 2, 3, 7, 31] {
            let plan = planner.plan(&script("Just one line.", duration), "").unwrap();
            assert_contiguous(&plan, duration);
        }
    }

    #[test]
    fn test_scene_layout() {
        let plan = VisualPlanner::default()
            .plan(&script(SAMPLE_BODY, 40), "informative")
            .unwrap();

        assert_eq!(plan.scenes.first().unwrap().kind, SceneKind::Hook);
        assert_eq!(plan.scenes.last().unwrap().kind, SceneKind::CallToAction);
        assert_eq!(plan.scenes.len(), 5);

        // 12% of 40 rounds to 5
        assert_eq!(plan.scenes[0].duration(), 5);
        assert_eq!(plan.scenes[0].timestamp, "0:00-0:05");
        assert_eq!(plan.scenes[4].script_excerpt, "Stitch this with your results!");
    }

    #[test]
    fn test_footage_prefers_stage_directions() {
        let plan = VisualPlanner::default()
            .plan(&script(SAMPLE_BODY, 40), "informative")
            .unwrap();
        assert_eq!(plan.scenes[1].footage, "Show overwhelmed person");
        assert!(!plan.scenes[1].script_excerpt.contains('['));
    }

    #[test]
    fn test_footage_keyword_lookup() {
        let body = "Your phone battery dies too fast.\n\nCharging overnight is the culprit.";
        let plan = VisualPlanner::default().plan(&script(body, 20), "").unwrap();
        assert_eq!(
            plan.scenes[1].footage,
            "Close-up of a phone on a desk, screen lighting up"
        );
    }

    #[test]
    fn test_hook_overlay_is_headline() {
        let plan = VisualPlanner::default()
            .plan(&script(SAMPLE_BODY, 40), "energetic")
            .unwrap();
        assert_eq!(plan.scenes[0].text_overlay, "I CAN'T BELIEVE I DIDN'T KNOW...");
        assert!(plan.voiceover_guidance.starts_with("High energy"));
        assert_eq!(plan.platform, Platform::TikTok);
        assert_eq!(plan.platform_tips.len(), 3);
    }

    #[test]
    fn test_empty_body_fails() {
        let err = VisualPlanner::default()
            .plan(&script("   ", 30), "informative")
            .unwrap_err();
        assert!(matches!(err, DomainError::Planning(_)));
    }

    #[test]
    fn test_zero_duration_fails() {
        let err = VisualPlanner::default()
            .plan(&script(SAMPLE_BODY, 0), "informative")
            .unwrap_err();
        assert!(matches!(err, DomainError::Planning(_)));
    }
}
