//! TitanFlow CLI - Content strategy pipeline from the terminal
//!
//! Thin client over the TitanFlow HTTP API.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Password;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use api::{ScriptResponse, TitanFlowClient, VisualPlanResponse};
use config::Config;

#[derive(Parser)]
#[command(name = "titanflow")]
#[command(about = "TitanFlow CLI - Video analysis, scripts and visual plans", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Show or update configuration
    Config {
        /// Server URL
        #[arg(long)]
        base_url: Option<String>,
        /// Default platform (tiktok, youtube_shorts, instagram_reels)
        #[arg(long)]
        platform: Option<String>,
    },

    /// Check that the server is reachable
    Health,

    /// Analyze a video file
    Analyze {
        /// JSON file with a video list (or {"videos": [...]})
        file: PathBuf,
        /// Keep only videos in this niche (uses niche analysis)
        #[arg(long)]
        niche: Option<String>,
        /// Keep only videos mentioning this problem
        #[arg(long)]
        problem: Option<String>,
        /// Keep only videos for this audience
        #[arg(long)]
        audience: Option<String>,
        /// Use niche analysis even without filters
        #[arg(long)]
        niche_insights: bool,
        /// Analysis type tag
        #[arg(short = 't', long, default_value = "full")]
        r#type: String,
        /// Cache the analysis under this video id
        #[arg(long)]
        video_id: Option<String>,
        /// Cache the analysis under a key derived from the request
        #[arg(long)]
        cache: bool,
        /// Save the JSON result to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a script from a video file or an analysis file
    Script {
        /// Video list (analyzed first) or analysis JSON
        file: PathBuf,
        #[arg(short, long)]
        platform: Option<String>,
        /// Save the JSON result to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a visual plan from a script file
    Visual {
        /// Script JSON (as produced by `titanflow script -o`)
        file: PathBuf,
        /// Tone for voiceover and music guidance
        #[arg(long)]
        tone: Option<String>,
        #[arg(short, long)]
        platform: Option<String>,
        /// Save the JSON result to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run analysis, script and visual plan in one go
    Pipeline {
        /// JSON file with a video list (or {"videos": [...]})
        file: PathBuf,
        #[arg(short, long)]
        platform: Option<String>,
        #[arg(long)]
        niche: Option<String>,
        #[arg(long)]
        problem: Option<String>,
        #[arg(long)]
        tone: Option<String>,
        /// Cache the analysis under this video id
        #[arg(long)]
        video_id: Option<String>,
        /// Save the JSON result to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Content memory operations
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
}

#[derive(Subcommand)]
enum MemoryAction {
    /// Show a cached analysis
    Get {
        video_id: String,
    },
    /// Delete entries past the retention window
    Cleanup,
    /// Back up the memory database
    Backup {
        /// File name inside the server's backup directory (timestamped when omitted)
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key } => cmd_login(key).await,
        Commands::Config { base_url, platform } => cmd_config(base_url, platform),
        Commands::Health => cmd_health().await,
        Commands::Analyze {
            file,
            niche,
            problem,
            audience,
            niche_insights,
            r#type,
            video_id,
            cache,
            output,
        } => {
            let filters = NicheFilters {
                niche,
                problem,
                audience,
            };
            cmd_analyze(file, filters, niche_insights, r#type, video_id, cache, output).await
        }
        Commands::Script {
            file,
            platform,
            output,
        } => cmd_script(file, platform, output).await,
        Commands::Visual {
            file,
            tone,
            platform,
            output,
        } => cmd_visual(file, tone, platform, output).await,
        Commands::Pipeline {
            file,
            platform,
            niche,
            problem,
            tone,
            video_id,
            output,
        } => cmd_pipeline(file, platform, niche, problem, tone, video_id, output).await,
        Commands::Memory { action } => cmd_memory(action).await,
    }
}

struct NicheFilters {
    niche: Option<String>,
    problem: Option<String>,
    audience: Option<String>,
}

impl NicheFilters {
    fn is_empty(&self) -> bool {
        self.niche.is_none() && self.problem.is_none() && self.audience.is_none()
    }
}

// ============================================
// Command Implementations
// ============================================

fn client(config: &Config) -> TitanFlowClient {
    TitanFlowClient::new(&config.base_url, config.api_key.as_deref())
}

async fn cmd_login(key: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = TitanFlowClient::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => println!("{}", "OK".green()),
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to TitanFlow API at {}", config.base_url);
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

fn cmd_config(base_url: Option<String>, platform: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if base_url.is_some() || platform.is_some() {
        if let Some(url) = base_url {
            config.base_url = url;
        }
        if let Some(platform) = platform {
            config.default_platform = Some(platform);
        }
        config.save()?;
        println!("{} Configuration updated", "✓".green());
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!(
        "  Default Platform: {}",
        config.default_platform.as_deref().unwrap_or("server default").cyan()
    );

    Ok(())
}

async fn cmd_health() -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    if !client.health().await.unwrap_or(false) {
        bail!("TitanFlow API at {} is not reachable", config.base_url);
    }
    println!("{} {} is up", "✓".green(), config.base_url);

    let index = client.index().await?;
    if index.analyzer_loaded {
        println!(
            "  Analyzer: {}",
            index.analyzer.as_deref().unwrap_or("loaded").green()
        );
    } else {
        println!(
            "  Analyzer: {} (analysis endpoints unavailable)",
            "not loaded".yellow()
        );
    }

    Ok(())
}

async fn cmd_analyze(
    file: PathBuf,
    filters: NicheFilters,
    niche_insights: bool,
    analysis_type: String,
    video_id: Option<String>,
    cache: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load()?;
    let videos = read_videos(&file)?;
    let niche = niche_insights || !filters.is_empty();

    let mut body = Map::new();
    body.insert("videos".into(), Value::Array(videos));
    body.insert("analysis_type".into(), Value::String(analysis_type));
    body.insert("cache".into(), Value::Bool(cache));
    insert_opt(&mut body, "video_id", video_id);
    insert_opt(&mut body, "platform", config.platform(None));
    if niche {
        insert_opt(&mut body, "target_niche", filters.niche);
        insert_opt(&mut body, "target_problem", filters.problem);
        insert_opt(&mut body, "target_audience", filters.audience);
    }

    let analysis = client(&config).analyze(&Value::Object(body), niche).await?;

    print_json(&analysis)?;
    save_output(output.as_deref(), &analysis)
}

async fn cmd_script(file: PathBuf, platform: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);
    let input = read_json(&file)?;
    let platform = config.platform(platform);

    let mut analysis = match video_list(&input) {
        Some(videos) => {
            eprintln!("{}", "Video list detected, analyzing first...".dimmed());
            let mut body = Map::new();
            body.insert("videos".into(), Value::Array(videos));
            insert_opt(&mut body, "platform", platform.clone());
            client.analyze(&Value::Object(body), false).await?
        }
        None => input,
    };

    let fields = analysis
        .as_object_mut()
        .context("Analysis file must contain a JSON object")?;
    if let Some(platform) = platform {
        fields.insert("platform".into(), Value::String(platform));
    }

    let script = client.generate_script(&analysis).await?;

    print_script(&script);
    save_output(output.as_deref(), &script)
}

async fn cmd_visual(
    file: PathBuf,
    tone: Option<String>,
    platform: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load()?;
    let mut script = read_json(&file)?;

    let fields = script
        .as_object_mut()
        .context("Script file must contain a JSON object")?;
    if let Some(tone) = tone {
        fields.insert("tone".into(), Value::String(tone));
    }
    if let Some(platform) = platform {
        fields.insert("platform".into(), Value::String(platform));
    }

    let plan = client(&config).create_visual_plan(&script).await?;

    print_visual_plan(&plan);
    save_output(output.as_deref(), &plan)
}

async fn cmd_pipeline(
    file: PathBuf,
    platform: Option<String>,
    niche: Option<String>,
    problem: Option<String>,
    tone: Option<String>,
    video_id: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load()?;
    let videos = read_videos(&file)?;

    let mut body = Map::new();
    body.insert("videos".into(), Value::Array(videos));
    insert_opt(&mut body, "platform", config.platform(platform));
    insert_opt(&mut body, "target_niche", niche);
    insert_opt(&mut body, "target_problem", problem);
    insert_opt(&mut body, "tone", tone);
    insert_opt(&mut body, "video_id", video_id);

    let result = client(&config).full_pipeline(&Value::Object(body)).await?;

    println!("{} {}", "Run".dimmed(), result.run_id.to_string().dimmed());
    print_script(&result.script);
    println!();
    print_visual_plan(&result.visual_plan);
    save_output(output.as_deref(), &result)
}

async fn cmd_memory(action: MemoryAction) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    match action {
        MemoryAction::Get { video_id } => {
            let entry = client.get_memory(&video_id).await?;
            println!(
                "{} [{}] updated {}",
                entry.video_id.cyan().bold(),
                entry.platform,
                entry.last_updated.dimmed()
            );
            println!("  {} {}", "Created:".dimmed(), entry.created_at);
            print_json(&entry.analysis)?;
        }

        MemoryAction::Cleanup => {
            let result = client.cleanup_memory().await?;
            println!(
                "{} Removed {} entries older than {} days",
                "✓".green(),
                result.deleted.to_string().green(),
                result.retention_days
            );
        }

        MemoryAction::Backup { name } => {
            let result = client.backup_memory(name.as_deref()).await?;
            println!("{} Backup written to {}", "✓".green(), result.path.cyan());
        }
    }

    Ok(())
}

// ============================================
// Input / Output Helpers
// ============================================

fn read_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn read_videos(path: &Path) -> Result<Vec<Value>> {
    let input = read_json(path)?;
    video_list(&input).with_context(|| {
        format!(
            "{:?} must contain a list of videos or an object with a \"videos\" list",
            path
        )
    })
}

/// A bare array or `{"videos": [...]}` is a video list; anything else is not
fn video_list(input: &Value) -> Option<Vec<Value>> {
    match input {
        Value::Array(items) => Some(items.clone()),
        Value::Object(fields) => fields.get("videos")?.as_array().cloned(),
        _ => None,
    }
}

fn insert_opt(body: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        body.insert(key.to_string(), Value::String(value));
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn save_output<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    eprintln!("{} Saved to {:?}", "✓".green(), path);
    Ok(())
}

fn print_script(script: &ScriptResponse) {
    let rule = "=".repeat(50);
    println!("{}", rule.dimmed());
    println!("{} {}", "TITLE:".bold(), script.title);
    println!("{} {}", "HOOK TYPE:".bold(), script.hook_type);
    println!("{} {}", "THEME:".bold(), script.theme);
    println!(
        "{} {} seconds ({})",
        "ESTIMATED DURATION:".bold(),
        script.estimated_duration,
        script.platform
    );
    println!("{}", rule.dimmed());
    println!("\n{}\n{}", "SCRIPT:".bold(), script.script);
    println!("\n{} {}", "CTA:".bold(), script.cta.cyan());

    if !script.notes.is_empty() {
        println!("\n{}", "NOTES:".bold());
        for note in &script.notes {
            println!("  - {}", note);
        }
    }
}

fn print_visual_plan(plan: &VisualPlanResponse) {
    println!(
        "{} {} scenes, {}s on {}",
        "VISUAL PLAN:".bold(),
        plan.scenes.len(),
        plan.total_duration,
        plan.platform
    );

    for scene in &plan.scenes {
        println!(
            "  {} {} {}",
            scene.timestamp.cyan(),
            format!("[{}]", scene.kind).dimmed(),
            truncate_string(&scene.script_excerpt, 60)
        );
        println!("      {} {}", "Footage:".dimmed(), scene.footage);
        println!("      {} {}", "Overlay:".dimmed(), scene.text_overlay);
        if let Some(effect) = &scene.effect {
            println!("      {} {}", "Effect:".dimmed(), effect);
        }
    }

    println!("\n{} {}", "Voiceover:".bold(), plan.voiceover_guidance);
    println!("{} {}", "Music:".bold(), plan.music_guidance);
    for tip in &plan.platform_tips {
        println!("  * {}", tip);
    }
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}
