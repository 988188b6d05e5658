mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use viralens::classifier::HttpSentimentClassifier;
use viralens::config::{default_config_path, ScoringConfig};
use viralens::{
    format_float, score_caption, CaptionAnalysis, CaptionAnalyzer, SentimentProbs,
    ViralityBreakdown, ViralityScorer,
};

#[derive(Parser)]
#[command(name = "viralens", about = "Post virality scoring engine")]
struct Cli {
    /// Scoring config file (defaults to SCORING_CONFIG_PATH or config/scoring.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Combine precomputed metrics into a virality breakdown
    Score(ScoreArgs),
    /// Score a caption's hook, CTA, length, emoji and sentiment
    Caption(CaptionArgs),
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Write the default scoring config
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    #[arg(long, default_value_t = 0.0)]
    aesthetic: f64,
    #[arg(long)]
    rule_of_thirds: Option<f64>,
    #[arg(long)]
    symmetry: Option<f64>,
    #[arg(long)]
    clutter: Option<f64>,
    #[arg(long)]
    brightness: Option<f64>,
    #[arg(long)]
    contrast: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    caption: f64,
    #[arg(long, default_value_t = 0.0)]
    trend: f64,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct CaptionArgs {
    #[arg(long)]
    text: Option<String>,
    #[arg(long, requires_all = ["neutral", "positive"])]
    negative: Option<f64>,
    #[arg(long, requires_all = ["negative", "positive"])]
    neutral: Option<f64>,
    #[arg(long, requires_all = ["negative", "neutral"])]
    positive: Option<f64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long)]
    path: Option<PathBuf>,
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Score(args) => run_score(args, &load_config(cli.config)?),
        Command::Caption(args) => run_caption(args, &load_config(cli.config)?).await,
        Command::Serve(args) => server::serve(args, load_config(cli.config)?).await,
        Command::InitConfig(args) => run_init_config(args, cli.config),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<ScoringConfig, String> {
    let (config, path) = ScoringConfig::load(path)?;
    if let Some(path) = path.as_ref() {
        tracing::debug!(path = %path.display(), "resolved config path");
    }
    Ok(config)
}

fn run_score(args: ScoreArgs, config: &ScoringConfig) -> Result<(), String> {
    let mut geometry_scores = HashMap::new();
    insert_metric(&mut geometry_scores, "rule_of_thirds", args.rule_of_thirds);
    insert_metric(&mut geometry_scores, "symmetry", args.symmetry);
    insert_metric(&mut geometry_scores, "clutter", args.clutter);

    let mut color_scores = HashMap::new();
    insert_metric(&mut color_scores, "brightness", args.brightness);
    insert_metric(&mut color_scores, "contrast", args.contrast);

    let scorer = ViralityScorer::new(config.weights.clone());
    let breakdown = scorer.compute(
        args.aesthetic,
        &geometry_scores,
        &color_scores,
        args.caption,
        args.trend,
    );

    if args.json {
        return print_json(&breakdown);
    }
    print_breakdown(&breakdown);
    Ok(())
}

async fn run_caption(args: CaptionArgs, config: &ScoringConfig) -> Result<(), String> {
    let text = read_text(args.text)?;

    let analysis = match (args.negative, args.neutral, args.positive) {
        (Some(negative), Some(neutral), Some(positive)) => score_caption(
            &text,
            &SentimentProbs::new(negative, neutral, positive),
            &config.caption,
        ),
        _ => {
            let classifier = HttpSentimentClassifier::from_config(&config.classifier)?;
            let analyzer = CaptionAnalyzer::new(classifier, config.caption.clone());
            analyzer.analyze(&text).await?
        }
    };

    if args.json {
        return print_json(&analysis);
    }
    print_caption(&analysis);
    Ok(())
}

fn run_init_config(args: InitConfigArgs, global: Option<PathBuf>) -> Result<(), String> {
    let path = args
        .path
        .or(global)
        .or_else(default_config_path)
        .ok_or_else(|| "no config path given".to_string())?;
    if path.exists() && !args.force {
        return Err(format!(
            "config already exists: {} (pass --force to overwrite)",
            path.display()
        ));
    }
    ScoringConfig::default().write(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn insert_metric(scores: &mut HashMap<String, f64>, key: &str, value: Option<f64>) {
    if let Some(value) = value {
        scores.insert(key.to_string(), value);
    }
}

fn print_breakdown(breakdown: &ViralityBreakdown) {
    println!("Virality score: {}", format_float(breakdown.final_score, 2));
    let parts: Vec<String> = breakdown
        .entries()
        .into_iter()
        .filter(|(name, _)| *name != "final_score")
        .map(|(name, value)| format!("{} {}", name, format_float(value, 3)))
        .collect();
    println!("Breakdown: {}", parts.join(" | "));
}

fn print_caption(analysis: &CaptionAnalysis) {
    println!(
        "Caption score: {}",
        format_float(analysis.overall_caption_score, 3)
    );
    println!(
        "Features: sentiment {} | hook {} | cta {} | length {} | emoji {}",
        format_float(analysis.sentiment_score, 3),
        format_float(analysis.hook_score, 1),
        format_float(analysis.cta_score, 1),
        format_float(analysis.length_score, 3),
        format_float(analysis.emoji_score, 2)
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn read_text(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        return Ok(text);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    Ok(buffer)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
