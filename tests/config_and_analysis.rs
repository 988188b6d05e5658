use std::collections::HashMap;
use viralens::analysis::{estimate_aesthetic, NEUTRAL_TREND_SIMILARITY};
use viralens::config::{ScoringConfig, DEFAULT_SENTIMENT_MODEL};
use viralens::scoring::{ColorInputs, SubjectPlacement};
use viralens::{
    analyze_post, assemble_post, CaptionAnalysis, CaptionAnalyzer, PostAnalysisInput,
    SentimentClassifier, SentimentProbs, ViralityScorer,
};

struct PositiveClassifier;

impl SentimentClassifier for PositiveClassifier {
    async fn classify(&self, _text: &str) -> Result<SentimentProbs, String> {
        Ok(SentimentProbs::new(0.0, 0.0, 1.0))
    }
}

fn scores(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(key, value)| (key.to_string(), *value)).collect()
}

fn caption_with_score(score: f64) -> CaptionAnalysis {
    CaptionAnalysis {
        overall_caption_score: score,
        ..CaptionAnalysis::empty()
    }
}

#[test]
fn default_config_carries_documented_weights() {
    let config = ScoringConfig::default();

    assert_eq!(config.weights.geometry.rule_of_thirds, 0.40);
    assert_eq!(config.weights.geometry.clutter, 0.20);
    assert_eq!(config.weights.color_light.brightness, 0.5);
    assert_eq!(config.weights.visual.aesthetic, 0.40);
    assert_eq!(config.weights.composite.visual, 0.60);
    assert_eq!(config.weights.composite.scale, 100.0);
    assert_eq!(config.caption.sentiment, 0.40);
    assert_eq!(config.caption.hook, 0.25);
    assert_eq!(config.classifier.model, DEFAULT_SENTIMENT_MODEL);
}

#[test]
fn partial_toml_keeps_remaining_defaults() {
    let config = ScoringConfig::from_toml(
        r#"
[weights.composite]
trend = 0.30

[caption]
emoji = 0.0

[classifier]
timeout_ms = 1500
"#,
    )
    .expect("parse config");

    assert_eq!(config.weights.composite.trend, 0.30);
    assert_eq!(config.weights.composite.visual, 0.60);
    assert_eq!(config.weights.geometry.symmetry, 0.20);
    assert_eq!(config.caption.emoji, 0.0);
    assert_eq!(config.caption.cta, 0.15);
    assert_eq!(config.classifier.timeout_ms, 1500);
}

#[test]
fn malformed_toml_is_reported() {
    let err = ScoringConfig::from_toml("[weights\nbroken").expect_err("invalid toml");
    assert!(err.starts_with("failed to parse config"));
}

#[test]
fn config_round_trips_through_disk() {
    let dir = std::env::temp_dir().join(format!("viralens-config-{}", std::process::id()));
    let path = dir.join("scoring.toml");

    let mut config = ScoringConfig::default();
    config.weights.visual.geometry = 0.25;
    config.classifier.api_token = Some("secret".to_string());
    config.write(&path).expect("write config");

    let contents = std::fs::read_to_string(&path).expect("read config");
    assert!(!contents.contains("secret"));

    let (loaded, loaded_path) = ScoringConfig::load(Some(path.clone())).expect("load config");
    assert_eq!(loaded_path, Some(path));
    assert_eq!(loaded.weights.visual.geometry, 0.25);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn missing_config_file_yields_defaults() {
    let path = std::env::temp_dir().join("viralens-does-not-exist/scoring.toml");
    let (config, _) = ScoringConfig::load(Some(path)).expect("defaults");
    assert_eq!(config.weights.composite.caption, 0.25);
}

#[test]
fn estimated_aesthetic_leans_on_contrast() {
    let color = ColorInputs {
        brightness: 0.5,
        contrast: 1.0,
    };
    assert!((estimate_aesthetic(&color) - 0.8).abs() < 1e-12);
}

#[test]
fn assemble_post_applies_fallbacks() {
    let scorer = ViralityScorer::default();
    let input = PostAnalysisInput {
        caption: "ignored here".to_string(),
        geometry_scores: scores(&[("symmetry", 0.4), ("clutter", 0.2)]),
        color_scores: scores(&[("brightness", 0.5), ("contrast", 0.6)]),
        aesthetic_score: None,
        trend_similarity: None,
        subject: Some(SubjectPlacement {
            main_box: Some([250.0, 250.0, 350.0, 350.0]),
            width: 900.0,
            height: 900.0,
        }),
    };

    let analysis = assemble_post(&scorer, input, caption_with_score(0.85));

    assert_eq!(analysis.geometry["rule_of_thirds"], 1.0);
    assert!((analysis.aesthetic_score - (0.2 + 0.36)).abs() < 1e-9);
    assert_eq!(analysis.trend_similarity, NEUTRAL_TREND_SIMILARITY);
    assert_eq!(analysis.virality.caption, 0.85);

    let direct = scorer.compute(
        analysis.aesthetic_score,
        &analysis.geometry,
        &analysis.color,
        0.85,
        NEUTRAL_TREND_SIMILARITY,
    );
    assert_eq!(analysis.virality, direct);
}

#[test]
fn assemble_post_keeps_supplied_metrics() {
    let scorer = ViralityScorer::default();
    let input = PostAnalysisInput {
        caption: String::new(),
        geometry_scores: scores(&[("rule_of_thirds", 0.6), ("symmetry", 0.4), ("clutter", 0.2)]),
        color_scores: scores(&[("brightness", 0.5), ("contrast", 0.6)]),
        aesthetic_score: Some(0.70),
        trend_similarity: Some(0.72),
        subject: Some(SubjectPlacement {
            main_box: None,
            width: 900.0,
            height: 900.0,
        }),
    };

    let analysis = assemble_post(&scorer, input, caption_with_score(0.85));

    assert_eq!(analysis.geometry["rule_of_thirds"], 0.6);
    assert!((analysis.virality.final_score - 69.37).abs() < 1e-6);
}

#[tokio::test]
async fn analyze_post_scores_caption_then_virality() {
    let scorer = ViralityScorer::default();
    let analyzer = CaptionAnalyzer::new(PositiveClassifier, Default::default());
    let input: PostAnalysisInput = serde_json::from_str(
        r#"{
            "caption": "Did you know this tiny habit changes everything? Save this",
            "geometry_scores": {"rule_of_thirds": 0.6, "symmetry": 0.4, "clutter": 0.2},
            "color_scores": {"brightness": 0.5, "contrast": 0.6},
            "aesthetic_score": 0.7,
            "trend_similarity": 0.72
        }"#,
    )
    .expect("parse input");

    let analysis = analyze_post(&analyzer, &scorer, input).await.expect("analysis");

    let expected_caption = 0.40 + 0.25 + 0.15 + 0.10;
    assert!((analysis.caption_analysis.overall_caption_score - expected_caption).abs() < 1e-9);
    assert!((analysis.virality.caption - expected_caption).abs() < 1e-9);
    assert!(analysis.virality.final_score > 0.0);
}
