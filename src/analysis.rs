use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::caption::{CaptionAnalyzer, SentimentClassifier};
use crate::scoring::{ColorInputs, SubjectPlacement, ViralityScorer};
use crate::{CaptionAnalysis, ViralityBreakdown};

/// Trend similarity used when there is no reference bank to compare against.
pub const NEUTRAL_TREND_SIMILARITY: f64 = 0.5;

/// Everything known about a post before scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostAnalysisInput {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub geometry_scores: HashMap<String, f64>,
    #[serde(default)]
    pub color_scores: HashMap<String, f64>,
    /// Falls back to [`estimate_aesthetic`] when absent.
    #[serde(default)]
    pub aesthetic_score: Option<f64>,
    /// Falls back to [`NEUTRAL_TREND_SIMILARITY`] when absent.
    #[serde(default)]
    pub trend_similarity: Option<f64>,
    /// Used to derive `rule_of_thirds` when the geometry map lacks it.
    #[serde(default)]
    pub subject: Option<SubjectPlacement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostAnalysis {
    pub geometry: HashMap<String, f64>,
    pub color: HashMap<String, f64>,
    pub aesthetic_score: f64,
    pub trend_similarity: f64,
    pub caption_analysis: CaptionAnalysis,
    pub virality: ViralityBreakdown,
}

/// Exposure-only stand-in for a learned aesthetic score.
pub fn estimate_aesthetic(color: &ColorInputs) -> f64 {
    0.4 * color.brightness + 0.6 * color.contrast
}

pub async fn analyze_post<C: SentimentClassifier>(
    analyzer: &CaptionAnalyzer<C>,
    scorer: &ViralityScorer,
    input: PostAnalysisInput,
) -> Result<PostAnalysis, String> {
    let caption = analyzer.analyze(&input.caption).await?;
    Ok(assemble_post(scorer, input, caption))
}

/// Fills in derived metrics and runs the virality scorer.
pub fn assemble_post(
    scorer: &ViralityScorer,
    input: PostAnalysisInput,
    caption: CaptionAnalysis,
) -> PostAnalysis {
    let mut geometry = input.geometry_scores;
    if let Some(subject) = input.subject.as_ref() {
        geometry
            .entry("rule_of_thirds".to_string())
            .or_insert_with(|| subject.rule_of_thirds());
    }

    let color = input.color_scores;
    let aesthetic_score = input
        .aesthetic_score
        .unwrap_or_else(|| estimate_aesthetic(&ColorInputs::from_scores(&color)));
    let trend_similarity = input.trend_similarity.unwrap_or(NEUTRAL_TREND_SIMILARITY);

    let virality = scorer.compute(
        aesthetic_score,
        &geometry,
        &color,
        caption.overall_caption_score,
        trend_similarity,
    );

    PostAnalysis {
        geometry,
        color,
        aesthetic_score,
        trend_similarity,
        caption_analysis: caption,
        virality,
    }
}
