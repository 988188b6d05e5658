pub mod analysis;
pub mod caption;
pub mod classifier;
pub mod config;
pub mod scoring;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use analysis::{analyze_post, assemble_post, PostAnalysis, PostAnalysisInput};
pub use caption::{score_caption, CaptionAnalyzer, CaptionWeights, SentimentClassifier};
pub use scoring::{ViralityScorer, ViralityWeights};

/// The five named inputs of a virality computation.
///
/// Values are expected in [0,1] but are not checked; anything outside that
/// range, NaN included, propagates linearly into the breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricBundle {
    pub aesthetic_score: f64,
    /// Recognised keys: `rule_of_thirds`, `symmetry`, `clutter`.
    #[serde(default)]
    pub geometry_scores: HashMap<String, f64>,
    /// Recognised keys: `brightness`, `contrast`.
    #[serde(default)]
    pub color_scores: HashMap<String, f64>,
    pub caption_score: f64,
    pub trend_similarity: f64,
}

/// Per-dimension result of a virality computation.
///
/// Sub-scores stay on their [0,1] scale; only `final_score` is a 0-100 index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViralityBreakdown {
    pub aesthetic: f64,
    pub geometry: f64,
    pub color_light: f64,
    pub caption: f64,
    pub trend: f64,
    pub final_score: f64,
}

impl ViralityBreakdown {
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("aesthetic", self.aesthetic),
            ("geometry", self.geometry),
            ("color_light", self.color_light),
            ("caption", self.caption),
            ("trend", self.trend),
            ("final_score", self.final_score),
        ]
    }
}

/// Classifier output, in cardiffnlp label order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentProbs {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl SentimentProbs {
    pub fn new(negative: f64, neutral: f64, positive: f64) -> Self {
        Self {
            negative,
            neutral,
            positive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptionAnalysis {
    pub sentiment_score: f64,
    pub hook_score: f64,
    pub cta_score: f64,
    pub length_score: f64,
    pub emoji_score: f64,
    pub overall_caption_score: f64,
}

impl CaptionAnalysis {
    /// Result for a blank caption: neutral sentiment prior, everything else zero.
    pub fn empty() -> Self {
        Self {
            sentiment_score: 0.5,
            hook_score: 0.0,
            cta_score: 0.0,
            length_score: 0.0,
            emoji_score: 0.0,
            overall_caption_score: 0.0,
        }
    }
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
