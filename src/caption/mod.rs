pub mod features;

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::{CaptionAnalysis, SentimentProbs};

pub use features::{
    cta_score, emoji_count, emoji_score, hook_score, length_score, length_score_for,
    sentiment_score, word_count, CTA_PHRASES, HOOK_PHRASES,
};

/// Source of `(negative, neutral, positive)` probabilities for a caption.
///
/// Inference lives outside this crate; implementations report their own
/// failures as `Err` before any scoring happens.
pub trait SentimentClassifier {
    fn classify(&self, text: &str)
        -> impl Future<Output = Result<SentimentProbs, String>> + Send;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionWeights {
    pub sentiment: f64,
    pub hook: f64,
    pub cta: f64,
    pub length: f64,
    pub emoji: f64,
}

impl Default for CaptionWeights {
    fn default() -> Self {
        Self {
            sentiment: 0.40,
            hook: 0.25,
            cta: 0.15,
            length: 0.10,
            emoji: 0.10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptionAnalyzer<C> {
    classifier: C,
    weights: CaptionWeights,
}

impl<C: SentimentClassifier> CaptionAnalyzer<C> {
    pub fn new(classifier: C, weights: CaptionWeights) -> Self {
        Self {
            classifier,
            weights,
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub async fn analyze(&self, caption: &str) -> Result<CaptionAnalysis, String> {
        let caption = caption.trim();
        if caption.is_empty() {
            return Ok(CaptionAnalysis::empty());
        }

        let probs = self.classifier.classify(caption).await?;
        Ok(score_caption(caption, &probs, &self.weights))
    }
}

/// Scores a caption against already-known sentiment probabilities.
///
/// Blank captions short-circuit to [`CaptionAnalysis::empty`] and `probs` is
/// ignored.
pub fn score_caption(
    caption: &str,
    probs: &SentimentProbs,
    weights: &CaptionWeights,
) -> CaptionAnalysis {
    let caption = caption.trim();
    if caption.is_empty() {
        return CaptionAnalysis::empty();
    }

    let sentiment = sentiment_score(probs);
    let hook = hook_score(caption);
    let cta = cta_score(caption);
    let length = length_score(caption);
    let emoji = emoji_score(caption);

    let overall = weights.sentiment * sentiment
        + weights.hook * hook
        + weights.cta * cta
        + weights.length * length
        + weights.emoji * emoji;

    CaptionAnalysis {
        sentiment_score: sentiment,
        hook_score: hook,
        cta_score: cta,
        length_score: length,
        emoji_score: emoji,
        overall_caption_score: overall,
    }
}
