use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::scoring::{
    ColorInputs, ColorLightAggregator, ColorLightWeights, GeometryAggregator, GeometryInputs,
    GeometryWeights, VisualAggregator, VisualWeights,
};
use crate::{MetricBundle, ViralityBreakdown};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    pub visual: f64,
    pub caption: f64,
    pub trend: f64,
    /// Multiplier that turns the blended fraction into the headline index.
    pub scale: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            visual: 0.60,
            caption: 0.25,
            trend: 0.15,
            scale: 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViralityWeights {
    pub geometry: GeometryWeights,
    pub color_light: ColorLightWeights,
    pub visual: VisualWeights,
    pub composite: CompositeWeights,
}

/// Folds the visual, caption and trend sub-scores into the final 0-100 index.
///
/// Scoring is a pure function of its inputs: no state is kept between calls,
/// missing metric keys count as `0.0`, and no intermediate value is clamped.
#[derive(Debug, Clone, Default)]
pub struct ViralityScorer {
    geometry: GeometryAggregator,
    color_light: ColorLightAggregator,
    visual: VisualAggregator,
    composite: CompositeWeights,
}

impl ViralityScorer {
    pub fn new(weights: ViralityWeights) -> Self {
        Self {
            geometry: GeometryAggregator::new(weights.geometry),
            color_light: ColorLightAggregator::new(weights.color_light),
            visual: VisualAggregator::new(weights.visual),
            composite: weights.composite,
        }
    }

    pub fn compute(
        &self,
        aesthetic_score: f64,
        geometry_scores: &HashMap<String, f64>,
        color_scores: &HashMap<String, f64>,
        caption_score: f64,
        trend_similarity: f64,
    ) -> ViralityBreakdown {
        let geometry_inputs = GeometryInputs::from_scores(geometry_scores);
        let color_inputs = ColorInputs::from_scores(color_scores);

        let geometry = self.geometry.score(&geometry_inputs, &color_inputs);
        let color_light = self.color_light.score(&color_inputs);
        let visual = self.visual.score(aesthetic_score, geometry, color_light);
        let final_score = self.final_score(visual, caption_score, trend_similarity);

        ViralityBreakdown {
            aesthetic: aesthetic_score,
            geometry,
            color_light,
            caption: caption_score,
            trend: trend_similarity,
            final_score,
        }
    }

    pub fn compute_bundle(&self, bundle: &MetricBundle) -> ViralityBreakdown {
        self.compute(
            bundle.aesthetic_score,
            &bundle.geometry_scores,
            &bundle.color_scores,
            bundle.caption_score,
            bundle.trend_similarity,
        )
    }

    fn final_score(&self, visual: f64, caption: f64, trend: f64) -> f64 {
        let blended = self.composite.visual * visual
            + self.composite.caption * caption
            + self.composite.trend * trend;
        blended * self.composite.scale
    }
}
