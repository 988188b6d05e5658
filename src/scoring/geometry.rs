use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::scoring::score_or_zero;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryWeights {
    pub rule_of_thirds: f64,
    pub symmetry: f64,
    pub clutter: f64,
    pub brightness: f64,
    pub contrast: f64,
}

impl Default for GeometryWeights {
    fn default() -> Self {
        Self {
            rule_of_thirds: 0.40,
            symmetry: 0.20,
            clutter: 0.20,
            brightness: 0.10,
            contrast: 0.10,
        }
    }
}

/// Composition metrics read out of a geometry provider's mapping.
///
/// Every field defaults to `0.0` when its key is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryInputs {
    /// `rule_of_thirds`: subject placement relative to the thirds grid.
    pub rule_of_thirds: f64,
    /// `symmetry`: mirror similarity of the frame.
    pub symmetry: f64,
    /// `clutter`: edge density, higher means busier.
    pub clutter: f64,
}

impl GeometryInputs {
    pub fn from_scores(scores: &HashMap<String, f64>) -> Self {
        Self {
            rule_of_thirds: score_or_zero(scores, "rule_of_thirds"),
            symmetry: score_or_zero(scores, "symmetry"),
            clutter: score_or_zero(scores, "clutter"),
        }
    }
}

/// Exposure metrics read out of a color provider's mapping.
///
/// Every field defaults to `0.0` when its key is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorInputs {
    /// `brightness`: mean intensity scaled to [0,1].
    pub brightness: f64,
    /// `contrast`: normalized intensity spread.
    pub contrast: f64,
}

impl ColorInputs {
    pub fn from_scores(scores: &HashMap<String, f64>) -> Self {
        Self {
            brightness: score_or_zero(scores, "brightness"),
            contrast: score_or_zero(scores, "contrast"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeometryAggregator {
    weights: GeometryWeights,
}

impl GeometryAggregator {
    pub fn new(weights: GeometryWeights) -> Self {
        Self { weights }
    }

    /// Folds composition and exposure into one geometry sub-score.
    ///
    /// Clutter is inverted so a calmer frame scores higher. Nothing is clamped:
    /// out-of-range inputs pass straight through to the result.
    pub fn score(&self, geometry: &GeometryInputs, color: &ColorInputs) -> f64 {
        let mut score = 0.0;

        score += self.weights.rule_of_thirds * geometry.rule_of_thirds;
        score += self.weights.symmetry * geometry.symmetry;
        score += self.weights.clutter * (1.0 - geometry.clutter);
        score += self.weights.brightness * color.brightness;
        score += self.weights.contrast * color.contrast;

        score
    }
}

/// Where the main subject sits inside the frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectPlacement {
    /// Bounding box of the main subject as `[x1, y1, x2, y2]`.
    #[serde(default)]
    pub main_box: Option<[f64; 4]>,
    pub width: f64,
    pub height: f64,
}

impl SubjectPlacement {
    /// Center of the subject box, or the frame center when nothing was detected.
    pub fn center(&self) -> (f64, f64) {
        match self.main_box {
            Some([x1, y1, x2, y2]) => ((x1 + x2) / 2.0, (y1 + y2) / 2.0),
            None => (self.width / 2.0, self.height / 2.0),
        }
    }

    pub fn rule_of_thirds(&self) -> f64 {
        let (cx, cy) = self.center();
        rule_of_thirds(cx, cy, self.width, self.height)
    }
}

/// Scores how close a subject center lies to the thirds grid, in [0,1].
///
/// The distance is taken to the nearest third line on either axis and
/// normalized by a third of the longer frame side.
pub fn rule_of_thirds(center_x: f64, center_y: f64, width: f64, height: f64) -> f64 {
    let max_dist = width.max(height) / 3.0;
    if max_dist <= 0.0 {
        return 0.0;
    }

    let dist_x = nearest_third(center_x, width);
    let dist_y = nearest_third(center_y, height);
    let dist = dist_x.min(dist_y);

    (1.0 - dist / max_dist).clamp(0.0, 1.0)
}

fn nearest_third(value: f64, extent: f64) -> f64 {
    let first = (value - extent / 3.0).abs();
    let second = (value - 2.0 * extent / 3.0).abs();
    first.min(second)
}
