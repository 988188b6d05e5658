use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualWeights {
    pub aesthetic: f64,
    pub geometry: f64,
    pub color_light: f64,
}

impl Default for VisualWeights {
    fn default() -> Self {
        Self {
            aesthetic: 0.40,
            geometry: 0.30,
            color_light: 0.30,
        }
    }
}

/// Blends the learned aesthetic signal with the two rule-based sub-scores.
#[derive(Debug, Clone, Default)]
pub struct VisualAggregator {
    weights: VisualWeights,
}

impl VisualAggregator {
    pub fn new(weights: VisualWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, aesthetic: f64, geometry: f64, color_light: f64) -> f64 {
        let mut score = 0.0;

        score += self.weights.aesthetic * aesthetic;
        score += self.weights.geometry * geometry;
        score += self.weights.color_light * color_light;

        score
    }
}
