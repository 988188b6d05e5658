use serde::{Deserialize, Serialize};

use crate::scoring::ColorInputs;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorLightWeights {
    pub brightness: f64,
    pub contrast: f64,
}

impl Default for ColorLightWeights {
    fn default() -> Self {
        Self {
            brightness: 0.5,
            contrast: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColorLightAggregator {
    weights: ColorLightWeights,
}

impl ColorLightAggregator {
    pub fn new(weights: ColorLightWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, color: &ColorInputs) -> f64 {
        self.weights.brightness * color.brightness + self.weights.contrast * color.contrast
    }
}
