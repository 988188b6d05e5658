pub mod color;
pub mod geometry;
pub mod virality;
pub mod visual;

use std::collections::HashMap;

pub use color::{ColorLightAggregator, ColorLightWeights};
pub use geometry::{
    rule_of_thirds, ColorInputs, GeometryAggregator, GeometryInputs, GeometryWeights,
    SubjectPlacement,
};
pub use virality::{CompositeWeights, ViralityScorer, ViralityWeights};
pub use visual::{VisualAggregator, VisualWeights};

fn score_or_zero(scores: &HashMap<String, f64>, key: &str) -> f64 {
    scores.get(key).copied().unwrap_or(0.0)
}
