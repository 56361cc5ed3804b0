//! Health-impact scoring.
//!
//! Two scorers implement one [`Scorer`] contract: a hand-tuned
//! deterministic rule and a linear predictive model fitted offline. The
//! engine prefers the model and substitutes the rule on any inference
//! failure; both clamp their output to the same bounds, and tests compare
//! the two against shared fixtures.

mod model;
mod rule;

pub use model::LinearModel;
pub use rule::RuleScorer;

use crate::types::Conditions;

/// Upper bound on the predicted health impact.
pub const MAX_HEALTH_IMPACT: f64 = 0.15;

/// Clamp a raw score into the advertised [0, MAX_HEALTH_IMPACT] range.
pub fn clamp_impact(raw: f64) -> f64 {
    raw.clamp(0.0, MAX_HEALTH_IMPACT)
}

/// Model loading / inference errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("column/weight count mismatch: {columns} columns, {weights} weights")]
    SchemaMismatch { columns: usize, weights: usize },
    #[error("unsupported schema version {0}")]
    UnsupportedSchema(u32),
    #[error("model produced a non-finite prediction: {0}")]
    InvalidPrediction(f64),
}

/// A bounded health-impact scorer.
pub trait Scorer: Send + Sync {
    /// Score the given conditions. The returned value is always within
    /// [0, [`MAX_HEALTH_IMPACT`]].
    fn score(&self, conditions: &Conditions) -> Result<f64, ModelError>;
}
