//! Linear predictive health-impact model.
//!
//! Weights and intercept over a fixed, versioned column schema agreed with
//! the offline training collaborator: two numeric temperature columns plus
//! a one-hot encoding of the device state. A categorical value unseen at
//! fit time encodes to all-zero columns, never an error.
//!
//! The model artifact is a JSON file loaded once at startup and immutable
//! afterwards. When no artifact exists, built-in hand-tuned coefficients
//! stand in so startup never blocks on a training step.

use super::{clamp_impact, ModelError, Scorer};
use crate::types::Conditions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Version of the feature column schema. Bumped together with the offline
/// training pipeline whenever columns change.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

const NUMERIC_COLUMNS: [&str; 2] = ["battery_temp", "ambient_temp"];
const DEVICE_STATE_PREFIX: &str = "device_state_";

/// Serialized linear model: `impact = weights · features + intercept`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub schema_version: u32,
    pub columns: Vec<String>,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl Default for LinearModel {
    /// Built-in coefficients, hand-tuned to track the rule scorer's shape.
    fn default() -> Self {
        Self {
            schema_version: FEATURE_SCHEMA_VERSION,
            columns: vec![
                "battery_temp".to_string(),
                "ambient_temp".to_string(),
                "device_state_active".to_string(),
                "device_state_charging".to_string(),
                "device_state_discharging".to_string(),
                "device_state_idle".to_string(),
            ],
            weights: vec![0.0028, 0.0004, 0.006, 0.018, 0.004, 0.0],
            intercept: -0.065,
        }
    }
}

impl LinearModel {
    /// Load a model artifact and validate it against the supported schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&raw)?;

        if model.schema_version != FEATURE_SCHEMA_VERSION {
            return Err(ModelError::UnsupportedSchema(model.schema_version));
        }
        if model.columns.len() != model.weights.len() {
            return Err(ModelError::SchemaMismatch {
                columns: model.columns.len(),
                weights: model.weights.len(),
            });
        }
        Ok(model)
    }

    /// Load the artifact at `path`, falling back to the built-in
    /// coefficients when it is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(model) => {
                tracing::info!(path = %path.as_ref().display(), columns = model.columns.len(), "loaded model artifact");
                model
            }
            Err(e) => {
                tracing::warn!(path = %path.as_ref().display(), error = %e, "model artifact unavailable, using built-in coefficients");
                Self::default()
            }
        }
    }

    /// Persist the model artifact as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Encode conditions into the model's column order.
    ///
    /// Missing-category policy: a device state without a matching one-hot
    /// column contributes zeros everywhere, and unknown columns read as 0.
    fn encode(&self, conditions: &Conditions) -> Vec<f64> {
        let state_column = format!("{DEVICE_STATE_PREFIX}{}", conditions.device_state);

        self.columns
            .iter()
            .map(|column| {
                if column == NUMERIC_COLUMNS[0] {
                    conditions.battery_temp
                } else if column == NUMERIC_COLUMNS[1] {
                    conditions.ambient_temp
                } else if *column == state_column {
                    1.0
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Raw model prediction (unclamped).
    pub fn predict(&self, conditions: &Conditions) -> Result<f64, ModelError> {
        let features = self.encode(conditions);
        let prediction: f64 = features
            .iter()
            .zip(&self.weights)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept;

        if !prediction.is_finite() {
            return Err(ModelError::InvalidPrediction(prediction));
        }
        Ok(prediction)
    }
}

impl Scorer for LinearModel {
    fn score(&self, conditions: &Conditions) -> Result<f64, ModelError> {
        self.predict(conditions).map(clamp_impact)
    }
}
