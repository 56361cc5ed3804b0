//! Deterministic rule-based health-impact scorer.
//!
//! Hand-tuned heuristic kept alongside the predictive model: every degree
//! of battery temperature above 25 °C costs 0.003, charging while above
//! 30 °C adds a flat 0.02, and CPU heat above 60 °C contributes at a lower
//! weight. The result is clamped to the shared impact bounds.

use super::{clamp_impact, ModelError, Scorer};
use crate::types::{Conditions, DeviceState};

const BATTERY_TEMP_BASELINE_C: f64 = 25.0;
const BATTERY_TEMP_WEIGHT: f64 = 0.003;
const CHARGING_TEMP_THRESHOLD_C: f64 = 30.0;
const CHARGING_PENALTY: f64 = 0.02;
const CPU_TEMP_BASELINE_C: f64 = 60.0;
const CPU_TEMP_WEIGHT: f64 = 0.001;

/// Deterministic scorer; cannot fail.
pub struct RuleScorer;

impl RuleScorer {
    /// Raw (unclamped) rule evaluation, exposed for divergence tests.
    pub fn raw_impact(conditions: &Conditions) -> f64 {
        let mut impact = (conditions.battery_temp - BATTERY_TEMP_BASELINE_C).max(0.0)
            * BATTERY_TEMP_WEIGHT;

        if conditions.device_state == DeviceState::Charging
            && conditions.battery_temp > CHARGING_TEMP_THRESHOLD_C
        {
            impact += CHARGING_PENALTY;
        }

        if let Some(cpu_temp) = conditions.cpu_temp {
            impact += (cpu_temp - CPU_TEMP_BASELINE_C).max(0.0) * CPU_TEMP_WEIGHT;
        }

        impact
    }
}

impl Scorer for RuleScorer {
    fn score(&self, conditions: &Conditions) -> Result<f64, ModelError> {
        Ok(clamp_impact(Self::raw_impact(conditions)))
    }
}
