//! Deterministic fallback advice.
//!
//! Last line of defense when the reasoning service is unreachable, times
//! out, or returns garbage: canned text chosen by battery temperature
//! alone. Total by construction; it cannot fail for any input.

use super::{AdviceGenerator, AdvisorError, GeneratedAdvice};
use crate::types::{AdviceOrigin, Conditions};
use async_trait::async_trait;

/// Battery temperature (°C) above which the fallback issues the hot-path text.
const FALLBACK_HOT_BATTERY_TEMP_C: f64 = 40.0;

const HOT_TEXT: &str = "High battery temperature detected. Please close intensive \
applications and allow your device to cool down. Avoid charging until the \
temperature normalizes.";
const HOT_ACTION_HINT: &str = "Stop charging and close heavy applications";
const HOT_IMPACT_ESTIMATE: f64 = 0.1;

const NORMAL_TEXT: &str = "Your device temperature is within normal range. Continue \
regular usage while monitoring for any changes.";
const NORMAL_IMPACT_ESTIMATE: f64 = 0.02;

/// Local, deterministic advice generator.
pub struct FallbackAdvisor;

impl FallbackAdvisor {
    /// Produce canned advice. Infallible counterpart of the trait method.
    pub fn advice(conditions: &Conditions) -> GeneratedAdvice {
        if conditions.battery_temp > FALLBACK_HOT_BATTERY_TEMP_C {
            GeneratedAdvice {
                text: HOT_TEXT.to_string(),
                origin: AdviceOrigin::Fallback,
                impact_estimate: Some(HOT_IMPACT_ESTIMATE),
            }
        } else {
            GeneratedAdvice {
                text: NORMAL_TEXT.to_string(),
                origin: AdviceOrigin::Fallback,
                impact_estimate: Some(NORMAL_IMPACT_ESTIMATE),
            }
        }
    }

    /// Action hint paired with the hot-path text. The authoritative action
    /// still comes from the threshold classifier; this hint exists for the
    /// case where the battery runs hot (> 40 °C) without yet crossing the
    /// 45 °C danger threshold.
    pub fn action_hint(conditions: &Conditions) -> Option<String> {
        (conditions.battery_temp > FALLBACK_HOT_BATTERY_TEMP_C)
            .then(|| HOT_ACTION_HINT.to_string())
    }
}

#[async_trait]
impl AdviceGenerator for FallbackAdvisor {
    async fn generate_advice(
        &self,
        conditions: &Conditions,
    ) -> Result<GeneratedAdvice, AdvisorError> {
        Ok(Self::advice(conditions))
    }
}
