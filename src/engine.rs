//! Advisory Decision Engine
//!
//! Wires the scorers, advice generators and history store into the single
//! public operation: [`AdvisoryEngine::advise`]. The engine degrades
//! instead of failing — model inference failure substitutes the rule
//! score, remote advice failure substitutes the local fallback, and a
//! persistence failure is logged without touching the response. An
//! advisory request therefore always produces a valid [`Advisory`].

use crate::advisor::{classify_alert, AdviceGenerator, FallbackAdvisor, GeneratedAdvice};
use crate::history::AdvisoryHistory;
use crate::scoring::{LinearModel, RuleScorer, Scorer};
use crate::types::{AdviceOrigin, Advisory, AdvisoryRecord, Conditions};
use chrono::Utc;
use std::sync::Arc;

/// The advisory pipeline. Shared across requests behind an `Arc`; all
/// state is immutable except the history store, which is internally
/// synchronized.
pub struct AdvisoryEngine {
    model: LinearModel,
    remote: Option<Arc<dyn AdviceGenerator>>,
    history: AdvisoryHistory,
}

impl AdvisoryEngine {
    pub fn new(
        model: LinearModel,
        remote: Option<Arc<dyn AdviceGenerator>>,
        history: AdvisoryHistory,
    ) -> Self {
        Self {
            model,
            remote,
            history,
        }
    }

    pub fn history(&self) -> &AdvisoryHistory {
        &self.history
    }

    /// Produce an advisory for the given conditions and append it to
    /// history. Infallible at this surface.
    pub async fn advise(&self, conditions: &Conditions) -> Advisory {
        let predicted_health_impact = self.score(conditions);
        let advice = self.generate_advice(conditions).await;
        let (alert_level, classifier_action) = classify_alert(conditions);

        // The threshold classifier owns the alert level for both variants.
        // The fallback's canned action wording takes precedence when the
        // fallback answered, so its hot-path advice stays self-consistent.
        let recommended_action = match advice.origin {
            AdviceOrigin::Fallback => {
                FallbackAdvisor::action_hint(conditions).or(classifier_action)
            }
            AdviceOrigin::Remote => classifier_action,
        };

        let advisory = Advisory {
            predicted_health_impact,
            alert_level,
            advice_text: advice.text,
            recommended_action,
            advice_source: advice.origin,
        };

        let record = AdvisoryRecord {
            conditions: conditions.clone(),
            advisory: advisory.clone(),
            timestamp: Utc::now(),
        };
        if let Err(e) = self.history.append(&record) {
            tracing::error!(error = %e, "failed to persist advisory record");
        }

        advisory
    }

    /// Model score with rule substitution on inference failure.
    fn score(&self, conditions: &Conditions) -> f64 {
        match self.model.score(conditions) {
            Ok(impact) => impact,
            Err(e) => {
                tracing::warn!(error = %e, "model inference failed, substituting rule score");
                RuleScorer.score(conditions).unwrap_or(0.0)
            }
        }
    }

    /// One remote attempt, no in-request retry; the fallback is total.
    async fn generate_advice(&self, conditions: &Conditions) -> GeneratedAdvice {
        if let Some(remote) = &self.remote {
            match remote.generate_advice(conditions).await {
                Ok(advice) => return advice,
                Err(e) => {
                    tracing::warn!(error = %e, "remote advice failed, using local fallback");
                }
            }
        }
        FallbackAdvisor::advice(conditions)
    }
}
