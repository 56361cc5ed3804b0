//! Remote reasoning-service advice generator.
//!
//! Builds a natural-language prompt from the full set of conditions and
//! POSTs it to a Gemini-style `generateContent` endpoint. The call is
//! bounded by a client-level timeout; any transport failure, non-success
//! status or unexpected response shape surfaces as [`AdvisorError`] and
//! sends the engine to the fallback variant. The returned text is advisory
//! only and is never parsed for control decisions.

use super::{AdviceGenerator, AdvisorError, GeneratedAdvice};
use crate::types::{AdviceOrigin, Conditions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// HTTP client for the external reasoning service.
pub struct RemoteAdvisor {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl RemoteAdvisor {
    /// Build a client with a bounded per-request timeout.
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, AdvisorError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Render the advisory prompt. Every condition field is embedded;
    /// an absent CPU temperature reads "Not available".
    pub fn build_prompt(conditions: &Conditions) -> String {
        let cpu_temp = conditions
            .cpu_temp
            .map_or_else(|| "Not available".to_string(), |t| format!("{t}°C"));

        format!(
            "You are a battery health and device temperature expert. Analyze the \
following device conditions and provide advice:\n\n\
Device State: {state}\n\
Battery Temperature: {battery_temp}°C\n\
Ambient Temperature: {ambient_temp}°C\n\
Battery Level: {battery_level}%\n\
CPU Temperature: {cpu_temp}\n\n\
Provide:\n\
1. A brief assessment of the current thermal situation\n\
2. Specific recommendations to protect battery health\n\
3. Any immediate actions if temperatures are critical\n\n\
Keep the response concise and practical. Focus on actionable advice.",
            state = conditions.device_state,
            battery_temp = conditions.battery_temp,
            ambient_temp = conditions.ambient_temp,
            battery_level = conditions.battery_level,
        )
    }
}

#[async_trait]
impl AdviceGenerator for RemoteAdvisor {
    async fn generate_advice(
        &self,
        conditions: &Conditions,
    ) -> Result<GeneratedAdvice, AdvisorError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::build_prompt(conditions),
                }],
            }],
        };

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.endpoint, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::ServerStatus(status));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                AdvisorError::MalformedResponse("no candidate text in response".to_string())
            })?;

        Ok(GeneratedAdvice {
            text,
            origin: AdviceOrigin::Remote,
            impact_estimate: None,
        })
    }
}
