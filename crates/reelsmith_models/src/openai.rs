//! OpenAI segmentation planner.

use crate::segments::{parse_segment_payload, planning_prompt};
use async_trait::async_trait;
use reelsmith_error::{PlannerError, PlannerErrorKind, ReelsmithResult};
use reelsmith_interface::{PlannerBackend, SegmentProposal};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Segmentation planner over the OpenAI chat completions API.
///
/// Uses `response_format: json_object` so the answer parses
/// deterministically.
#[derive(Debug, Clone)]
pub struct OpenAiPlanner {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiPlanner {
    /// Creates a planner from the environment.
    ///
    /// Reads the API key from `OPENAI_API_KEY` and an optional model
    /// override from `OPENAI_ORCHESTRATOR_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    #[instrument(skip_all)]
    pub fn new() -> ReelsmithResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            PlannerError::new(PlannerErrorKind::MissingApiKey("OPENAI_API_KEY".to_string()))
        })?;

        let model = std::env::var("OPENAI_ORCHESTRATOR_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self::with_api_key(api_key, model))
    }

    /// Creates a planner with an explicit API key and model.
    pub fn with_api_key(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PlannerBackend for OpenAiPlanner {
    #[instrument(skip(self, script, planning_system_prompt), fields(model = %self.model))]
    async fn propose(
        &self,
        script: &str,
        planning_system_prompt: &str,
    ) -> ReelsmithResult<Vec<SegmentProposal>> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = json!({
            "model": self.model,
            "temperature": 0.2,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": planning_system_prompt },
                { "role": "user", "content": planning_prompt(script) },
            ],
        });

        debug!(url = %url, "Sending OpenAI planning request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlannerError::new(PlannerErrorKind::Request(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlannerError::new(PlannerErrorKind::Status {
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PlannerError::new(PlannerErrorKind::MalformedResponse(e.to_string())))?;

        let text = payload
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                PlannerError::new(PlannerErrorKind::MalformedResponse(
                    "response carried no message content".to_string(),
                ))
            })?;

        let proposals = parse_segment_payload(text)?;
        debug!(count = proposals.len(), "OpenAI proposed segments");
        Ok(proposals)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
