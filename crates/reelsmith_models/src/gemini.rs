//! Gemini segmentation planner.

use crate::segments::{parse_segment_payload, planning_prompt};
use async_trait::async_trait;
use reelsmith_error::{PlannerError, PlannerErrorKind, ReelsmithResult};
use reelsmith_interface::{PlannerBackend, SegmentProposal};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Segmentation planner over the Gemini `generateContent` REST API.
///
/// Requests strict JSON output (`responseMimeType: application/json`) at
/// low temperature so the answer parses deterministically.
#[derive(Debug, Clone)]
pub struct GeminiPlanner {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiPlanner {
    /// Creates a planner from the environment.
    ///
    /// Reads the API key from `GEMINI_API_KEY` and an optional model
    /// override from `GEMINI_ORCHESTRATOR_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    #[instrument(skip_all)]
    pub fn new() -> ReelsmithResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            PlannerError::new(PlannerErrorKind::MissingApiKey("GEMINI_API_KEY".to_string()))
        })?;

        let model = std::env::var("GEMINI_ORCHESTRATOR_MODEL")
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
impl PlannerBackend for GeminiPlanner {
    #[instrument(skip(self, script, planning_system_prompt), fields(model = %self.model))]
    async fn propose(
        &self,
        script: &str,
        planning_system_prompt: &str,
    ) -> ReelsmithResult<Vec<SegmentProposal>> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let prompt = format!(
            "System instructions: {planning_system_prompt}\n{}",
            planning_prompt(script)
        );

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": 0.2,
            },
        });

        debug!(url = %url, "Sending Gemini planning request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
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
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                PlannerError::new(PlannerErrorKind::MalformedResponse(
                    "response carried no candidate text".to_string(),
                ))
            })?;

        let proposals = parse_segment_payload(text)?;
        debug!(count = proposals.len(), "Gemini proposed segments");
        Ok(proposals)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
