//! Veo generation client.

use super::wire::{endpoint_model, GeneratedVideo, GenerationPayload};
use async_trait::async_trait;
use base64::Engine;
use reelsmith_core::{RunConfig, VideoModel};
use reelsmith_error::{GenerationError, GenerationErrorKind, ReelsmithResult};
use reelsmith_interface::{ClipOutput, ClipRequest, VideoGenerator};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_POLL_ATTEMPTS: u32 = 90;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Client for the Veo `generateVideos` endpoint.
///
/// Handles all three delivery shapes the service answers with: inline
/// base64 bytes, a followable download URI, and a long-running operation
/// name polled until done. The poll is bounded; exceeding the ceiling
/// fails the one clip being generated, never the whole run.
pub struct VeoClient {
    client: Client,
    api_key: String,
    base_url: String,
    video_model: VideoModel,
    model_label: String,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl std::fmt::Debug for VeoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VeoClient")
            .field("base_url", &self.base_url)
            .field("video_model", &self.video_model)
            .field("poll_attempts", &self.poll_attempts)
            .finish_non_exhaustive()
    }
}

impl VeoClient {
    /// Creates a client from the environment.
    ///
    /// Reads the API key from `GEMINI_API_KEY`, falling back to
    /// `GOOGLE_GENAI_API_KEY`, and an optional base URL override from
    /// `VEO_API_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither API key variable is set.
    #[instrument]
    pub fn new(video_model: VideoModel) -> ReelsmithResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_GENAI_API_KEY"))
            .map_err(|_| {
                GenerationError::new(GenerationErrorKind::MissingApiKey(
                    "GEMINI_API_KEY/GOOGLE_GENAI_API_KEY".to_string(),
                ))
            })?;

        let mut client = Self::with_api_key(api_key, video_model);
        if let Ok(base_url) = std::env::var("VEO_API_BASE_URL") {
            client.base_url = base_url;
        }
        Ok(client)
    }

    /// Creates a client from the environment with poll limits taken from
    /// a run config.
    ///
    /// # Errors
    ///
    /// Returns an error if neither API key variable is set.
    pub fn from_config(video_model: VideoModel, config: &RunConfig) -> ReelsmithResult<Self> {
        Ok(Self::new(video_model)?.with_poll_limits(
            *config.poll_attempts(),
            Duration::from_millis(*config.poll_interval_ms()),
        ))
    }

    /// Creates a client with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>, video_model: VideoModel) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            video_model,
            model_label: video_model.to_string(),
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the operation poll ceiling and inter-attempt delay.
    pub fn with_poll_limits(mut self, attempts: u32, interval: Duration) -> Self {
        self.poll_attempts = attempts;
        self.poll_interval = interval;
        self
    }

    /// Decode the video from its delivery shape into raw bytes.
    async fn resolve_video(&self, video: &GeneratedVideo) -> ReelsmithResult<Vec<u8>> {
        if let Some(encoded) = &video.bytes_base64_encoded {
            return base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| {
                    GenerationError::new(GenerationErrorKind::Base64Decode(e.to_string())).into()
                });
        }

        if let Some(uri) = &video.uri {
            debug!(uri = %uri, "Downloading generated clip");
            let response = self.client.get(uri).send().await.map_err(|e| {
                GenerationError::new(GenerationErrorKind::Download(e.to_string()))
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(GenerationError::new(GenerationErrorKind::Download(format!(
                    "HTTP {status} from {uri}"
                )))
                .into());
            }

            let bytes = response.bytes().await.map_err(|e| {
                GenerationError::new(GenerationErrorKind::Download(e.to_string()))
            })?;
            return Ok(bytes.to_vec());
        }

        Err(GenerationError::new(GenerationErrorKind::MissingPayload).into())
    }

    /// Poll a long-running operation until done or the ceiling is hit.
    async fn poll_operation(&self, operation_name: &str) -> ReelsmithResult<GenerationPayload> {
        for attempt in 0..self.poll_attempts {
            let url = format!("{}/{}", self.base_url, operation_name);
            let response = self
                .client
                .get(&url)
                .query(&[("key", self.api_key.as_str())])
                .send()
                .await
                .map_err(|e| {
                    GenerationError::new(GenerationErrorKind::Request(e.to_string()))
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(GenerationError::new(GenerationErrorKind::Status {
                    status: status.as_u16(),
                    message: format!("operation poll for {operation_name}"),
                })
                .into());
            }

            let payload: GenerationPayload = response.json().await.map_err(|e| {
                GenerationError::new(GenerationErrorKind::Request(e.to_string()))
            })?;

            if payload.done.unwrap_or(false) {
                if let Some(message) = payload.error.as_ref().and_then(|e| e.message.clone()) {
                    return Err(
                        GenerationError::new(GenerationErrorKind::JobFailed(message)).into()
                    );
                }
                debug!(attempt, operation = %operation_name, "Operation completed");
                return Ok(payload);
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        warn!(operation = %operation_name, attempts = self.poll_attempts, "Operation poll ceiling exceeded");
        Err(GenerationError::new(GenerationErrorKind::PollTimeout {
            attempts: self.poll_attempts,
        })
        .into())
    }
}

#[async_trait]
impl VideoGenerator for VeoClient {
    #[instrument(skip(self, request), fields(model = %self.model_label, target_seconds = request.target_seconds))]
    async fn generate(&self, request: &ClipRequest) -> ReelsmithResult<ClipOutput> {
        let url = format!(
            "{}/models/{}:generateVideos",
            self.base_url,
            endpoint_model(self.video_model)
        );

        let body = json!({
            "prompt": request.prompt,
            "config": {
                "aspectRatio": "9:16",
                "durationSeconds": request.target_seconds,
                "generateAudio": true,
            },
        });

        debug!(url = %url, "Sending Veo generation request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Request(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::new(GenerationErrorKind::Status {
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let payload: GenerationPayload = response
            .json()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Request(e.to_string())))?;

        let bytes = if let Some(video) = payload.generated_video() {
            self.resolve_video(video).await?
        } else {
            let operation_name = payload.name.clone().ok_or_else(|| {
                GenerationError::new(GenerationErrorKind::MissingPayload)
            })?;

            let completed = self.poll_operation(&operation_name).await?;
            let video = completed
                .generated_video()
                .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingPayload))?;
            self.resolve_video(video).await?
        };

        debug!(size = bytes.len(), "Generated clip resolved");

        Ok(ClipOutput {
            bytes,
            extension: "mp4".to_string(),
            duration_sec: request.target_seconds,
        })
    }

    fn provider_name(&self) -> &'static str {
        "veo"
    }

    fn model_name(&self) -> &str {
        &self.model_label
    }
}
