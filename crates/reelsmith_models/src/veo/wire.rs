//! Wire types for the Veo generateVideos API.
//!
//! The service answers in one of three shapes: a payload with the video
//! inline (base64 or URI), the same payload nested under `response` once
//! an operation completes, or a bare operation `name` that must be polled.

use reelsmith_core::VideoModel;
use serde::Deserialize;

/// Endpoint model identifier for a video model selection.
pub(crate) fn endpoint_model(model: VideoModel) -> &'static str {
    match model {
        VideoModel::Veo31Fast => "veo-3.1-fast-generate-preview",
        VideoModel::Veo31 => "veo-3.1-generate-preview",
    }
}

/// One generated video, delivered inline or by reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeneratedVideo {
    /// Base64-encoded video bytes
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    /// Followable download URI
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoWrapper {
    #[serde(default)]
    pub video: Option<GeneratedVideo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OperationError {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response payload of both the generate call and the operation poll.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationPayload {
    #[serde(default)]
    pub generated_videos: Option<Vec<VideoWrapper>>,
    /// Completed operations nest the result one level down
    #[serde(default)]
    pub response: Option<Box<GenerationPayload>>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub error: Option<OperationError>,
    /// Operation name to poll when the video is not ready yet
    #[serde(default)]
    pub name: Option<String>,
}

impl GenerationPayload {
    /// First generated video, direct or nested under `response`.
    pub(crate) fn generated_video(&self) -> Option<&GeneratedVideo> {
        let direct = self
            .generated_videos
            .as_ref()
            .and_then(|videos| videos.first())
            .and_then(|wrapper| wrapper.video.as_ref());
        if direct.is_some() {
            return direct;
        }

        self.response
            .as_ref()
            .and_then(|nested| nested.generated_videos.as_ref())
            .and_then(|videos| videos.first())
            .and_then(|wrapper| wrapper.video.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_direct_video() {
        let payload: GenerationPayload = serde_json::from_str(
            r#"{"generatedVideos":[{"video":{"bytesBase64Encoded":"AAAA"}}]}"#,
        )
        .unwrap();

        let video = payload.generated_video().unwrap();
        assert_eq!(video.bytes_base64_encoded.as_deref(), Some("AAAA"));
    }

    #[test]
    fn picks_nested_video_from_completed_operation() {
        let payload: GenerationPayload = serde_json::from_str(
            r#"{"done":true,"response":{"generatedVideos":[{"video":{"uri":"https://example.com/clip.mp4"}}]}}"#,
        )
        .unwrap();

        let video = payload.generated_video().unwrap();
        assert_eq!(video.uri.as_deref(), Some("https://example.com/clip.mp4"));
    }

    #[test]
    fn surfaces_operation_name_when_video_absent() {
        let payload: GenerationPayload =
            serde_json::from_str(r#"{"name":"operations/abc-123"}"#).unwrap();

        assert!(payload.generated_video().is_none());
        assert_eq!(payload.name.as_deref(), Some("operations/abc-123"));
    }

    #[test]
    fn operation_error_message_is_reachable() {
        let payload: GenerationPayload = serde_json::from_str(
            r#"{"done":true,"error":{"message":"quota exhausted"}}"#,
        )
        .unwrap();

        assert_eq!(
            payload.error.and_then(|e| e.message).as_deref(),
            Some("quota exhausted")
        );
    }

    #[test]
    fn model_endpoints() {
        assert_eq!(
            endpoint_model(VideoModel::Veo31Fast),
            "veo-3.1-fast-generate-preview"
        );
        assert_eq!(endpoint_model(VideoModel::Veo31), "veo-3.1-generate-preview");
    }
}
