//! Boundary types exchanged with remote collaborators.

use reelsmith_core::{RunStatus, SelectedModels};
use serde::{Deserialize, Serialize};

/// One segment as proposed by a remote planner, before normalization.
///
/// Every field except the text is optional: backends answer with whatever
/// subset they managed to produce and the planner fills the gaps. The
/// duration stays fractional here; rounding and clamping happen during
/// normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentProposal {
    /// Proposed narration text
    #[serde(default)]
    pub text: String,
    /// Proposed duration in seconds
    #[serde(default)]
    pub target_seconds: Option<f64>,
    /// Proposed continuity guidance
    #[serde(default)]
    pub continuity_notes: Option<String>,
}

/// Request for one clip from a video generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRequest {
    /// The fully assembled generation prompt
    pub prompt: String,
    /// Requested clip duration in seconds
    pub target_seconds: u32,
    /// Workspace-relative paths of reference images, when supplied
    pub reference_images: Vec<String>,
}

/// Raw output of a successful clip generation.
///
/// Adapters hide the delivery shape (inline payload, download URI, or
/// polled operation) and always hand back decoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipOutput {
    /// Decoded video bytes
    pub bytes: Vec<u8>,
    /// File extension of the payload, e.g. `mp4`
    pub extension: String,
    /// Actual clip duration in seconds
    pub duration_sec: u32,
}

/// Severity of a stage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    /// Normal progress
    Info,
    /// A failure worth surfacing
    Error,
}

/// Free-form metadata attached to a stage event.
pub type EventMetadata = serde_json::Map<String, serde_json::Value>;

/// Notification that a run has been created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunCreated {
    /// Project the run belongs to
    pub project_id: String,
    /// Unique run identifier
    pub run_id: String,
    /// Models selected for the run
    pub selected_models: SelectedModels,
    /// Leading characters of the script, for display
    pub script_preview: String,
    /// Number of reference images supplied
    pub reference_image_count: usize,
}

/// Notification that a run changed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    /// Project the run belongs to
    pub project_id: String,
    /// Unique run identifier
    pub run_id: String,
    /// The new status
    pub status: RunStatus,
    /// Failure summary, present only for failed runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// A leveled progress event within a run stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageEvent {
    /// Project the run belongs to
    pub project_id: String,
    /// Unique run identifier
    pub run_id: String,
    /// Event severity
    pub level: EventLevel,
    /// Pipeline stage name, e.g. `planning` or `generation`
    pub stage: String,
    /// Human-readable description
    pub message: String,
    /// Free-form structured details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EventMetadata>,
}
