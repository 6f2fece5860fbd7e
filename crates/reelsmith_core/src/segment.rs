//! Segment plan and segment artifact types.

use serde::{Deserialize, Serialize};

/// Where a segment plan came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlanSource {
    /// Produced by the remote language-model planner
    Llm,
    /// Produced by the deterministic sentence-packing heuristic
    Heuristic,
}

/// One planned speaking segment.
///
/// Plan items are immutable once produced by the planner: `index` is a
/// 1-based contiguous ordinal in script order and `target_seconds` has
/// already been clamped into the configured duration window.
///
/// # Examples
///
/// ```
/// use reelsmith_core::SegmentPlanItem;
///
/// let item = SegmentPlanItem {
///     index: 1,
///     text: "Meet the water bottle that remembers to hydrate for you.".to_string(),
///     target_seconds: 8,
///     continuity_notes: "Open with direct hook and clear speaking subject.".to_string(),
/// };
/// assert_eq!(item.index, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPlanItem {
    /// 1-based position of this segment in the script
    pub index: u32,
    /// Narration text spoken during this segment
    pub text: String,
    /// Target clip duration in seconds, clamped into the configured window
    pub target_seconds: u32,
    /// Free-text guidance keeping visual identity consistent across segments
    pub continuity_notes: String,
}

/// The ordered result of planning a script.
///
/// Invariant: a non-empty input script always yields at least one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPlanResult {
    /// Ordered segments, indices contiguous from 1
    pub segments: Vec<SegmentPlanItem>,
    /// Which planning path produced the segments
    pub source: PlanSource,
}

/// Lifecycle state of one segment's generation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SegmentStatus {
    /// Not yet dispatched, or dispatch in flight
    Pending,
    /// Clip bytes persisted successfully
    Generated,
    /// Generation failed; `error` holds the reason
    Failed,
}

/// Per-segment outcome record inside a run manifest.
///
/// Evolves `pending → generated | failed`. The clip reference fields and
/// `error` are mutually exclusive: a generated artifact has a clip
/// reference and no error, a failed artifact has an error and no clip
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentArtifact {
    /// 1-based position of this segment in the script
    pub index: u32,
    /// Narration text spoken during this segment
    pub text: String,
    /// Target clip duration in seconds
    pub target_seconds: u32,
    /// Continuity guidance carried over from the plan
    pub continuity_notes: String,
    /// The full generation prompt bound to this segment
    pub prompt: String,
    /// Current lifecycle state
    pub status: SegmentStatus,
    /// Workspace-relative path of the persisted clip
    pub clip_path: Option<String>,
    /// Bare file name of the persisted clip
    pub clip_file_name: Option<String>,
    /// Download locator for the clip, derived from run identity
    pub download_url: Option<String>,
    /// Actual clip duration reported by the generation service
    pub duration_sec: Option<u32>,
    /// Human-readable failure reason
    pub error: Option<String>,
}

impl SegmentArtifact {
    /// Create a pending artifact from a plan item and its bound prompt.
    pub fn pending(segment: &SegmentPlanItem, prompt: impl Into<String>) -> Self {
        Self {
            index: segment.index,
            text: segment.text.clone(),
            target_seconds: segment.target_seconds,
            continuity_notes: segment.continuity_notes.clone(),
            prompt: prompt.into(),
            status: SegmentStatus::Pending,
            clip_path: None,
            clip_file_name: None,
            download_url: None,
            duration_sec: None,
            error: None,
        }
    }

    /// Produce the generated successor of this artifact.
    ///
    /// Clears any error and records the clip reference.
    pub fn generated(
        self,
        clip_path: impl Into<String>,
        clip_file_name: impl Into<String>,
        download_url: impl Into<String>,
        duration_sec: u32,
    ) -> Self {
        Self {
            status: SegmentStatus::Generated,
            clip_path: Some(clip_path.into()),
            clip_file_name: Some(clip_file_name.into()),
            download_url: Some(download_url.into()),
            duration_sec: Some(duration_sec),
            error: None,
            ..self
        }
    }

    /// Produce the failed successor of this artifact.
    ///
    /// Clears any clip reference and records the failure reason.
    pub fn failed(self, error: impl Into<String>) -> Self {
        Self {
            status: SegmentStatus::Failed,
            clip_path: None,
            clip_file_name: None,
            download_url: None,
            duration_sec: None,
            error: Some(error.into()),
            ..self
        }
    }
}
