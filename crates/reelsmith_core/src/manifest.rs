//! Run manifest types.

use crate::{OrchestratorModel, SegmentArtifact, SegmentStatus, VideoModel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a generation run.
///
/// Transitions: `queued → planning → generating → {completed, failed}`.
/// The terminal states are absorbing; a manifest is immutable once it
/// reaches one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    /// Run accepted, no work started
    Queued,
    /// Segment planning in progress
    Planning,
    /// Clip generation dispatched
    Generating,
    /// Every segment generated successfully
    Completed,
    /// At least one segment failed
    Failed,
}

impl RunStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

/// The model pair selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedModels {
    /// Remote planner model family
    pub orchestrator_model: OrchestratorModel,
    /// Video generation model
    pub video_model: VideoModel,
}

/// The durable, authoritative record of one generation run.
///
/// Owned exclusively by the orchestrator for the lifetime of the run and
/// persisted after every phase transition. All other components read it;
/// none mutate it. Serializes with camelCase field names so the on-disk
/// manifest layout is stable.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{
///     OrchestratorModel, RunManifest, RunStatus, SelectedModels, VideoModel,
/// };
///
/// let manifest = RunManifest::new(
///     "proj_demo",
///     "run_demo",
///     "projects/proj_demo/runs/run_demo/inputs/script.txt",
///     vec![],
///     SelectedModels {
///         orchestrator_model: OrchestratorModel::Gemini,
///         video_model: VideoModel::Veo31Fast,
///     },
/// );
/// assert_eq!(manifest.status, RunStatus::Queued);
/// assert_eq!(manifest.total_segments, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunManifest {
    /// Project this run belongs to
    pub project_id: String,
    /// Unique run identifier
    pub run_id: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: DateTime<Utc>,
    /// Workspace-relative path of the persisted script
    pub script_path: String,
    /// Workspace-relative paths of the saved reference images
    pub reference_images: Vec<String>,
    /// Current run state
    pub status: RunStatus,
    /// Models selected for this run
    pub selected_models: SelectedModels,
    /// Ordered per-segment outcome records
    pub segments: Vec<SegmentArtifact>,
    /// Number of segments in the plan
    pub total_segments: u32,
    /// Number of segments with status `generated`
    pub successful_segments: u32,
    /// Number of segments with status `failed`
    pub failed_segments: u32,
}

impl RunManifest {
    /// Create a fresh manifest in the `queued` state with no segments.
    pub fn new(
        project_id: impl Into<String>,
        run_id: impl Into<String>,
        script_path: impl Into<String>,
        reference_images: Vec<String>,
        selected_models: SelectedModels,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            run_id: run_id.into(),
            created_at: Utc::now(),
            script_path: script_path.into(),
            reference_images,
            status: RunStatus::Queued,
            selected_models,
            segments: Vec::new(),
            total_segments: 0,
            successful_segments: 0,
            failed_segments: 0,
        }
    }

    /// Replace the run status.
    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.status = status;
        self
    }

    /// Replace the segment records, recomputing the derived counts.
    pub fn with_segments(mut self, segments: Vec<SegmentArtifact>) -> Self {
        self.total_segments = segments.len() as u32;
        self.successful_segments = segments
            .iter()
            .filter(|s| s.status == SegmentStatus::Generated)
            .count() as u32;
        self.failed_segments = segments
            .iter()
            .filter(|s| s.status == SegmentStatus::Failed)
            .count() as u32;
        self.segments = segments;
        self
    }
}
