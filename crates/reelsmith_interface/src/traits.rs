//! Trait definitions for the pipeline's remote collaborators.

use crate::{ClipOutput, ClipRequest, RunCreated, SegmentProposal, StageEvent, StatusChange};
use async_trait::async_trait;
use reelsmith_error::ReelsmithResult;

/// Remote segmentation planner.
///
/// A backend receives the full script plus planning instructions and
/// answers with raw segment proposals. Backends report their failures
/// honestly; the segment planner treats any error or empty answer as
/// "no result" and falls back to its deterministic heuristic, so a
/// backend failure is never user-visible.
#[async_trait]
pub trait PlannerBackend: Send + Sync {
    /// Propose a segment breakdown for the script.
    async fn propose(
        &self,
        script: &str,
        planning_system_prompt: &str,
    ) -> ReelsmithResult<Vec<SegmentProposal>>;

    /// Provider name (e.g., "gemini", "openai").
    fn provider_name(&self) -> &'static str;
}

/// Remote video generation service.
///
/// Implementations must support every delivery shape the service can
/// answer with — inline bytes, a followable download URI, or an
/// asynchronous job handle requiring polling — and always return decoded
/// bytes plus the actual duration.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Generate one clip.
    async fn generate(&self, request: &ClipRequest) -> ReelsmithResult<ClipOutput>;

    /// Provider name (e.g., "veo").
    fn provider_name(&self) -> &'static str;

    /// Model identifier in service terms.
    fn model_name(&self) -> &str;
}

/// Audit/event sink for run notifications.
///
/// All three notifications are one-way and best-effort: the orchestrator
/// logs and swallows sink errors, so an unavailable sink never fails or
/// blocks a run.
#[async_trait]
pub trait RunEventSink: Send + Sync {
    /// Record that a run was created.
    ///
    /// Run identity is keyed by `run_id`: a second call for the same run
    /// must be a no-op that leaves the existing record untouched.
    async fn run_created(&self, event: &RunCreated) -> ReelsmithResult<()>;

    /// Record a run status transition.
    async fn status_changed(&self, event: &StatusChange) -> ReelsmithResult<()>;

    /// Record a leveled stage event.
    async fn stage_event(&self, event: &StageEvent) -> ReelsmithResult<()>;
}
