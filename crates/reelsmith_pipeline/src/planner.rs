//! Segment planning with remote proposal and deterministic fallback.

use crate::heuristic::{build_heuristic_segments, count_words};
use reelsmith_core::{PlanSource, RunConfig, SegmentPlanItem, SegmentPlanResult, SystemPrompts};
use reelsmith_interface::{PlannerBackend, SegmentProposal};
use std::sync::Arc;
use tracing::{debug, warn};

/// Produces an ordered segment plan for a script.
///
/// Planning never fails: the remote backend is an optimization, and any
/// error, empty answer, or unusable proposal set collapses into the
/// deterministic heuristic. Short scripts skip the remote call entirely —
/// the round trip is not worth it below the configured word count.
pub struct SegmentPlanner {
    backend: Option<Arc<dyn PlannerBackend>>,
    config: RunConfig,
    prompts: SystemPrompts,
}

impl SegmentPlanner {
    /// Create a heuristic-only planner.
    pub fn new(config: RunConfig, prompts: SystemPrompts) -> Self {
        Self {
            backend: None,
            config,
            prompts,
        }
    }

    /// Attach a remote planning backend.
    pub fn with_backend(mut self, backend: Arc<dyn PlannerBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Plan the script into ordered segments.
    ///
    /// A whitespace-only script yields an empty heuristic plan; any other
    /// script yields at least one segment with contiguous 1-based indices
    /// and durations inside the configured window.
    #[tracing::instrument(skip(self, script))]
    pub async fn plan(&self, script: &str) -> SegmentPlanResult {
        let script = script.trim();
        if script.is_empty() {
            return SegmentPlanResult {
                segments: Vec::new(),
                source: PlanSource::Heuristic,
            };
        }

        let total_words = count_words(script);
        if total_words < *self.config.min_words_for_remote_plan() {
            debug!(total_words, "Script below remote planning threshold");
            return self.heuristic(script);
        }

        let Some(backend) = &self.backend else {
            return self.heuristic(script);
        };

        match backend
            .propose(script, &self.prompts.planning_system_prompt)
            .await
        {
            Ok(proposals) => {
                let segments = self.normalize(proposals);
                if segments.is_empty() {
                    warn!(
                        provider = backend.provider_name(),
                        "Remote plan had no usable segments, falling back to heuristic"
                    );
                    return self.heuristic(script);
                }

                debug!(
                    provider = backend.provider_name(),
                    count = segments.len(),
                    "Using remote segment plan"
                );
                SegmentPlanResult {
                    segments,
                    source: PlanSource::Llm,
                }
            }
            Err(e) => {
                warn!(
                    provider = backend.provider_name(),
                    error = %e,
                    "Remote planning failed, falling back to heuristic"
                );
                self.heuristic(script)
            }
        }
    }

    fn heuristic(&self, script: &str) -> SegmentPlanResult {
        SegmentPlanResult {
            segments: build_heuristic_segments(script, &self.config),
            source: PlanSource::Heuristic,
        }
    }

    /// Normalize raw proposals: drop empty texts, re-index contiguously,
    /// clamp durations, and fill missing continuity notes with positional
    /// defaults.
    fn normalize(&self, proposals: Vec<SegmentProposal>) -> Vec<SegmentPlanItem> {
        proposals
            .into_iter()
            .filter_map(|proposal| {
                let text = proposal.text.trim().to_string();
                if text.is_empty() {
                    return None;
                }
                Some((text, proposal.target_seconds, proposal.continuity_notes))
            })
            .enumerate()
            .map(|(position, (text, target_seconds, continuity_notes))| {
                let requested = target_seconds
                    .map(|seconds| seconds.round() as u32)
                    .unwrap_or(*self.config.target_seconds());
                let continuity_notes = continuity_notes
                    .map(|notes| notes.trim().to_string())
                    .filter(|notes| !notes.is_empty())
                    .unwrap_or_else(|| {
                        if position == 0 {
                            "Open with the same spokesperson identity from reference image."
                                .to_string()
                        } else {
                            "Keep same spokesperson identity, camera angle and lighting."
                                .to_string()
                        }
                    });

                SegmentPlanItem {
                    index: position as u32 + 1,
                    text,
                    target_seconds: self.config.clamp_seconds(requested),
                    continuity_notes,
                }
            })
            .collect()
    }
}
