//! Shared segmentation request/response plumbing.

use reelsmith_error::{PlannerError, PlannerErrorKind};
use reelsmith_interface::SegmentProposal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SegmentPayload {
    #[serde(default)]
    segments: Vec<SegmentProposal>,
}

/// Build the user-facing planning instruction block shared by both
/// planner backends.
pub(crate) fn planning_prompt(script: &str) -> String {
    [
        "Segment this ad script into coherent 7-10 second speaking segments.",
        "Return strict JSON with this shape: \
         {\"segments\":[{\"text\":string,\"targetSeconds\":number,\"continuityNotes\":string}]}",
        "Keep flow natural for a single vertical mobile reel.",
        "Script:",
        script,
    ]
    .join("\n")
}

/// Parse the model's JSON answer into segment proposals.
///
/// The answer must be a JSON object carrying a `segments` array; anything
/// else is a malformed response, and a parseable answer with zero
/// segments is an empty plan. Both outcomes send the caller to the
/// heuristic fallback.
pub(crate) fn parse_segment_payload(text: &str) -> Result<Vec<SegmentProposal>, PlannerError> {
    let payload: SegmentPayload = serde_json::from_str(text)
        .map_err(|e| PlannerError::new(PlannerErrorKind::MalformedResponse(e.to_string())))?;

    if payload.segments.is_empty() {
        return Err(PlannerError::new(PlannerErrorKind::EmptyPlan));
    }

    Ok(payload.segments)
}
