//! Generation prompt composition.

use reelsmith_core::{SegmentPlanItem, VideoModel};

/// Build the generation prompt for one segment.
///
/// Pure and deterministic for identical inputs, so retries and tests
/// reproduce the same request. The narration text is reproduced verbatim;
/// the service must speak it, not a paraphrase.
pub fn build_segment_prompt(
    segment: &SegmentPlanItem,
    image_labels: &[String],
    video_model: VideoModel,
    generation_system_prompt: &str,
) -> String {
    let image_hint = if image_labels.is_empty() {
        "Keep a consistent single UGC creator identity.".to_string()
    } else {
        format!(
            "Preserve same face identity, hairstyle, outfit tone, and room style from the \
             reference images: {}.",
            image_labels.join(", ")
        )
    };

    let quality_hint = match video_model {
        VideoModel::Veo31Fast => {
            "Prioritize fast generation while keeping realistic face and lip sync."
        }
        VideoModel::Veo31 => {
            "Prioritize maximum realism, stable facial identity and natural mouth movement."
        }
    };

    [
        generation_system_prompt,
        &image_hint,
        quality_hint,
        &format!("Narration line to speak exactly: {}", segment.text),
        &format!("Target duration around {} seconds.", segment.target_seconds),
        &format!("Continuity requirements: {}", segment.continuity_notes),
    ]
    .join(" ")
}
