//! Deterministic sentence-packing segmentation.
//!
//! The fallback path when remote planning is skipped or fails. Pure
//! functions of the script and config, so the planner can reach for it
//! without caring why the remote path was unavailable.

use regex::Regex;
use reelsmith_core::{RunConfig, SegmentPlanItem};
use std::sync::LazyLock;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence boundary pattern"));

/// Number of whitespace-separated words in a text.
pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split a script into sentences.
///
/// A boundary is sentence-ending punctuation followed by whitespace; the
/// punctuation stays with the preceding sentence. A script with no
/// boundary is one sentence.
fn split_sentences(script: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(script) {
        let end = boundary.start() + 1;
        let sentence = script[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = boundary.end();
    }

    let tail = script[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

/// Derive a clip duration from a word count at the configured rate.
fn seconds_for_words(words: usize, config: &RunConfig) -> u32 {
    let seconds = (words as f64 / config.words_per_second()).round() as u32;
    config.clamp_seconds(seconds)
}

fn opening_note() -> String {
    "Open with direct hook and clear speaking subject.".to_string()
}

/// Pack sentences greedily into segments.
///
/// A segment keeps absorbing sentences while its word count stays within
/// the target plus slack; the sentence that would overflow starts the
/// next segment. A script that defeats packing still yields exactly one
/// segment with the full trimmed text.
pub(crate) fn build_heuristic_segments(script: &str, config: &RunConfig) -> Vec<SegmentPlanItem> {
    let sentences = split_sentences(script);
    let words_per_segment = config.target_words_per_segment();

    let mut segments: Vec<SegmentPlanItem> = Vec::new();
    let mut current = String::new();
    let mut current_words = 0;

    for sentence in sentences {
        let sentence_words = count_words(sentence);
        let next_words = current_words + sentence_words;

        if !current.is_empty() && next_words > words_per_segment + config.word_slack() {
            let index = segments.len() as u32 + 1;
            let text = current.trim().to_string();
            segments.push(SegmentPlanItem {
                index,
                target_seconds: seconds_for_words(count_words(&text), config),
                continuity_notes: if index == 1 {
                    opening_note()
                } else {
                    "Maintain same character, wardrobe, camera distance, and room lighting."
                        .to_string()
                },
                text,
            });

            current = sentence.to_string();
            current_words = sentence_words;
            continue;
        }

        if current.is_empty() {
            current = sentence.to_string();
        } else {
            current.push(' ');
            current.push_str(sentence);
        }
        current_words = next_words;
    }

    if !current.trim().is_empty() {
        let index = segments.len() as u32 + 1;
        let text = current.trim().to_string();
        segments.push(SegmentPlanItem {
            index,
            target_seconds: seconds_for_words(count_words(&text), config),
            continuity_notes: if index == 1 {
                opening_note()
            } else {
                "Preserve identity and delivery continuity from previous segment.".to_string()
            },
            text,
        });
    }

    if segments.is_empty() {
        return vec![SegmentPlanItem {
            index: 1,
            text: script.trim().to_string(),
            target_seconds: *config.target_seconds(),
            continuity_notes: "Single segment narrative delivery.".to_string(),
        }];
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_sentence_punctuation() {
        let sentences = split_sentences("First one. Second one! Third one? Fourth");
        assert_eq!(
            sentences,
            vec!["First one.", "Second one!", "Third one?", "Fourth"]
        );
    }

    #[test]
    fn unpunctuated_script_is_one_sentence() {
        let sentences = split_sentences("no boundaries here at all");
        assert_eq!(sentences, vec!["no boundaries here at all"]);
    }

    #[test]
    fn stacked_punctuation_stays_with_its_sentence() {
        let sentences = split_sentences("Really?! Yes. ");
        assert_eq!(sentences, vec!["Really?!", "Yes."]);
    }

    #[test]
    fn durations_are_clamped_to_the_window() {
        let config = RunConfig::default();
        assert_eq!(seconds_for_words(2, &config), 7);
        assert_eq!(seconds_for_words(18, &config), 8);
        assert_eq!(seconds_for_words(500, &config), 10);
    }

    #[test]
    fn overflowing_sentence_starts_a_new_segment() {
        let config = RunConfig::default();
        // Two 15-word sentences: 15 fits, 30 > 18 + 3, so two segments
        let sentence = "one two three four five six seven eight nine ten eleven twelve \
                        thirteen fourteen fifteen.";
        let script = format!("{sentence} {sentence}");

        let segments = build_heuristic_segments(&script, &config);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].index, 1);
        assert_eq!(segments[1].index, 2);
        assert!(segments[1].continuity_notes.contains("continuity"));
    }

    #[test]
    fn short_script_packs_into_one_segment() {
        let config = RunConfig::default();
        let segments = build_heuristic_segments("Tiny pitch. Buy it now.", &config);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Tiny pitch. Buy it now.");
        assert_eq!(segments[0].continuity_notes, opening_note());
    }
}
