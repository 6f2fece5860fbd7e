//! Model selection enums.

use serde::{Deserialize, Serialize};

/// Which remote service plans the segment breakdown.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrchestratorModel {
    /// Google Gemini generateContent API
    Gemini,
    /// OpenAI chat completions API
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAi,
}

/// Which video generation model renders the clips.
///
/// The fast variant trades realism for turnaround; the full variant
/// prioritizes stable facial identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum VideoModel {
    /// Fast preview tier
    #[serde(rename = "veo-3.1-fast")]
    #[strum(serialize = "veo-3.1-fast")]
    Veo31Fast,
    /// Full quality tier
    #[serde(rename = "veo-3.1")]
    #[strum(serialize = "veo-3.1")]
    Veo31,
}
