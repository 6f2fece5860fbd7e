//! System prompt configuration.
//!
//! The planner and generator each carry a system prompt. Compiled-in
//! defaults cover the common case; operators can override either prompt
//! from a TOML file, which is loaded through the `config` crate and falls
//! back to the defaults whenever the file is absent or unusable.

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

const MAX_PROMPT_LENGTH: usize = 20_000;

const DEFAULT_PLANNING_PROMPT: &str = "You are a precise video segmentation planner for short \
vertical ads. Segment the script into coherent spoken chunks that feel natural for one mobile \
reel. Keep each segment between 7 and 10 seconds, preserve narrative flow, and include \
continuity notes that keep the same spokesperson identity, framing, and lighting across \
segments. Output only strict JSON matching the requested schema.";

const DEFAULT_GENERATION_PROMPT: &str = "Create one vertical UGC talking-head ad clip for a \
mobile reel. Output format must be 9:16 portrait with smartphone-style framing and chest-up \
composition. Keep a single speaker addressing camera with natural handheld feel and soft \
indoor lighting. Preserve realistic facial identity and natural lip sync. Avoid jump cuts, \
face changes, and burned-in subtitles.";

/// The system prompts fed to the remote planner and generator.
///
/// # Examples
///
/// ```
/// use reelsmith_core::SystemPrompts;
///
/// let prompts = SystemPrompts::default();
/// assert!(prompts.validate().is_ok());
/// assert!(prompts.planning_system_prompt.contains("segmentation planner"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPrompts {
    /// Instructions for the remote segmentation planner
    #[serde(default = "default_planning_prompt")]
    pub planning_system_prompt: String,
    /// Framing instructions prepended to every generation prompt
    #[serde(default = "default_generation_prompt")]
    pub generation_system_prompt: String,
}

fn default_planning_prompt() -> String {
    DEFAULT_PLANNING_PROMPT.to_string()
}

fn default_generation_prompt() -> String {
    DEFAULT_GENERATION_PROMPT.to_string()
}

impl Default for SystemPrompts {
    fn default() -> Self {
        Self {
            planning_system_prompt: default_planning_prompt(),
            generation_system_prompt: default_generation_prompt(),
        }
    }
}

impl SystemPrompts {
    /// Load prompts from a TOML file, falling back to the defaults.
    ///
    /// Missing files, unreadable files, and prompts that fail validation
    /// all fall back; an override never breaks a run.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let loaded = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .build()
            .and_then(|config| config.try_deserialize::<SystemPrompts>());

        match loaded {
            Ok(prompts) => match prompts.validate() {
                Ok(()) => {
                    debug!(path = %path.display(), "Loaded system prompts");
                    prompts
                }
                Err(reason) => {
                    warn!(path = %path.display(), %reason, "Rejected prompt override, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load prompt override, using defaults");
                Self::default()
            }
        }
    }

    /// Validates both prompts: non-empty after trimming and within the
    /// length ceiling.
    pub fn validate(&self) -> Result<(), String> {
        for (name, prompt) in [
            ("planning_system_prompt", &self.planning_system_prompt),
            ("generation_system_prompt", &self.generation_system_prompt),
        ] {
            let trimmed = prompt.trim();
            if trimmed.is_empty() {
                return Err(format!("{name} must not be empty"));
            }
            if trimmed.len() > MAX_PROMPT_LENGTH {
                return Err(format!(
                    "{name} exceeds {MAX_PROMPT_LENGTH} characters ({})",
                    trimmed.len()
                ));
            }
        }
        Ok(())
    }
}
