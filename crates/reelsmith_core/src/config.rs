//! Run configuration.

use serde::{Deserialize, Serialize};

/// Tunable parameters for one orchestrator instance.
///
/// Everything the pipeline used to treat as a constant lives here so tests
/// and callers can vary behavior per instance: the clip duration window,
/// the heuristic word rate, the remote-planning gate, the dispatch
/// concurrency, and the generation poll ceiling.
///
/// # Examples
///
/// ```
/// use reelsmith_core::RunConfig;
///
/// // Tighter clips, wider fan-out
/// let config = RunConfig::builder()
///     .min_seconds(4)
///     .target_seconds(6)
///     .max_seconds(8)
///     .concurrency_limit(4)
///     .build();
/// assert!(config.validate().is_ok());
///
/// // Defaults: 7-10 second window, concurrency 2
/// let default = RunConfig::default();
/// assert_eq!(*default.min_seconds(), 7);
/// assert_eq!(*default.concurrency_limit(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Lower clip duration bound in seconds (default 7).
    #[serde(default = "default_min_seconds")]
    min_seconds: u32,

    /// Upper clip duration bound in seconds (default 10).
    #[serde(default = "default_max_seconds")]
    max_seconds: u32,

    /// Preferred clip duration in seconds (default 8).
    #[serde(default = "default_target_seconds")]
    target_seconds: u32,

    /// Speaking rate used to derive durations from word counts (default 2.2).
    #[serde(default = "default_words_per_second")]
    words_per_second: f64,

    /// Scripts below this word count skip the remote planner (default 70).
    #[serde(default = "default_min_words_for_remote_plan")]
    min_words_for_remote_plan: usize,

    /// Extra words a segment may absorb before the packer closes it (default 3).
    #[serde(default = "default_word_slack")]
    word_slack: usize,

    /// Concurrent generation workers (default 2).
    #[serde(default = "default_concurrency_limit")]
    concurrency_limit: usize,

    /// Attempt ceiling for the generation operation poll (default 90).
    #[serde(default = "default_poll_attempts")]
    poll_attempts: u32,

    /// Delay between poll attempts in milliseconds (default 2000).
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,
}

fn default_min_seconds() -> u32 {
    7
}

fn default_max_seconds() -> u32 {
    10
}

fn default_target_seconds() -> u32 {
    8
}

fn default_words_per_second() -> f64 {
    2.2
}

fn default_min_words_for_remote_plan() -> usize {
    70
}

fn default_word_slack() -> usize {
    3
}

fn default_concurrency_limit() -> usize {
    2
}

fn default_poll_attempts() -> u32 {
    90
}

fn default_poll_interval_ms() -> u64 {
    2000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            min_seconds: default_min_seconds(),
            max_seconds: default_max_seconds(),
            target_seconds: default_target_seconds(),
            words_per_second: default_words_per_second(),
            min_words_for_remote_plan: default_min_words_for_remote_plan(),
            word_slack: default_word_slack(),
            concurrency_limit: default_concurrency_limit(),
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl RunConfig {
    /// Creates a new run config builder.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the duration window is inverted or degenerate,
    /// the word rate is non-positive, or a worker/poll count is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_seconds == 0 {
            return Err("min_seconds must be at least 1".to_string());
        }
        if self.min_seconds > self.max_seconds {
            return Err(format!(
                "duration window is inverted: min {} > max {}",
                self.min_seconds, self.max_seconds
            ));
        }
        if self.target_seconds < self.min_seconds || self.target_seconds > self.max_seconds {
            return Err(format!(
                "target_seconds {} outside window [{}, {}]",
                self.target_seconds, self.min_seconds, self.max_seconds
            ));
        }
        if self.words_per_second <= 0.0 {
            return Err(format!(
                "words_per_second must be positive, got {}",
                self.words_per_second
            ));
        }
        if self.concurrency_limit == 0 {
            return Err("concurrency_limit must be at least 1".to_string());
        }
        if self.poll_attempts == 0 {
            return Err("poll_attempts must be at least 1".to_string());
        }
        Ok(())
    }

    /// Clamp a requested duration into the configured window.
    pub fn clamp_seconds(&self, seconds: u32) -> u32 {
        seconds.clamp(self.min_seconds, self.max_seconds)
    }

    /// Words the heuristic packer aims to fit into one segment.
    pub fn target_words_per_segment(&self) -> usize {
        (self.target_seconds as f64 * self.words_per_second).round() as usize
    }
}

/// Builder for `RunConfig`.
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    min_seconds: Option<u32>,
    max_seconds: Option<u32>,
    target_seconds: Option<u32>,
    words_per_second: Option<f64>,
    min_words_for_remote_plan: Option<usize>,
    word_slack: Option<usize>,
    concurrency_limit: Option<usize>,
    poll_attempts: Option<u32>,
    poll_interval_ms: Option<u64>,
}

impl RunConfigBuilder {
    /// Sets the lower clip duration bound.
    pub fn min_seconds(mut self, value: u32) -> Self {
        self.min_seconds = Some(value);
        self
    }

    /// Sets the upper clip duration bound.
    pub fn max_seconds(mut self, value: u32) -> Self {
        self.max_seconds = Some(value);
        self
    }

    /// Sets the preferred clip duration.
    pub fn target_seconds(mut self, value: u32) -> Self {
        self.target_seconds = Some(value);
        self
    }

    /// Sets the speaking rate in words per second.
    pub fn words_per_second(mut self, value: f64) -> Self {
        self.words_per_second = Some(value);
        self
    }

    /// Sets the word-count gate below which the remote planner is skipped.
    pub fn min_words_for_remote_plan(mut self, value: usize) -> Self {
        self.min_words_for_remote_plan = Some(value);
        self
    }

    /// Sets the packing slack in words.
    pub fn word_slack(mut self, value: usize) -> Self {
        self.word_slack = Some(value);
        self
    }

    /// Sets the number of concurrent generation workers.
    pub fn concurrency_limit(mut self, value: usize) -> Self {
        self.concurrency_limit = Some(value);
        self
    }

    /// Sets the generation poll attempt ceiling.
    pub fn poll_attempts(mut self, value: u32) -> Self {
        self.poll_attempts = Some(value);
        self
    }

    /// Sets the delay between poll attempts in milliseconds.
    pub fn poll_interval_ms(mut self, value: u64) -> Self {
        self.poll_interval_ms = Some(value);
        self
    }

    /// Builds the config, falling back to defaults for unset fields.
    pub fn build(self) -> RunConfig {
        let default = RunConfig::default();
        RunConfig {
            min_seconds: self.min_seconds.unwrap_or(default.min_seconds),
            max_seconds: self.max_seconds.unwrap_or(default.max_seconds),
            target_seconds: self.target_seconds.unwrap_or(default.target_seconds),
            words_per_second: self.words_per_second.unwrap_or(default.words_per_second),
            min_words_for_remote_plan: self
                .min_words_for_remote_plan
                .unwrap_or(default.min_words_for_remote_plan),
            word_slack: self.word_slack.unwrap_or(default.word_slack),
            concurrency_limit: self.concurrency_limit.unwrap_or(default.concurrency_limit),
            poll_attempts: self.poll_attempts.unwrap_or(default.poll_attempts),
            poll_interval_ms: self.poll_interval_ms.unwrap_or(default.poll_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_window_rejected() {
        let config = RunConfig::builder().min_seconds(10).max_seconds(7).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn target_outside_window_rejected() {
        let config = RunConfig::builder()
            .min_seconds(4)
            .target_seconds(9)
            .max_seconds(8)
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = RunConfig::builder().concurrency_limit(0).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn target_words_follow_rate() {
        let config = RunConfig::default();
        // 8 seconds at 2.2 words/second rounds to 18 words
        assert_eq!(config.target_words_per_segment(), 18);
    }
}
