//! Video generation error types.

/// Kinds of video generation errors.
///
/// Generation errors are isolated to the segment they occurred in: the
/// orchestrator records them on the segment artifact and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// API key not found in the environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// The generation request failed at the transport level
    #[display("Generation request failed: {}", _0)]
    Request(String),
    /// The generation service answered with a non-success status
    #[display("Generation service returned HTTP {}: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// The service reported a failed generation job
    #[display("Generation failed: {}", _0)]
    JobFailed(String),
    /// Base64 video payload could not be decoded
    #[display("Unable to decode base64 video payload: {}", _0)]
    Base64Decode(String),
    /// Downloading the clip from the returned URI failed
    #[display("Failed to download generated clip: {}", _0)]
    Download(String),
    /// The response carried neither a video payload nor an operation handle
    #[display("Generation response missing video payload and operation name")]
    MissingPayload,
    /// The operation poll loop exceeded its attempt ceiling
    #[display("Timed out after {} polls waiting for generation to complete", attempts)]
    PollTimeout {
        /// Number of poll attempts made before giving up
        attempts: u32,
    },
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::PollTimeout { attempts: 90 });
/// assert!(format!("{}", err).contains("90"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
