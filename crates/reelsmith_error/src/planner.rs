//! Segment planner error types.
//!
//! Planner errors never surface to callers of the pipeline: the segment
//! planner absorbs them and falls back to its deterministic heuristic.
//! They exist so planner backends can report precisely what went wrong.

/// Kinds of remote planning errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PlannerErrorKind {
    /// API key not found in the environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// The planning request failed at the transport level
    #[display("Planning request failed: {}", _0)]
    Request(String),
    /// The planning service answered with a non-success status
    #[display("Planning service returned HTTP {}: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// The response body could not be interpreted as a segment plan
    #[display("Malformed planning response: {}", _0)]
    MalformedResponse(String),
    /// The response parsed but contained no segments
    #[display("Planning response contained no segments")]
    EmptyPlan,
}

/// Planner error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Planner Error: {} at line {} in {}", kind, line, file)]
pub struct PlannerError {
    /// The kind of error that occurred
    pub kind: PlannerErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PlannerError {
    /// Create a new planner error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PlannerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
