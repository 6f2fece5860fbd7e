//! Input validation error types.

/// Validation error raised before any pipeline work begins.
///
/// Covers rejected inputs such as an empty script, an unsafe clip file
/// name, or a malformed run configuration.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", message, line, file)]
pub struct ValidationError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_error::ValidationError;
    ///
    /// let err = ValidationError::new("Script must not be empty");
    /// assert!(format!("{}", err).contains("empty"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
