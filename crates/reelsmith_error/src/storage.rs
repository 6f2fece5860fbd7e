//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create a storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read a file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Artifact not found at the specified location
    #[display("Artifact not found: {}", _0)]
    NotFound(String),
    /// Collision-safe write ran out of candidate names
    #[display("Exhausted collision-safe name candidates for: {}", _0)]
    CollisionExhausted(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("/path/to/file".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
