//! Error types for the reelsmith pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! reelsmith workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use reelsmith_error::{ReelsmithResult, HttpError};
//!
//! fn fetch_data() -> ReelsmithResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod http;
mod json;
mod planner;
mod storage;
mod validation;

pub use config::ConfigError;
pub use error::{ReelsmithError, ReelsmithErrorKind, ReelsmithResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use planner::{PlannerError, PlannerErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::ValidationError;
