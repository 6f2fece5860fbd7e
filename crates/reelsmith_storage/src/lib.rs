//! Crash-safe filesystem persistence for reelsmith runs.
//!
//! This crate owns the durable layout of a run — manifest, input
//! artifacts, and generated clips — behind two write primitives:
//!
//! - **Atomic writes**: full contents land at a uniquely-named temp path
//!   and are renamed onto the final path, so a reader never observes a
//!   partially written file and a crash leaves at most an orphan temp file.
//! - **Collision-safe writes**: candidate names are probed with an
//!   incrementing version suffix (`name`, `name-v2`, …) until one is
//!   claimed, so concurrent writers with the same base name never
//!   overwrite each other.
//!
//! # Example
//!
//! ```rust,no_run
//! use reelsmith_storage::{FileSystemWorkspace, RunStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemWorkspace::new("./storage")?;
//! let saved = store
//!     .save_clip("proj_a", "run_b", "segment-01-abc123", "mp4", &[0u8; 16])
//!     .await?;
//! println!("wrote {}", saved.file_name);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod layout;

use async_trait::async_trait;
use reelsmith_core::RunManifest;
use reelsmith_error::ReelsmithResult;
use std::path::PathBuf;

pub use filesystem::FileSystemWorkspace;
pub use layout::{
    clip_locator, content_hash, create_project_id, create_run_id, is_safe_file_name,
    sanitize_label, WorkspaceLayout,
};
pub use reelsmith_error::{StorageError, StorageErrorKind};

/// A successfully persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    /// Bare file name actually used (collision suffix included)
    pub file_name: String,
    /// Absolute path of the file
    pub path: PathBuf,
    /// Path relative to the workspace root, as recorded in manifests
    pub relative_path: String,
}

/// Durable store for the artifacts of one run.
///
/// The orchestrator is the only writer; implementations must uphold the
/// atomic and collision-safe write contracts so a crash at any point
/// leaves no partially-visible file.
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Persist the narration script (trimmed, trailing newline) atomically.
    async fn save_script(
        &self,
        project_id: &str,
        run_id: &str,
        script: &str,
    ) -> ReelsmithResult<SavedArtifact>;

    /// Persist one reference image collision-safely under
    /// `reference-<NN>.<ext>`.
    async fn save_reference_image(
        &self,
        project_id: &str,
        run_id: &str,
        ordinal: usize,
        extension: &str,
        bytes: &[u8],
    ) -> ReelsmithResult<SavedArtifact>;

    /// Persist clip bytes collision-safely under the given base name.
    async fn save_clip(
        &self,
        project_id: &str,
        run_id: &str,
        base_name: &str,
        extension: &str,
        bytes: &[u8],
    ) -> ReelsmithResult<SavedArtifact>;

    /// Persist the manifest atomically at its deterministic path.
    async fn write_manifest(&self, manifest: &RunManifest) -> ReelsmithResult<SavedArtifact>;

    /// Load the manifest for a run.
    async fn read_manifest(&self, project_id: &str, run_id: &str) -> ReelsmithResult<RunManifest>;

    /// Load clip bytes by bare file name.
    ///
    /// The name is checked against a strict safe-character allowlist
    /// before any filesystem access.
    async fn read_clip(
        &self,
        project_id: &str,
        run_id: &str,
        file_name: &str,
    ) -> ReelsmithResult<Vec<u8>>;
}
