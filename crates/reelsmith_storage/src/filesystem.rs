//! Filesystem-backed run store.

use crate::{layout::WorkspaceLayout, RunStore, SavedArtifact};
use async_trait::async_trait;
use reelsmith_core::RunManifest;
use reelsmith_error::{
    JsonError, ReelsmithResult, StorageError, StorageErrorKind, ValidationError,
};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const MAX_COLLISION_ATTEMPTS: u32 = 1000;

/// Run store over a local directory tree.
///
/// All writes go through one of two primitives:
///
/// - `write_atomic`: contents land at `<final>.tmp-<uuid>` and are renamed
///   onto the final path. Used for files with a single logical owner
///   (manifest, script) where replacing the previous version is correct.
/// - `write_collision_safe`: contents land at a temp path, then are
///   hard-linked onto the first free versioned candidate (`name`,
///   `name-v2`, …). The link refuses to clobber an existing file, so two
///   writers probing the same base name end up with distinct final names.
pub struct FileSystemWorkspace {
    layout: WorkspaceLayout,
}

impl FileSystemWorkspace {
    /// Create a workspace rooted at the given directory.
    ///
    /// Creates the root directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> ReelsmithResult<Self> {
        let layout = WorkspaceLayout::new(root);

        std::fs::create_dir_all(layout.root()).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                layout.root().display(),
                e
            )))
        })?;

        tracing::info!(path = %layout.root().display(), "Created filesystem workspace");
        Ok(Self { layout })
    }

    /// The path layout this workspace writes into.
    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    async fn ensure_dir(path: &Path) -> ReelsmithResult<()> {
        tokio::fs::create_dir_all(path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }

    fn temp_sibling(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.push_str(&format!(".tmp-{}", Uuid::new_v4()));
        path.with_file_name(name)
    }

    /// Write full contents to a unique temp path, then rename onto the
    /// final path. A reader polling the final path sees the old contents
    /// or the new contents, never a mix.
    async fn write_atomic(path: &Path, bytes: &[u8]) -> ReelsmithResult<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent).await?;
        }

        let temp_path = Self::temp_sibling(path);
        tokio::fs::write(&temp_path, bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        Ok(())
    }

    /// Write bytes under the first free versioned name in `dir`.
    ///
    /// The temp file is written once; each candidate is claimed with a
    /// hard link, which fails if the name is already taken. Probing stops
    /// after a bounded number of attempts.
    #[tracing::instrument(skip(self, dir, bytes), fields(dir = %dir.display(), size = bytes.len()))]
    async fn write_collision_safe(
        &self,
        dir: &Path,
        base_name: &str,
        extension: &str,
        bytes: &[u8],
    ) -> ReelsmithResult<SavedArtifact> {
        Self::ensure_dir(dir).await?;

        let temp_path = Self::temp_sibling(&dir.join(base_name));
        tokio::fs::write(&temp_path, bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        for version in 1..MAX_COLLISION_ATTEMPTS {
            let file_name = if version == 1 {
                format!("{base_name}.{extension}")
            } else {
                format!("{base_name}-v{version}.{extension}")
            };
            let path = dir.join(&file_name);

            match tokio::fs::hard_link(&temp_path, &path).await {
                Ok(()) => {
                    let _ = tokio::fs::remove_file(&temp_path).await;
                    tracing::debug!(file = %file_name, "Persisted artifact");
                    return Ok(SavedArtifact {
                        relative_path: self.layout.relative(&path),
                        file_name,
                        path,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    let _ = tokio::fs::remove_file(&temp_path).await;
                    return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                        "link {} to {}: {}",
                        temp_path.display(),
                        path.display(),
                        e
                    )))
                    .into());
                }
            }
        }

        let _ = tokio::fs::remove_file(&temp_path).await;
        Err(StorageError::new(StorageErrorKind::CollisionExhausted(format!(
            "{}/{base_name}.{extension}",
            dir.display()
        )))
        .into())
    }
}

#[async_trait]
impl RunStore for FileSystemWorkspace {
    #[tracing::instrument(skip(self, script))]
    async fn save_script(
        &self,
        project_id: &str,
        run_id: &str,
        script: &str,
    ) -> ReelsmithResult<SavedArtifact> {
        let path = self
            .layout
            .inputs_path(project_id, run_id)
            .join("script.txt");
        let contents = format!("{}\n", script.trim());
        Self::write_atomic(&path, contents.as_bytes()).await?;

        Ok(SavedArtifact {
            file_name: "script.txt".to_string(),
            relative_path: self.layout.relative(&path),
            path,
        })
    }

    async fn save_reference_image(
        &self,
        project_id: &str,
        run_id: &str,
        ordinal: usize,
        extension: &str,
        bytes: &[u8],
    ) -> ReelsmithResult<SavedArtifact> {
        let dir = self.layout.inputs_path(project_id, run_id);
        let base_name = format!("reference-{ordinal:02}");
        self.write_collision_safe(&dir, &base_name, extension, bytes)
            .await
    }

    async fn save_clip(
        &self,
        project_id: &str,
        run_id: &str,
        base_name: &str,
        extension: &str,
        bytes: &[u8],
    ) -> ReelsmithResult<SavedArtifact> {
        let dir = self.layout.segments_path(project_id, run_id);
        self.write_collision_safe(&dir, base_name, extension, bytes)
            .await
    }

    #[tracing::instrument(skip(self, manifest), fields(project_id = %manifest.project_id, run_id = %manifest.run_id, status = %manifest.status))]
    async fn write_manifest(&self, manifest: &RunManifest) -> ReelsmithResult<SavedArtifact> {
        let path = self
            .layout
            .manifest_path(&manifest.project_id, &manifest.run_id);

        let mut contents = serde_json::to_vec_pretty(manifest)
            .map_err(|e| JsonError::new(format!("serialize manifest: {e}")))?;
        contents.push(b'\n');

        Self::write_atomic(&path, &contents).await?;
        tracing::debug!(path = %path.display(), "Persisted manifest");

        Ok(SavedArtifact {
            file_name: "manifest.json".to_string(),
            relative_path: self.layout.relative(&path),
            path,
        })
    }

    async fn read_manifest(&self, project_id: &str, run_id: &str) -> ReelsmithResult<RunManifest> {
        let path = self.layout.manifest_path(project_id, run_id);

        let raw = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(self.layout.relative(&path)))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
            }
        })?;

        serde_json::from_slice(&raw)
            .map_err(|e| JsonError::new(format!("parse manifest {}: {}", path.display(), e)).into())
    }

    async fn read_clip(
        &self,
        project_id: &str,
        run_id: &str,
        file_name: &str,
    ) -> ReelsmithResult<Vec<u8>> {
        if !crate::is_safe_file_name(file_name) {
            return Err(ValidationError::new(format!("Invalid clip file name: {file_name:?}")).into());
        }

        let path = self.layout.segments_path(project_id, run_id).join(file_name);

        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(self.layout.relative(&path))).into()
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
                    .into()
            }
        })
    }
}
