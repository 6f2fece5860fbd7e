//! Workspace path layout, identifiers, and name hygiene.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Mint a fresh project identifier.
pub fn create_project_id() -> String {
    format!("proj_{}", Uuid::new_v4())
}

/// Mint a fresh run identifier.
pub fn create_run_id() -> String {
    format!("run_{}", Uuid::new_v4())
}

/// Short content hash used to key clip base names: the first 10 hex
/// characters of the SHA-256 digest.
pub fn content_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..10].to_string()
}

/// Whether a bare file name is safe to touch on the filesystem.
///
/// The allowlist is strict: ASCII alphanumerics, dot, underscore, and
/// hyphen. Anything else — separators, traversal sequences, empty names —
/// is rejected before any filesystem access.
///
/// # Examples
///
/// ```
/// use reelsmith_storage::is_safe_file_name;
///
/// assert!(is_safe_file_name("segment-01-abc123.mp4"));
/// assert!(!is_safe_file_name("../manifest.json"));
/// assert!(!is_safe_file_name(""));
/// ```
pub fn is_safe_file_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Download locator for a clip, derived from run identity alone.
///
/// Serving layers may prefix it however they route; the pipeline only
/// promises the `(project, run, file)` triple is recoverable from it.
pub fn clip_locator(project_id: &str, run_id: &str, file_name: &str) -> String {
    format!("/projects/{project_id}/runs/{run_id}/clips/{file_name}")
}

/// Normalize a free-form label into a filesystem-friendly slug.
///
/// Lowercases, replaces runs of disallowed characters with a single
/// hyphen, trims edge hyphens, and truncates to 64 characters.
pub fn sanitize_label(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_dash = false;

    for c in value.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.') {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    slug.trim_matches('-').chars().take(64).collect()
}

/// Deterministic path layout under one workspace root.
///
/// ```text
/// <root>/projects/<project_id>/runs/<run_id>/
/// ├── manifest.json
/// ├── inputs/       (script.txt, reference images)
/// └── segments/     (generated clips)
/// ```
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    /// Create a layout rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one project.
    pub fn project_path(&self, project_id: &str) -> PathBuf {
        self.root.join("projects").join(project_id)
    }

    /// Directory of one run.
    pub fn run_path(&self, project_id: &str, run_id: &str) -> PathBuf {
        self.project_path(project_id).join("runs").join(run_id)
    }

    /// Input artifact directory of one run.
    pub fn inputs_path(&self, project_id: &str, run_id: &str) -> PathBuf {
        self.run_path(project_id, run_id).join("inputs")
    }

    /// Generated clip directory of one run.
    pub fn segments_path(&self, project_id: &str, run_id: &str) -> PathBuf {
        self.run_path(project_id, run_id).join("segments")
    }

    /// Manifest file of one run.
    pub fn manifest_path(&self, project_id: &str, run_id: &str) -> PathBuf {
        self.run_path(project_id, run_id).join("manifest.json")
    }

    /// Render a path workspace-relative for recording in manifests.
    ///
    /// Falls back to the full display form for paths outside the root.
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_their_prefix() {
        assert!(create_project_id().starts_with("proj_"));
        assert!(create_run_id().starts_with("run_"));
    }

    #[test]
    fn content_hash_is_short_and_stable() {
        let a = content_hash("same prompt");
        let b = content_hash("same prompt");
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        assert_ne!(a, content_hash("different prompt"));
    }

    #[test]
    fn safe_file_names() {
        assert!(is_safe_file_name("segment-01-0a1b2c3d4e.mp4"));
        assert!(is_safe_file_name("reference-02.png"));
        assert!(!is_safe_file_name("a/b.mp4"));
        assert!(!is_safe_file_name("..\\evil"));
        assert!(!is_safe_file_name("clip one.mp4"));
    }

    #[test]
    fn labels_are_slugged() {
        assert_eq!(sanitize_label("My Product Shot (1).PNG"), "my-product-shot-1-.png");
        assert_eq!(sanitize_label("  --weird--  "), "weird");
    }

    #[test]
    fn layout_paths_are_deterministic() {
        let layout = WorkspaceLayout::new("/var/reelsmith");
        let manifest = layout.manifest_path("proj_a", "run_b");
        assert_eq!(
            manifest,
            PathBuf::from("/var/reelsmith/projects/proj_a/runs/run_b/manifest.json")
        );
        assert_eq!(
            layout.relative(&manifest),
            "projects/proj_a/runs/run_b/manifest.json"
        );
    }
}
