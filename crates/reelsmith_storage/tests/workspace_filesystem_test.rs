//! Tests for the filesystem run store.

use reelsmith_core::{
    OrchestratorModel, RunManifest, RunStatus, SelectedModels, VideoModel,
};
use reelsmith_storage::{FileSystemWorkspace, RunStore};
use tempfile::TempDir;

fn sample_models() -> SelectedModels {
    SelectedModels {
        orchestrator_model: OrchestratorModel::Gemini,
        video_model: VideoModel::Veo31Fast,
    }
}

#[tokio::test]
async fn script_write_is_trimmed_and_newline_terminated() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemWorkspace::new(temp_dir.path()).unwrap();

    let saved = store
        .save_script("proj_a", "run_b", "  Buy the bottle today.  ")
        .await
        .unwrap();

    assert_eq!(saved.relative_path, "projects/proj_a/runs/run_b/inputs/script.txt");
    let contents = std::fs::read_to_string(&saved.path).unwrap();
    assert_eq!(contents, "Buy the bottle today.\n");
}

#[tokio::test]
async fn collision_safe_writes_version_the_second_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemWorkspace::new(temp_dir.path()).unwrap();

    // Two concurrent writers targeting the same base name
    let (first, second) = tokio::join!(
        store.save_clip("proj_a", "run_b", "segment-01", "mp4", b"clip one"),
        store.save_clip("proj_a", "run_b", "segment-01", "mp4", b"clip two"),
    );
    let first = first.unwrap();
    let second = second.unwrap();

    let mut names = vec![first.file_name.clone(), second.file_name.clone()];
    names.sort();
    assert_eq!(names, vec!["segment-01-v2.mp4", "segment-01.mp4"]);

    // Neither write clobbered the other
    let mut contents = vec![
        std::fs::read(&first.path).unwrap(),
        std::fs::read(&second.path).unwrap(),
    ];
    contents.sort();
    assert_eq!(contents, vec![b"clip one".to_vec(), b"clip two".to_vec()]);
}

#[tokio::test]
async fn reference_images_get_padded_ordinals() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemWorkspace::new(temp_dir.path()).unwrap();

    let saved = store
        .save_reference_image("proj_a", "run_b", 1, "png", &[0x89, 0x50, 0x4E, 0x47])
        .await
        .unwrap();

    assert_eq!(saved.file_name, "reference-01.png");
    assert_eq!(
        saved.relative_path,
        "projects/proj_a/runs/run_b/inputs/reference-01.png"
    );
}

#[tokio::test]
async fn manifest_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemWorkspace::new(temp_dir.path()).unwrap();

    let manifest = RunManifest::new(
        "proj_a",
        "run_b",
        "projects/proj_a/runs/run_b/inputs/script.txt",
        vec![],
        sample_models(),
    )
    .with_status(RunStatus::Generating);

    store.write_manifest(&manifest).await.unwrap();
    let loaded = store.read_manifest("proj_a", "run_b").await.unwrap();

    assert_eq!(loaded, manifest);
}

#[tokio::test]
async fn manifest_rewrite_replaces_previous_version() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemWorkspace::new(temp_dir.path()).unwrap();

    let manifest = RunManifest::new(
        "proj_a",
        "run_b",
        "projects/proj_a/runs/run_b/inputs/script.txt",
        vec![],
        sample_models(),
    );

    store.write_manifest(&manifest).await.unwrap();
    let updated = manifest.with_status(RunStatus::Completed);
    store.write_manifest(&updated).await.unwrap();

    let loaded = store.read_manifest("proj_a", "run_b").await.unwrap();
    assert_eq!(loaded.status, RunStatus::Completed);

    // The atomic rewrite leaves no stray temp files behind
    let run_dir = temp_dir.path().join("projects/proj_a/runs/run_b");
    let leftovers: Vec<_> = std::fs::read_dir(run_dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn manifest_json_uses_camel_case_layout() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemWorkspace::new(temp_dir.path()).unwrap();

    let manifest = RunManifest::new(
        "proj_a",
        "run_b",
        "projects/proj_a/runs/run_b/inputs/script.txt",
        vec![],
        sample_models(),
    );
    let saved = store.write_manifest(&manifest).await.unwrap();

    let raw = std::fs::read_to_string(&saved.path).unwrap();
    assert!(raw.contains("\"projectId\""));
    assert!(raw.contains("\"totalSegments\""));
    assert!(raw.contains("\"selectedModels\""));
    assert!(raw.contains("\"veo-3.1-fast\""));
    assert!(raw.ends_with('\n'));
}

#[tokio::test]
async fn clip_read_requires_safe_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemWorkspace::new(temp_dir.path()).unwrap();

    store
        .save_clip("proj_a", "run_b", "segment-01", "mp4", b"clip bytes")
        .await
        .unwrap();

    let bytes = store
        .read_clip("proj_a", "run_b", "segment-01.mp4")
        .await
        .unwrap();
    assert_eq!(bytes, b"clip bytes");

    let traversal = store
        .read_clip("proj_a", "run_b", "../manifest.json")
        .await;
    assert!(matches!(
        traversal.unwrap_err().kind(),
        reelsmith_error::ReelsmithErrorKind::Validation(_)
    ));
}

#[tokio::test]
async fn missing_clip_reports_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemWorkspace::new(temp_dir.path()).unwrap();

    let result = store.read_clip("proj_a", "run_b", "segment-99.mp4").await;
    assert!(matches!(
        result.unwrap_err().kind(),
        reelsmith_error::ReelsmithErrorKind::Storage(_)
    ));
}
