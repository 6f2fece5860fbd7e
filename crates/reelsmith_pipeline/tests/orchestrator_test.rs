//! Orchestrator state machine tests over in-process doubles.

use async_trait::async_trait;
use reelsmith_core::{
    OrchestratorModel, ReferenceImage, RunConfig, RunRequest, RunStatus, SegmentStatus,
    SystemPrompts, VideoModel,
};
use reelsmith_error::{
    GenerationError, GenerationErrorKind, HttpError, ReelsmithErrorKind, ReelsmithResult,
};
use reelsmith_interface::{
    ClipOutput, ClipRequest, EventLevel, PlannerBackend, RunCreated, RunEventSink, SegmentProposal,
    StageEvent, StatusChange, VideoGenerator,
};
use reelsmith_pipeline::{MemoryEventSink, RunOrchestrator};
use reelsmith_storage::{FileSystemWorkspace, RunStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

struct StubGenerator {
    fail_on: Option<String>,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn succeeding() -> Self {
        Self {
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VideoGenerator for StubGenerator {
    async fn generate(&self, request: &ClipRequest) -> ReelsmithResult<ClipOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(marker) = &self.fail_on {
            if request.prompt.contains(marker) {
                return Err(GenerationError::new(GenerationErrorKind::JobFailed(
                    "synthetic failure".to_string(),
                ))
                .into());
            }
        }

        Ok(ClipOutput {
            bytes: format!("clip for {} seconds", request.target_seconds).into_bytes(),
            extension: "mp4".to_string(),
            duration_sec: request.target_seconds,
        })
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-video-1"
    }
}

struct ScriptedPlanner {
    proposals: Vec<SegmentProposal>,
}

#[async_trait]
impl PlannerBackend for ScriptedPlanner {
    async fn propose(
        &self,
        _script: &str,
        _planning_system_prompt: &str,
    ) -> ReelsmithResult<Vec<SegmentProposal>> {
        Ok(self.proposals.clone())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

struct DeadSink;

#[async_trait]
impl RunEventSink for DeadSink {
    async fn run_created(&self, _event: &RunCreated) -> ReelsmithResult<()> {
        Err(HttpError::new("sink unavailable").into())
    }

    async fn status_changed(&self, _event: &StatusChange) -> ReelsmithResult<()> {
        Err(HttpError::new("sink unavailable").into())
    }

    async fn stage_event(&self, _event: &StageEvent) -> ReelsmithResult<()> {
        Err(HttpError::new("sink unavailable").into())
    }
}

fn proposal(text: &str) -> SegmentProposal {
    SegmentProposal {
        text: text.to_string(),
        target_seconds: Some(8.0),
        continuity_notes: Some("Same host throughout.".to_string()),
    }
}

fn three_segment_planner() -> Arc<ScriptedPlanner> {
    Arc::new(ScriptedPlanner {
        proposals: vec![
            proposal("Meet the bottle that tracks your water."),
            proposal("It glows when you fall behind."),
            proposal("Grab yours before the sale ends."),
        ],
    })
}

/// Gate at one word so the scripted planner is always consulted.
fn permissive_config() -> RunConfig {
    RunConfig::builder().min_words_for_remote_plan(1).build()
}

fn request() -> RunRequest {
    RunRequest::new(
        "Meet the bottle that tracks your water. It glows when you fall behind. \
         Grab yours before the sale ends.",
        OrchestratorModel::Gemini,
        VideoModel::Veo31Fast,
    )
}

#[tokio::test]
async fn mixed_outcome_run_is_failed_with_isolated_segment_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemWorkspace::new(temp_dir.path()).unwrap());
    let sink = Arc::new(MemoryEventSink::new());

    let orchestrator = RunOrchestrator::new(
        Arc::new(StubGenerator::failing_on("It glows when you fall behind.")),
        store.clone(),
        sink.clone(),
        permissive_config(),
        SystemPrompts::default(),
    )
    .unwrap()
    .with_planner_backend(three_segment_planner());

    let manifest = orchestrator.run(request()).await.unwrap();

    assert_eq!(manifest.status, RunStatus::Failed);
    assert_eq!(manifest.total_segments, 3);
    assert_eq!(manifest.successful_segments, 2);
    assert_eq!(manifest.failed_segments, 1);

    let failed = &manifest.segments[1];
    assert_eq!(failed.status, SegmentStatus::Failed);
    assert!(failed.error.as_deref().unwrap().contains("synthetic failure"));
    assert!(failed.clip_path.is_none());
    assert!(failed.clip_file_name.is_none());
    assert!(failed.download_url.is_none());
    assert!(failed.duration_sec.is_none());

    for survivor in [&manifest.segments[0], &manifest.segments[2]] {
        assert_eq!(survivor.status, SegmentStatus::Generated);
        assert!(survivor.error.is_none());
        assert_eq!(survivor.duration_sec, Some(8));

        let file_name = survivor.clip_file_name.as_deref().unwrap();
        assert!(file_name.starts_with(&format!("segment-{:02}-", survivor.index)));
        assert!(file_name.ends_with(".mp4"));

        let expected_locator = format!(
            "/projects/{}/runs/{}/clips/{file_name}",
            manifest.project_id, manifest.run_id
        );
        assert_eq!(survivor.download_url.as_deref(), Some(expected_locator.as_str()));

        // The clip actually landed on disk under its recorded name
        let bytes = store
            .read_clip(&manifest.project_id, &manifest.run_id, file_name)
            .await
            .unwrap();
        assert_eq!(bytes, b"clip for 8 seconds");
    }

    // The persisted manifest is the terminal manifest the caller received
    let persisted = store
        .read_manifest(&manifest.project_id, &manifest.run_id)
        .await
        .unwrap();
    assert_eq!(persisted, manifest);
}

#[tokio::test]
async fn successful_run_completes_and_persists_everything() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemWorkspace::new(temp_dir.path()).unwrap());
    let sink = Arc::new(MemoryEventSink::new());

    let orchestrator = RunOrchestrator::new(
        Arc::new(StubGenerator::succeeding()),
        store.clone(),
        sink.clone(),
        permissive_config(),
        SystemPrompts::default(),
    )
    .unwrap()
    .with_planner_backend(three_segment_planner());

    let manifest = orchestrator.run(request()).await.unwrap();

    assert_eq!(manifest.status, RunStatus::Completed);
    assert_eq!(manifest.successful_segments, 3);
    assert_eq!(manifest.failed_segments, 0);
    assert!(manifest.script_path.ends_with("inputs/script.txt"));

    let script = std::fs::read_to_string(temp_dir.path().join(&manifest.script_path)).unwrap();
    assert!(script.starts_with("Meet the bottle"));
    assert!(script.ends_with('\n'));

    // Status trail and final counts reached the sink
    let statuses: Vec<RunStatus> = sink.statuses().iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![RunStatus::Planning, RunStatus::Generating, RunStatus::Completed]
    );
    assert!(sink.statuses().last().unwrap().error_message.is_none());

    let finished = sink
        .events()
        .into_iter()
        .find(|event| event.message == "Generation run finished")
        .unwrap();
    let metadata = finished.metadata.unwrap();
    assert_eq!(metadata["successfulSegments"], 3);
    assert_eq!(metadata["failedSegments"], 0);
}

#[tokio::test]
async fn failed_segment_emits_an_error_stage_event() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemWorkspace::new(temp_dir.path()).unwrap());
    let sink = Arc::new(MemoryEventSink::new());

    let orchestrator = RunOrchestrator::new(
        Arc::new(StubGenerator::failing_on("It glows when you fall behind.")),
        store,
        sink.clone(),
        permissive_config(),
        SystemPrompts::default(),
    )
    .unwrap()
    .with_planner_backend(three_segment_planner());

    orchestrator.run(request()).await.unwrap();

    let failure = sink
        .events()
        .into_iter()
        .find(|event| event.level == EventLevel::Error)
        .unwrap();
    assert_eq!(failure.stage, "generation");
    assert_eq!(failure.message, "Segment 2 failed");
    assert!(failure.metadata.unwrap()["error"]
        .as_str()
        .unwrap()
        .contains("synthetic failure"));

    assert_eq!(sink.run_count(), 1);
    assert!(sink.statuses().last().unwrap().error_message.is_some());
}

#[tokio::test]
async fn heuristic_plan_drives_the_run_when_no_backend_is_attached() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemWorkspace::new(temp_dir.path()).unwrap());
    let sink = Arc::new(MemoryEventSink::new());

    let orchestrator = RunOrchestrator::new(
        Arc::new(StubGenerator::succeeding()),
        store,
        sink.clone(),
        RunConfig::default(),
        SystemPrompts::default(),
    )
    .unwrap();

    let manifest = orchestrator
        .run(RunRequest::new(
            "Tiny pitch. Buy it now.",
            OrchestratorModel::Gemini,
            VideoModel::Veo31,
        ))
        .await
        .unwrap();

    assert_eq!(manifest.status, RunStatus::Completed);
    assert_eq!(manifest.total_segments, 1);

    let plan_event = sink
        .events()
        .into_iter()
        .find(|event| event.message == "Segment plan finalized")
        .unwrap();
    assert_eq!(plan_event.metadata.unwrap()["source"], "heuristic");
}

#[tokio::test]
async fn reference_images_are_saved_and_threaded_into_prompts() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemWorkspace::new(temp_dir.path()).unwrap());
    let sink = Arc::new(MemoryEventSink::new());

    let orchestrator = RunOrchestrator::new(
        Arc::new(StubGenerator::succeeding()),
        store,
        sink,
        permissive_config(),
        SystemPrompts::default(),
    )
    .unwrap()
    .with_planner_backend(three_segment_planner());

    let manifest = orchestrator
        .run(request().with_reference_images(vec![
            ReferenceImage::new("host.png", vec![0x89, 0x50]),
            ReferenceImage::new("kitchen.jpeg", vec![0xFF, 0xD8]),
        ]))
        .await
        .unwrap();

    assert_eq!(
        manifest.reference_images,
        vec![
            format!(
                "projects/{}/runs/{}/inputs/reference-01.png",
                manifest.project_id, manifest.run_id
            ),
            format!(
                "projects/{}/runs/{}/inputs/reference-02.jpg",
                manifest.project_id, manifest.run_id
            ),
        ]
    );

    // Prompts list the saved labels instead of the generic persona clause
    for segment in &manifest.segments {
        assert!(segment.prompt.contains("reference-01.png, reference-02.jpg"));
        assert!(!segment.prompt.contains("consistent single UGC creator identity"));
    }
}

#[tokio::test]
async fn empty_script_is_rejected_before_any_work() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemWorkspace::new(temp_dir.path()).unwrap());
    let sink = Arc::new(MemoryEventSink::new());
    let generator = Arc::new(StubGenerator::succeeding());

    let orchestrator = RunOrchestrator::new(
        generator.clone(),
        store,
        sink.clone(),
        RunConfig::default(),
        SystemPrompts::default(),
    )
    .unwrap();

    let error = orchestrator
        .run(RunRequest::new(
            "   \n ",
            OrchestratorModel::Gemini,
            VideoModel::Veo31Fast,
        ))
        .await
        .unwrap_err();

    assert!(matches!(error.kind(), ReelsmithErrorKind::Validation(_)));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(sink.run_count(), 0);
    assert!(!temp_dir.path().join("projects").exists());
}

#[tokio::test]
async fn unavailable_event_sink_never_fails_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemWorkspace::new(temp_dir.path()).unwrap());

    let orchestrator = RunOrchestrator::new(
        Arc::new(StubGenerator::succeeding()),
        store,
        Arc::new(DeadSink),
        permissive_config(),
        SystemPrompts::default(),
    )
    .unwrap()
    .with_planner_backend(three_segment_planner());

    let manifest = orchestrator.run(request()).await.unwrap();
    assert_eq!(manifest.status, RunStatus::Completed);
}

#[tokio::test]
async fn malformed_config_is_rejected_at_construction() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemWorkspace::new(temp_dir.path()).unwrap());

    let result = RunOrchestrator::new(
        Arc::new(StubGenerator::succeeding()),
        store,
        Arc::new(MemoryEventSink::new()),
        RunConfig::builder().min_seconds(9).max_seconds(5).build(),
        SystemPrompts::default(),
    );

    assert!(matches!(
        result.unwrap_err().kind(),
        ReelsmithErrorKind::Validation(_)
    ));
}
