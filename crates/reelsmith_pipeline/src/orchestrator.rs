//! Run orchestration.
//!
//! The orchestrator walks a run through its state machine —
//! `queued → planning → generating → {completed, failed}` — persisting
//! the manifest at every phase boundary and emitting best-effort audit
//! events along the way. One segment's generation failure stays on that
//! segment; only persistence failures abort the run.

use crate::{build_segment_prompt, map_bounded, SegmentPlanner};
use reelsmith_core::{
    RunConfig, RunManifest, RunRequest, RunStatus, SegmentArtifact, SelectedModels, SystemPrompts,
};
use reelsmith_error::{ReelsmithResult, ValidationError};
use reelsmith_interface::{
    ClipRequest, EventLevel, EventMetadata, PlannerBackend, RunCreated, RunEventSink, StageEvent,
    StatusChange, VideoGenerator,
};
use reelsmith_storage::{clip_locator, content_hash, create_project_id, create_run_id, RunStore};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const SCRIPT_PREVIEW_CHARS: usize = 180;

/// Composes planning, prompt building, bounded dispatch, and persistence
/// into one crash-safe generation run.
///
/// Owns the run manifest exclusively for the lifetime of a run. The
/// remote collaborators arrive as trait objects, so tests drive the full
/// state machine with in-process doubles.
pub struct RunOrchestrator {
    planner: SegmentPlanner,
    generator: Arc<dyn VideoGenerator>,
    store: Arc<dyn RunStore>,
    events: Arc<dyn RunEventSink>,
    config: RunConfig,
    prompts: SystemPrompts,
}

impl std::fmt::Debug for RunOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOrchestrator")
            .field("config", &self.config)
            .field("prompts", &self.prompts)
            .finish_non_exhaustive()
    }
}

impl RunOrchestrator {
    /// Create an orchestrator with a heuristic-only planner.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed config or prompt set.
    pub fn new(
        generator: Arc<dyn VideoGenerator>,
        store: Arc<dyn RunStore>,
        events: Arc<dyn RunEventSink>,
        config: RunConfig,
        prompts: SystemPrompts,
    ) -> ReelsmithResult<Self> {
        config.validate().map_err(ValidationError::new)?;
        prompts.validate().map_err(ValidationError::new)?;

        let planner = SegmentPlanner::new(config.clone(), prompts.clone());
        Ok(Self {
            planner,
            generator,
            store,
            events,
            config,
            prompts,
        })
    }

    /// Attach a remote planning backend.
    pub fn with_planner_backend(mut self, backend: Arc<dyn PlannerBackend>) -> Self {
        self.planner =
            SegmentPlanner::new(self.config.clone(), self.prompts.clone()).with_backend(backend);
        self
    }

    /// Execute one run to its terminal manifest.
    ///
    /// The caller always receives a manifest — a `failed` one when any
    /// segment failed — unless persistence itself is impossible, in which
    /// case the storage error propagates instead of a partial manifest.
    #[instrument(
        skip(self, request),
        fields(
            orchestrator_model = %request.orchestrator_model,
            video_model = %request.video_model,
        )
    )]
    pub async fn run(&self, request: RunRequest) -> ReelsmithResult<RunManifest> {
        let script = request.script.trim().to_string();
        if script.is_empty() {
            return Err(ValidationError::new("Script must not be empty").into());
        }

        let project_id = request
            .project_id
            .clone()
            .unwrap_or_else(create_project_id);
        let run_id = create_run_id();
        let selected_models = SelectedModels {
            orchestrator_model: request.orchestrator_model,
            video_model: request.video_model,
        };

        // Inputs land on disk before any remote work
        let script_artifact = self.store.save_script(&project_id, &run_id, &script).await?;

        let mut reference_paths = Vec::with_capacity(request.reference_images.len());
        let mut image_labels = Vec::with_capacity(request.reference_images.len());
        for (position, image) in request.reference_images.iter().enumerate() {
            let saved = self
                .store
                .save_reference_image(
                    &project_id,
                    &run_id,
                    position + 1,
                    image.extension(),
                    &image.bytes,
                )
                .await?;
            reference_paths.push(saved.relative_path);
            image_labels.push(saved.file_name);
        }

        let mut manifest = RunManifest::new(
            &project_id,
            &run_id,
            script_artifact.relative_path,
            reference_paths.clone(),
            selected_models,
        );
        self.store.write_manifest(&manifest).await?;

        self.emit_created(RunCreated {
            project_id: project_id.clone(),
            run_id: run_id.clone(),
            selected_models,
            script_preview: script.chars().take(SCRIPT_PREVIEW_CHARS).collect(),
            reference_image_count: request.reference_images.len(),
        })
        .await;

        manifest = manifest.with_status(RunStatus::Planning);
        self.store.write_manifest(&manifest).await?;
        self.emit_status(&project_id, &run_id, RunStatus::Planning, None).await;
        self.emit_stage(
            &project_id,
            &run_id,
            EventLevel::Info,
            "planning",
            "Building segment plan",
            None,
        )
        .await;

        let plan = self.planner.plan(&script).await;

        let mut plan_metadata = EventMetadata::new();
        plan_metadata.insert("source".to_string(), json!(plan.source.to_string()));
        plan_metadata.insert("totalSegments".to_string(), json!(plan.segments.len()));
        self.emit_stage(
            &project_id,
            &run_id,
            EventLevel::Info,
            "planning",
            "Segment plan finalized",
            Some(plan_metadata),
        )
        .await;

        let artifacts: Vec<SegmentArtifact> = plan
            .segments
            .iter()
            .map(|segment| {
                let prompt = build_segment_prompt(
                    segment,
                    &image_labels,
                    request.video_model,
                    &self.prompts.generation_system_prompt,
                );
                SegmentArtifact::pending(segment, prompt)
            })
            .collect();

        // The generating manifest must be durable before dispatch begins
        manifest = manifest
            .with_status(RunStatus::Generating)
            .with_segments(artifacts.clone());
        self.store.write_manifest(&manifest).await?;
        self.emit_status(&project_id, &run_id, RunStatus::Generating, None).await;

        let project_ref = project_id.as_str();
        let run_ref = run_id.as_str();
        let paths_ref = &reference_paths;
        let results = map_bounded(
            &artifacts,
            *self.config.concurrency_limit(),
            |artifact, _index| {
                let artifact = artifact.clone();
                async move {
                    self.generate_segment(project_ref, run_ref, paths_ref, artifact)
                        .await
                }
            },
        )
        .await;
        let segments = results.into_iter().collect::<ReelsmithResult<Vec<_>>>()?;

        manifest = manifest.with_segments(segments);
        let final_status = if manifest.failed_segments > 0 {
            RunStatus::Failed
        } else {
            RunStatus::Completed
        };
        manifest = manifest.with_status(final_status);
        self.store.write_manifest(&manifest).await?;

        let error_message = (final_status == RunStatus::Failed)
            .then(|| "One or more segments failed. See generation events.".to_string());
        self.emit_status(&project_id, &run_id, final_status, error_message).await;

        let mut completion_metadata = EventMetadata::new();
        completion_metadata.insert("finalStatus".to_string(), json!(final_status.to_string()));
        completion_metadata.insert(
            "successfulSegments".to_string(),
            json!(manifest.successful_segments),
        );
        completion_metadata.insert("failedSegments".to_string(), json!(manifest.failed_segments));
        self.emit_stage(
            &project_id,
            &run_id,
            EventLevel::Info,
            "complete",
            "Generation run finished",
            Some(completion_metadata),
        )
        .await;

        info!(
            project_id = %project_id,
            run_id = %run_id,
            status = %final_status,
            successful = manifest.successful_segments,
            failed = manifest.failed_segments,
            "Run finished"
        );

        Ok(manifest)
    }

    /// Generate and persist one segment's clip.
    ///
    /// Generation failures become a `failed` artifact and never escalate;
    /// a failure to persist the clip bytes is a run-fatal storage error.
    async fn generate_segment(
        &self,
        project_id: &str,
        run_id: &str,
        reference_paths: &[String],
        artifact: SegmentArtifact,
    ) -> ReelsmithResult<SegmentArtifact> {
        self.emit_stage(
            project_id,
            run_id,
            EventLevel::Info,
            "generation",
            format!("Generating segment {}", artifact.index),
            None,
        )
        .await;

        let request = ClipRequest {
            prompt: artifact.prompt.clone(),
            target_seconds: artifact.target_seconds,
            reference_images: reference_paths.to_vec(),
        };

        match self.generator.generate(&request).await {
            Ok(output) => {
                let base_name = format!(
                    "segment-{:02}-{}",
                    artifact.index,
                    content_hash(&artifact.prompt)
                );
                let saved = self
                    .store
                    .save_clip(project_id, run_id, &base_name, &output.extension, &output.bytes)
                    .await?;

                let locator = clip_locator(project_id, run_id, &saved.file_name);
                Ok(artifact.generated(
                    saved.relative_path,
                    saved.file_name,
                    locator,
                    output.duration_sec,
                ))
            }
            Err(e) => {
                let message = e.to_string();
                let mut metadata = EventMetadata::new();
                metadata.insert("error".to_string(), json!(message));
                self.emit_stage(
                    project_id,
                    run_id,
                    EventLevel::Error,
                    "generation",
                    format!("Segment {} failed", artifact.index),
                    Some(metadata),
                )
                .await;

                Ok(artifact.failed(message))
            }
        }
    }

    async fn emit_created(&self, event: RunCreated) {
        if let Err(e) = self.events.run_created(&event).await {
            warn!(error = %e, "Event sink rejected run-created notification");
        }
    }

    async fn emit_status(
        &self,
        project_id: &str,
        run_id: &str,
        status: RunStatus,
        error_message: Option<String>,
    ) {
        let event = StatusChange {
            project_id: project_id.to_string(),
            run_id: run_id.to_string(),
            status,
            error_message,
        };
        if let Err(e) = self.events.status_changed(&event).await {
            warn!(error = %e, "Event sink rejected status notification");
        }
    }

    async fn emit_stage(
        &self,
        project_id: &str,
        run_id: &str,
        level: EventLevel,
        stage: &str,
        message: impl Into<String>,
        metadata: Option<EventMetadata>,
    ) {
        let event = StageEvent {
            project_id: project_id.to_string(),
            run_id: run_id.to_string(),
            level,
            stage: stage.to_string(),
            message: message.into(),
            metadata,
        };
        if let Err(e) = self.events.stage_event(&event).await {
            warn!(error = %e, "Event sink rejected stage notification");
        }
    }
}
