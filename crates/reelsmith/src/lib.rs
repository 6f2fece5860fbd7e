//! Reelsmith - script-to-clips generation pipeline
//!
//! Reelsmith turns a narration script into a set of short vertical video
//! clips: it plans timed speaking segments (remote planner with a
//! deterministic fallback), builds a generation prompt per segment,
//! dispatches every segment to a remote video-generation service under
//! bounded concurrency, and persists a crash-safe manifest tracking each
//! segment's outcome.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reelsmith::{
//!     FileSystemWorkspace, GeminiPlanner, MemoryEventSink, OrchestratorModel,
//!     RunConfig, RunOrchestrator, RunRequest, SystemPrompts, VeoClient, VideoModel,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileSystemWorkspace::new("./storage")?);
//!     let config = RunConfig::default();
//!     let orchestrator = RunOrchestrator::new(
//!         Arc::new(VeoClient::from_config(VideoModel::Veo31Fast, &config)?),
//!         store,
//!         Arc::new(MemoryEventSink::new()),
//!         config,
//!         SystemPrompts::default(),
//!     )?
//!     .with_planner_backend(Arc::new(GeminiPlanner::new()?));
//!
//!     let manifest = orchestrator
//!         .run(RunRequest::new(
//!             "Meet the bottle that reminds you to drink.",
//!             OrchestratorModel::Gemini,
//!             VideoModel::Veo31Fast,
//!         ))
//!         .await?;
//!
//!     println!("run {} finished: {}", manifest.run_id, manifest.status);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Reelsmith is organized as a workspace with focused crates:
//!
//! - `reelsmith_error` - error types
//! - `reelsmith_core` - data model and configuration
//! - `reelsmith_interface` - trait seams for remote collaborators
//! - `reelsmith_storage` - atomic and collision-safe persistence
//! - `reelsmith_models` - planner and video generation adapters
//! - `reelsmith_pipeline` - segment planning and run orchestration
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use reelsmith_core::{
    init_telemetry, OrchestratorModel, PlanSource, ReferenceImage, RunConfig, RunConfigBuilder,
    RunManifest, RunRequest, RunStatus, SegmentArtifact, SegmentPlanItem, SegmentPlanResult,
    SegmentStatus, SelectedModels, SystemPrompts, VideoModel,
};
pub use reelsmith_error::{
    ConfigError, GenerationError, GenerationErrorKind, HttpError, JsonError, PlannerError,
    PlannerErrorKind, ReelsmithError, ReelsmithErrorKind, ReelsmithResult, StorageError,
    StorageErrorKind, ValidationError,
};
pub use reelsmith_interface::{
    ClipOutput, ClipRequest, EventLevel, EventMetadata, PlannerBackend, RunCreated, RunEventSink,
    SegmentProposal, StageEvent, StatusChange, VideoGenerator,
};
pub use reelsmith_models::{GeminiPlanner, OpenAiPlanner, VeoClient};
pub use reelsmith_pipeline::{
    build_segment_prompt, map_bounded, MemoryEventSink, RunOrchestrator, SegmentPlanner,
    TracingEventSink,
};
pub use reelsmith_storage::{
    clip_locator, content_hash, create_project_id, create_run_id, is_safe_file_name,
    sanitize_label, FileSystemWorkspace, RunStore, SavedArtifact, WorkspaceLayout,
};
