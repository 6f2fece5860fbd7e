//! Core data types for the reelsmith clip generation pipeline.
//!
//! This crate provides the foundation data types shared across the
//! reelsmith workspace: the segment plan and run manifest entities, model
//! selection enums, run configuration, and system prompt configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod manifest;
mod models;
mod prompts;
mod request;
mod segment;
mod telemetry;

pub use config::{RunConfig, RunConfigBuilder};
pub use manifest::{RunManifest, RunStatus, SelectedModels};
pub use models::{OrchestratorModel, VideoModel};
pub use prompts::SystemPrompts;
pub use request::{ReferenceImage, RunRequest};
pub use segment::{PlanSource, SegmentArtifact, SegmentPlanItem, SegmentPlanResult, SegmentStatus};
pub use telemetry::init_telemetry;
