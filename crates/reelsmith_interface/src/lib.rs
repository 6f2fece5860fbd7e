//! Trait seams between the reelsmith pipeline and its remote collaborators.
//!
//! The pipeline never talks to a concrete service: segmentation planning,
//! video generation, and audit logging all pass through the traits defined
//! here. Concrete adapters live in `reelsmith_models`; test doubles
//! implement the same traits in-process.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{PlannerBackend, RunEventSink, VideoGenerator};
pub use types::{
    ClipOutput, ClipRequest, EventLevel, EventMetadata, RunCreated, SegmentProposal, StageEvent,
    StatusChange,
};
