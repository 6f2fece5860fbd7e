//! Segment planning and run orchestration.
//!
//! This crate holds the pipeline core: the segment planner with its
//! deterministic fallback, the pure prompt builder, the order-preserving
//! bounded-concurrency mapper, and the run orchestrator that composes
//! them over the storage and event-sink seams.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod events;
mod heuristic;
mod orchestrator;
mod planner;
mod pool;
mod prompt;

pub use events::{MemoryEventSink, TracingEventSink};
pub use orchestrator::RunOrchestrator;
pub use planner::SegmentPlanner;
pub use pool::map_bounded;
pub use prompt::build_segment_prompt;
