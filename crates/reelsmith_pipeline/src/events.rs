//! Event sink implementations.

use async_trait::async_trait;
use reelsmith_error::ReelsmithResult;
use reelsmith_interface::{EventLevel, RunCreated, RunEventSink, StageEvent, StatusChange};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{error, info};

/// Event sink that forwards every notification to the tracing subscriber.
///
/// The default sink for processes that have no external audit store.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

#[async_trait]
impl RunEventSink for TracingEventSink {
    async fn run_created(&self, event: &RunCreated) -> ReelsmithResult<()> {
        info!(
            project_id = %event.project_id,
            run_id = %event.run_id,
            orchestrator_model = %event.selected_models.orchestrator_model,
            video_model = %event.selected_models.video_model,
            reference_images = event.reference_image_count,
            "Run created"
        );
        Ok(())
    }

    async fn status_changed(&self, event: &StatusChange) -> ReelsmithResult<()> {
        info!(
            project_id = %event.project_id,
            run_id = %event.run_id,
            status = %event.status,
            error_message = event.error_message.as_deref(),
            "Run status changed"
        );
        Ok(())
    }

    async fn stage_event(&self, event: &StageEvent) -> ReelsmithResult<()> {
        match event.level {
            EventLevel::Info => info!(
                project_id = %event.project_id,
                run_id = %event.run_id,
                stage = %event.stage,
                metadata = ?event.metadata,
                "{}", event.message
            ),
            EventLevel::Error => error!(
                project_id = %event.project_id,
                run_id = %event.run_id,
                stage = %event.stage,
                metadata = ?event.metadata,
                "{}", event.message
            ),
        }
        Ok(())
    }
}

/// In-memory event sink.
///
/// Keeps every notification for later inspection; run records are keyed
/// by `run_id`, so a repeated `run_created` for the same run is a no-op
/// that leaves the first record untouched.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    runs: Mutex<HashMap<String, RunCreated>>,
    statuses: Mutex<Vec<StatusChange>>,
    events: Mutex<Vec<StageEvent>>,
}

impl MemoryEventSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The run record for a run id, if one was created.
    pub fn run(&self, run_id: &str) -> Option<RunCreated> {
        self.runs.lock().expect("runs lock").get(run_id).cloned()
    }

    /// Number of distinct runs recorded.
    pub fn run_count(&self) -> usize {
        self.runs.lock().expect("runs lock").len()
    }

    /// Every status change in emission order.
    pub fn statuses(&self) -> Vec<StatusChange> {
        self.statuses.lock().expect("statuses lock").clone()
    }

    /// Every stage event in emission order.
    pub fn events(&self) -> Vec<StageEvent> {
        self.events.lock().expect("events lock").clone()
    }
}

#[async_trait]
impl RunEventSink for MemoryEventSink {
    async fn run_created(&self, event: &RunCreated) -> ReelsmithResult<()> {
        self.runs
            .lock()
            .expect("runs lock")
            .entry(event.run_id.clone())
            .or_insert_with(|| event.clone());
        Ok(())
    }

    async fn status_changed(&self, event: &StatusChange) -> ReelsmithResult<()> {
        self.statuses.lock().expect("statuses lock").push(event.clone());
        Ok(())
    }

    async fn stage_event(&self, event: &StageEvent) -> ReelsmithResult<()> {
        self.events.lock().expect("events lock").push(event.clone());
        Ok(())
    }
}
