//! Run request types.

use crate::{OrchestratorModel, VideoModel};

/// One uploaded reference image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    /// Original file name, used to derive the saved extension
    pub file_name: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl ReferenceImage {
    /// Create a reference image from a file name hint and raw bytes.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Saved extension for this image: `png` when the name suggests PNG,
    /// `jpg` otherwise.
    pub fn extension(&self) -> &'static str {
        if self.file_name.to_lowercase().ends_with(".png") {
            "png"
        } else {
            "jpg"
        }
    }
}

/// Everything the orchestrator needs to start one run.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{OrchestratorModel, RunRequest, VideoModel};
///
/// let request = RunRequest::new(
///     "A short ad script about a smart water bottle.",
///     OrchestratorModel::Gemini,
///     VideoModel::Veo31Fast,
/// );
/// assert!(request.project_id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// The raw narration script
    pub script: String,
    /// Remote planner model family
    pub orchestrator_model: OrchestratorModel,
    /// Video generation model
    pub video_model: VideoModel,
    /// Uploaded reference images, saved before planning begins
    pub reference_images: Vec<ReferenceImage>,
    /// Existing project to attach the run to; a fresh id is minted when absent
    pub project_id: Option<String>,
}

impl RunRequest {
    /// Create a request with no reference images for a fresh project.
    pub fn new(
        script: impl Into<String>,
        orchestrator_model: OrchestratorModel,
        video_model: VideoModel,
    ) -> Self {
        Self {
            script: script.into(),
            orchestrator_model,
            video_model,
            reference_images: Vec::new(),
            project_id: None,
        }
    }

    /// Attach reference images.
    pub fn with_reference_images(mut self, images: Vec<ReferenceImage>) -> Self {
        self.reference_images = images;
        self
    }

    /// Attach the run to an existing project.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}
