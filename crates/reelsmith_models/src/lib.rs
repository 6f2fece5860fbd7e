//! Remote planner and video generation adapters.
//!
//! Concrete implementations of the `reelsmith_interface` traits over the
//! services' REST APIs:
//!
//! - [`GeminiPlanner`] — segmentation via the Gemini `generateContent`
//!   endpoint in strict-JSON mode
//! - [`OpenAiPlanner`] — segmentation via the OpenAI chat completions
//!   endpoint with a JSON response format
//! - [`VeoClient`] — clip generation via the Veo `generateVideos`
//!   endpoint, handling inline payloads, download URIs, and long-running
//!   operations behind one interface

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod openai;
mod segments;
mod veo;

pub use gemini::GeminiPlanner;
pub use openai::OpenAiPlanner;
pub use veo::VeoClient;
