//! Veo video generation adapter.

mod client;
mod wire;

pub use client::VeoClient;
