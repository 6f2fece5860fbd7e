//! Tracing subscriber initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the tracing subscriber for the process.
///
/// Installs a human-readable fmt layer filtered by the `RUST_LOG`
/// environment variable. Call once at startup; repeated calls fail once a
/// global subscriber is set.
///
/// # Errors
///
/// Returns error if subscriber initialization fails.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    Ok(())
}
