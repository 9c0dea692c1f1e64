//! Tracing subscriber setup.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,flower_field=debug,flower_world=debug";

/// Install the global subscriber.
///
/// Logs go to stderr so frames drawn on stdout stay intact. Set
/// `FLOWER_FIELD_LOG_FORMAT=json` for one JSON object per event.
pub fn init_telemetry() -> Result<()> {
    let json = std::env::var("FLOWER_FIELD_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    info!("Telemetry initialized");
    Ok(())
}
