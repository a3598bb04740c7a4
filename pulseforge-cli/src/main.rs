//! PulseForge: daily market pulse pipeline.
//!
//! Runs the whole sequence once and exits: resolve indicators, fetch quotes,
//! score, predict, write the JSON documents to the configured data directory.
//! Configuration comes from `$PULSEFORGE_CONFIG` (or `./pulseforge.toml`)
//! plus `POLYGON_API_KEY` / `FINNHUB_API_KEY`.

mod logging;

use anyhow::{Context, Result};
use pulseforge_core::HttpTransport;
use pulseforge_runner::{Pipeline, PipelineConfig};
use tracing::info;

fn main() -> Result<()> {
    logging::init_logging();

    let config = PipelineConfig::load().context("Failed to load configuration")?;
    info!(
        data_dir = %config.data_dir.display(),
        polygon = config.keys.polygon.is_some(),
        finnhub = config.keys.finnhub.is_some(),
        "pulseforge starting"
    );

    let transport =
        HttpTransport::new(&config.transport_config()).context("Failed to build HTTP client")?;
    let now = chrono::Local::now().naive_local();
    let report = Pipeline::new(&config, &transport).run(now)?;

    info!(
        files = report.files.len(),
        resolved = ?report.resolved,
        missing = ?report.missing,
        "all data written"
    );
    Ok(())
}
