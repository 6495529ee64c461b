//! Mode S Decoder - dump1090-style Extended Squitter decoding
//!
//! Reads 2 MSPS samples from a recording or stdin, decodes Mode S long
//! frames and tracks aircraft identification per ICAO address.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use modes_decoder::adsb::types::SAMPLE_RATE;
use modes_decoder::config::Config;
use modes_decoder::sdr::SampleCapture;
use modes_decoder::session::{FrameQueue, SessionManager};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;

    // Initialize logging; RUST_LOG takes precedence over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("Invalid LOG_LEVEL '{}'", config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("===========================================");
    info!("   Mode S Decoder");
    info!("   dump1090-style Rust decoder");
    info!("===========================================");

    info!("Configuration:");
    info!("  Sample source: {}", config.sample_source);
    info!("  Sample format: {}", config.sample_format);
    info!("  Sample rate: {} MSPS", SAMPLE_RATE / 1_000_000);
    info!("  Refresh interval: {} ms", config.refresh_interval_ms);
    info!("  Frame queue capacity: {}", config.frame_queue_capacity);
    match config.aircraft_timeout_secs {
        0 => info!("  Aircraft timeout: disabled"),
        secs => info!("  Aircraft timeout: {} s", secs),
    }
    if let Some(path) = &config.snapshot_path {
        info!("  Snapshot path: {}", path.display());
    }

    let queue = Arc::new(FrameQueue::new(config.frame_queue_capacity));
    let capture = SampleCapture::new(queue.clone());

    if let Err(e) = capture.start(&config.sample_source, config.sample_format) {
        error!("Failed to start sample capture: {:#}", e);
        return Err(e);
    }

    info!("===========================================");
    info!("  Decoding...");
    info!("  Press Ctrl+C to stop.");
    info!("===========================================");

    let manager = SessionManager::new(config, queue).run(&capture).await?;

    info!(
        "Shutdown complete. Messages received: {}",
        manager.stats().get_received()
    );
    Ok(())
}
