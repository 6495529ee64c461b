//! Session manager - drains decoded frames into the aircraft registry

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::adsb::{extract_message, ModeSMessage};
use crate::aircraft_registry::AircraftRegistry;
use crate::config::Config;
use crate::sdr::SampleCapture;

use super::queue::FrameQueue;
use super::state::SessionStats;

/// Session manager owns the registry and is its only writer
pub struct SessionManager {
    config: Config,
    queue: Arc<FrameQueue>,
    registry: AircraftRegistry,
    stats: SessionStats,
}

impl SessionManager {
    pub fn new(config: Config, queue: Arc<FrameQueue>) -> Self {
        let registry = AircraftRegistry::new(config.aircraft_timeout_secs);

        Self {
            config,
            queue,
            registry,
            stats: SessionStats::new(),
        }
    }

    /// Drain the queue and apply every frame to the registry.
    /// Returns the number of messages processed.
    pub fn refresh(&mut self) -> usize {
        self.refresh_at(Utc::now())
    }

    pub fn refresh_at(&mut self, now: DateTime<Utc>) -> usize {
        let frames = self.queue.drain();
        let count = frames.len();

        for frame in frames {
            self.handle_message(extract_message(&frame), now);
        }

        let evicted = self.registry.evict_stale(now);

        if count > 0 || evicted > 0 {
            if let Some(path) = &self.config.snapshot_path {
                if let Err(e) = self.write_snapshot(path) {
                    warn!("Failed to write registry snapshot: {:#}", e);
                }
            }
        }

        count
    }

    fn handle_message(&mut self, msg: ModeSMessage, now: DateTime<Utc>) {
        debug!("\n{}", msg);

        if !msg.df().has_plain_parity() {
            debug!(
                "DF{} frame from {} accepted on plain parity",
                msg.downlink_format(),
                msg.icao_hex()
            );
        }

        self.stats.record_message(msg.payload().is_decoded());
        self.registry.update_at(&msg, now);
    }

    fn write_snapshot(&self, path: &Path) -> Result<()> {
        let json = self
            .registry
            .snapshot_json()
            .context("Failed to serialize registry")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn registry(&self) -> &AircraftRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Zero the message counters; the registry is kept
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    fn log_stats(&self, capture: &SampleCapture) {
        info!(
            "[Stats] Received Messages: {} (identification: {}, unsupported: {}) | Queued: {}",
            self.stats.get_received(),
            self.stats.get_identifications(),
            self.stats.get_unsupported(),
            self.queue.len()
        );
        info!("[Registry] {}", self.registry.stats_summary());
        info!("[Decoder] {}", capture.stats());
    }

    /// Refresh periodically until Ctrl-C, or until the capture has
    /// finished and every queued frame has been consumed.
    pub async fn run(mut self, capture: &SampleCapture) -> Result<Self> {
        info!(
            "Starting session manager (refresh every {} ms)",
            self.config.refresh_interval_ms
        );

        let mut refresh_interval =
            tokio::time::interval(Duration::from_millis(self.config.refresh_interval_ms.max(1)));
        let mut stats_interval =
            tokio::time::interval(Duration::from_secs(self.config.stats_interval_secs.max(1)));
        stats_interval.tick().await;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut ctrl_c_armed = true;

        loop {
            tokio::select! {
                _ = refresh_interval.tick() => {
                    // Read before draining so frames flushed in between are not lost
                    let finished = capture.is_finished();
                    self.refresh();
                    if finished && self.queue.is_empty() {
                        info!("Sample input exhausted");
                        break;
                    }
                }
                _ = stats_interval.tick() => {
                    self.log_stats(capture);
                }
                result = &mut ctrl_c, if ctrl_c_armed => {
                    match result {
                        Ok(()) => {
                            info!("Ctrl-C received, shutting down");
                            break;
                        }
                        Err(e) => {
                            warn!("Ctrl-C handler unavailable: {}", e);
                            ctrl_c_armed = false;
                        }
                    }
                }
            }
        }

        capture.stop();
        self.refresh();
        self.log_stats(capture);

        info!(
            "Session manager stopped. Received Messages: {}, Aircraft: {}",
            self.stats.get_received(),
            self.registry.len()
        );

        Ok(self)
    }
}
