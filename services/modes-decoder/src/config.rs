//! Configuration loaded from environment variables

use std::path::PathBuf;
use std::str::FromStr;

use crate::aircraft_registry::AIRCRAFT_TIMEOUT_SECS;
use crate::error::ConfigError;
use crate::sdr::{SampleFormat, SampleSource};
use crate::session::queue::DEFAULT_QUEUE_CAPACITY;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Sample file, or stdin for `-`
    pub sample_source: SampleSource,

    /// Encoding of the sample stream
    pub sample_format: SampleFormat,

    /// Consumer refresh period in milliseconds
    pub refresh_interval_ms: u64,

    /// Frames held before new ones are dropped
    pub frame_queue_capacity: usize,

    /// Registry eviction age in seconds (0 disables)
    pub aircraft_timeout_secs: u64,

    /// Stats logging period in seconds
    pub stats_interval_secs: u64,

    /// Registry JSON snapshot written after each refresh
    pub snapshot_path: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            sample_source: SampleSource::parse(
                var("SAMPLE_SOURCE").as_deref().unwrap_or("-"),
            ),

            sample_format: var("SAMPLE_FORMAT")
                .map(|s| s.parse::<SampleFormat>())
                .transpose()?
                .unwrap_or(SampleFormat::Cu8),

            refresh_interval_ms: parse_var(&var, "REFRESH_INTERVAL_MS")?.unwrap_or(250),

            frame_queue_capacity: parse_var(&var, "FRAME_QUEUE_CAPACITY")?
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),

            aircraft_timeout_secs: parse_var(&var, "AIRCRAFT_TIMEOUT_SECS")?
                .unwrap_or(AIRCRAFT_TIMEOUT_SECS),

            stats_interval_secs: parse_var(&var, "STATS_INTERVAL_SECS")?.unwrap_or(10),

            snapshot_path: var("SNAPSHOT_PATH")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),

            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_var<F, T>(var: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    var(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.sample_source, SampleSource::Stdin);
        assert_eq!(config.sample_format, SampleFormat::Cu8);
        assert_eq!(config.refresh_interval_ms, 250);
        assert_eq!(config.frame_queue_capacity, 1_000_000);
        assert_eq!(config.aircraft_timeout_secs, 60);
        assert_eq!(config.stats_interval_secs, 10);
        assert_eq!(config.snapshot_path, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SAMPLE_SOURCE", "capture.f32"),
            ("SAMPLE_FORMAT", "f32"),
            ("FRAME_QUEUE_CAPACITY", "64"),
            ("AIRCRAFT_TIMEOUT_SECS", "0"),
            ("SNAPSHOT_PATH", "/tmp/aircraft.json"),
        ])
        .unwrap();
        assert_eq!(
            config.sample_source,
            SampleSource::File(PathBuf::from("capture.f32"))
        );
        assert_eq!(config.sample_format, SampleFormat::F32);
        assert_eq!(config.frame_queue_capacity, 64);
        assert_eq!(config.aircraft_timeout_secs, 0);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/aircraft.json")));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("SAMPLE_FORMAT", "cs16")]),
            Err(ConfigError::UnknownSampleFormat(_))
        ));
        assert!(matches!(
            load(&[("REFRESH_INTERVAL_MS", "fast")]),
            Err(ConfigError::InvalidValue { name: "REFRESH_INTERVAL_MS", .. })
        ));
    }
}
