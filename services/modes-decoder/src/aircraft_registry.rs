//! Aircraft registry
//!
//! Accumulates decoded messages into one entry per ICAO address. Entries
//! keep whatever a message does not supply, so a callsign learned from an
//! identification message survives later position or velocity squitters.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::adsb::ModeSMessage;

/// Default age in seconds after which an entry is evicted
pub const AIRCRAFT_TIMEOUT_SECS: u64 = 60;

/// Registry entry for one transponder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedAircraft {
    /// ICAO address as six uppercase hex digits
    pub icao: String,
    /// Last identification callsign, unset until one arrives
    pub callsign: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub messages: u64,
}

impl TrackedAircraft {
    fn new(icao: String, now: DateTime<Utc>) -> Self {
        Self {
            icao,
            callsign: None,
            last_updated: now,
            messages: 0,
        }
    }

    fn apply(&mut self, msg: &ModeSMessage, now: DateTime<Utc>) {
        self.last_updated = now;
        self.messages += 1;

        if let Some(callsign) = msg.payload().callsign() {
            self.callsign = Some(callsign.to_string());
        }
    }
}

/// All tracked aircraft, ordered by ICAO address
pub struct AircraftRegistry {
    aircraft: BTreeMap<String, TrackedAircraft>,
    timeout: Option<Duration>,
}

impl AircraftRegistry {
    /// `timeout_secs` of 0 disables eviction
    pub fn new(timeout_secs: u64) -> Self {
        let timeout = i64::try_from(timeout_secs)
            .ok()
            .filter(|&secs| secs > 0)
            .and_then(Duration::try_seconds);

        Self {
            aircraft: BTreeMap::new(),
            timeout,
        }
    }

    /// Apply a message, creating the entry on first sight
    pub fn update(&mut self, msg: &ModeSMessage) -> &TrackedAircraft {
        self.update_at(msg, Utc::now())
    }

    pub fn update_at(&mut self, msg: &ModeSMessage, now: DateTime<Utc>) -> &TrackedAircraft {
        let icao = msg.icao_hex();
        let state = self.aircraft.entry(icao).or_insert_with_key(|icao| {
            debug!("New aircraft tracked: {}", icao);
            TrackedAircraft::new(icao.clone(), now)
        });

        let had_callsign = state.callsign.is_some();
        state.apply(msg, now);
        if !had_callsign {
            if let Some(callsign) = &state.callsign {
                debug!("Aircraft {} identified as {:?}", state.icao, callsign);
            }
        }

        state
    }

    /// Get aircraft state by ICAO hex string
    pub fn get(&self, icao: &str) -> Option<&TrackedAircraft> {
        self.aircraft.get(icao)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedAircraft> {
        self.aircraft.values()
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    /// Remove entries not updated within the timeout. Returns the number removed.
    pub fn evict_stale(&mut self, now: DateTime<Utc>) -> usize {
        let Some(timeout) = self.timeout else {
            return 0;
        };

        let before = self.aircraft.len();
        self.aircraft
            .retain(|_, state| now.signed_duration_since(state.last_updated) <= timeout);
        let removed = before - self.aircraft.len();
        if removed > 0 {
            debug!(
                "Evicted {} stale aircraft, {} remaining",
                removed,
                self.aircraft.len()
            );
        }
        removed
    }

    /// Serialize the current entries as a JSON array
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        let rows: Vec<&TrackedAircraft> = self.iter().collect();
        serde_json::to_string_pretty(&rows)
    }

    /// Get summary statistics
    pub fn stats_summary(&self) -> RegistryStats {
        RegistryStats {
            total_aircraft: self.aircraft.len(),
            with_callsign: self.iter().filter(|a| a.callsign.is_some()).count(),
            total_messages: self.iter().map(|a| a.messages).sum(),
        }
    }
}

impl Default for AircraftRegistry {
    fn default() -> Self {
        Self::new(AIRCRAFT_TIMEOUT_SECS)
    }
}

/// Registry statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_aircraft: usize,
    pub with_callsign: usize,
    pub total_messages: u64,
}

impl fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Aircraft: {} total, {} with callsign, {} msgs",
            self.total_aircraft, self.with_callsign, self.total_messages
        )
    }
}
