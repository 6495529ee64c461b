//! Mode S / ADS-B decoder
//!
//! Finds Extended Squitter frames in a 2 MSPS magnitude stream, validates
//! their checksum, decodes aircraft identification and tracks aircraft by
//! ICAO address.

pub mod adsb;
pub mod aircraft_registry;
pub mod config;
pub mod error;
pub mod sdr;
pub mod session;
