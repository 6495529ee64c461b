//! Mode S / ADS-B frame protocol
//!
//! Checksum validation, header parsing and type-code payload decoding
//! for 112-bit Extended Squitter frames.

pub mod crc;
pub mod message;
pub mod parser;
pub mod types;

pub use crc::{check_crc, compute_checksum};
pub use message::{AircraftIdentification, Payload};
pub use parser::{extract_message, ModeSMessage};
pub use types::{BitVector, ByteFrame, DownlinkFormat, MessageBytes};
