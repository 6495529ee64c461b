//! Type-code dispatch for the ME field payload

use std::fmt;

use super::types::MessageBytes;

/// Callsign character lookup table
pub const CALLSIGN_CHARS: &[u8; 64] =
    b"#ABCDEFGHIJKLMNOPQRSTUVWXYZ##### ###############0123456789######";

/// Characters in a decoded callsign
pub const CALLSIGN_LEN: usize = 8;

/// Substitute for a character index outside the alphabet
const UNRESOLVED_CHAR: char = '?';

/// Aircraft identification (type codes 1-4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AircraftIdentification {
    callsign: String,
}

impl AircraftIdentification {
    /// Decode the eight 6-bit characters following the TC/category byte.
    ///
    /// ```text
    /// | TC,5 | CA,3 | C1,6 | C2,6 | C3,6 | C4,6 | C5,6 | C6,6 | C7,6 | C8,6 |
    /// ```
    pub fn decode(me: &MessageBytes) -> Self {
        let packed = me[1..]
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | b as u64);

        let callsign = (0..CALLSIGN_LEN)
            .map(|j| {
                let shift = 42 - 6 * j;
                callsign_char(((packed >> shift) & 0x3F) as usize)
            })
            .collect();

        Self { callsign }
    }

    /// Eight characters, trailing spaces kept
    pub fn callsign(&self) -> &str {
        &self.callsign
    }
}

impl fmt::Display for AircraftIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Aircraft Identification")?;
        write!(f, "  Callsign: {}", self.callsign)
    }
}

/// Map a 6-bit index through the callsign alphabet
pub fn callsign_char(idx: usize) -> char {
    CALLSIGN_CHARS
        .get(idx)
        .map(|&c| c as char)
        .unwrap_or(UNRESOLVED_CHAR)
}

/// Decoded ME payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    AircraftIdentification(AircraftIdentification),
    /// Type code with no decoder; the raw ME bytes stay on the message
    Unknown,
}

impl Payload {
    /// Select a decoder by type code
    pub fn decode(type_code: u8, me: &MessageBytes) -> Self {
        match type_code {
            1..=4 => Self::AircraftIdentification(AircraftIdentification::decode(me)),
            _ => Self::Unknown,
        }
    }

    pub fn is_decoded(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn callsign(&self) -> Option<&str> {
        match self {
            Self::AircraftIdentification(id) => Some(id.callsign()),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AircraftIdentification(id) => fmt::Display::fmt(id, f),
            Self::Unknown => write!(f, "UNKNOWN MESSAGE"),
        }
    }
}
