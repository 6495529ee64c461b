//! Mode S header parsing for checksum-valid long frames

use std::fmt;

use super::message::Payload;
use super::types::{ByteFrame, DownlinkFormat, MessageBytes, ME_BYTES};

/// Decoded Mode S long frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSMessage {
    frame: ByteFrame,
    downlink_format: u8,
    capability: u8,
    icao: u32,
    type_code: u8,
    me: MessageBytes,
    payload: Payload,
}

impl ModeSMessage {
    /// Raw 14-byte frame
    pub fn frame(&self) -> &ByteFrame {
        &self.frame
    }

    /// Downlink format (5 bits)
    pub fn downlink_format(&self) -> u8 {
        self.downlink_format
    }

    pub fn df(&self) -> DownlinkFormat {
        DownlinkFormat::from(self.downlink_format)
    }

    /// Capability (3 bits)
    pub fn capability(&self) -> u8 {
        self.capability
    }

    /// ICAO 24-bit address
    pub fn icao(&self) -> u32 {
        self.icao
    }

    /// ICAO address as six uppercase hex digits
    pub fn icao_hex(&self) -> String {
        format!("{:06X}", self.icao)
    }

    /// Type code from the first 5 bits of the ME field
    pub fn type_code(&self) -> u8 {
        self.type_code
    }

    /// Raw ME field
    pub fn me(&self) -> &MessageBytes {
        &self.me
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Parse the fixed-position header fields and decode the payload.
///
/// The frame must already have passed the checksum; no validation is
/// repeated here.
pub fn extract_message(frame: &ByteFrame) -> ModeSMessage {
    let icao = ((frame[1] as u32) << 16) | ((frame[2] as u32) << 8) | frame[3] as u32;
    let type_code = frame[4] >> 3;

    let mut me = [0u8; ME_BYTES];
    me.copy_from_slice(&frame[4..4 + ME_BYTES]);

    ModeSMessage {
        frame: *frame,
        downlink_format: frame[0] >> 3,
        capability: frame[0] & 0x07,
        icao,
        type_code,
        payload: Payload::decode(type_code, &me),
        me,
    }
}

impl fmt::Display for ModeSMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raw Frame: {}", hex::encode_upper(self.frame))?;
        writeln!(f, "Downlink Format: {}", self.downlink_format)?;
        writeln!(f, "Capability: {}", self.capability)?;
        writeln!(f, "ICAO Address: {:06X}", self.icao)?;
        writeln!(f, "Raw Message: {}", hex::encode_upper(self.me))?;
        writeln!(f, "  Type Code: {}", self.type_code)?;
        writeln!(f, "******** ADSB Message ********")?;
        writeln!(f, "{}", self.payload)?;
        write!(f, "******************************")
    }
}
