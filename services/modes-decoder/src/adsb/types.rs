//! Mode S frame types and timing constants

/// Fixed sample rate of the magnitude stream (0.5 µs per sample)
pub const SAMPLE_RATE: u32 = 2_000_000;

/// Data bits in a long (Extended Squitter) frame
pub const BITS_PER_FRAME: usize = 112;

/// Bytes in a long frame
pub const BYTES_PER_FRAME: usize = BITS_PER_FRAME / 8;

/// Preamble length in bit periods (8 µs)
pub const BITS_PER_PREAMBLE: usize = 8;

/// Two magnitude samples per data bit
pub const SAMPLES_PER_BIT: usize = 2;

pub const SAMPLES_PER_FRAME: usize = SAMPLES_PER_BIT * BITS_PER_FRAME;
pub const SAMPLES_PER_PREAMBLE: usize = SAMPLES_PER_BIT * BITS_PER_PREAMBLE;

/// Preamble plus data, the span consumed by one accepted candidate
pub const SAMPLES_PER_PACKET: usize = SAMPLES_PER_PREAMBLE + SAMPLES_PER_FRAME;

/// Buffered samples that trigger a decode pass
pub const BUFFER_THRESHOLD: usize = 1_048_576;

/// Threshold plus one packet of overlap
pub const BUFFER_SIZE: usize = BUFFER_THRESHOLD + SAMPLES_PER_PACKET;

/// Length of the ME field in bytes
pub const ME_BYTES: usize = 7;

/// One demodulated bit per data-bit period
pub type BitVector = [bool; BITS_PER_FRAME];

/// MSB-first packing of a [`BitVector`]
pub type ByteFrame = [u8; BYTES_PER_FRAME];

/// Raw ME field ("Message, Extended Squitter")
pub type MessageBytes = [u8; ME_BYTES];

/// Downlink format identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DownlinkFormat {
    ShortAirSurveillance = 0,
    AltitudeReply = 4,
    IdentityReply = 5,
    AllCallReply = 11,
    LongAirSurveillance = 16,
    ExtendedSquitter = 17,
    ExtendedSquitterNonTransponder = 18,
    MilitaryExtendedSquitter = 19,
    CommBAltitude = 20,
    CommBIdentity = 21,
    Unknown = 255,
}

impl From<u8> for DownlinkFormat {
    fn from(df: u8) -> Self {
        match df {
            0 => Self::ShortAirSurveillance,
            4 => Self::AltitudeReply,
            5 => Self::IdentityReply,
            11 => Self::AllCallReply,
            16 => Self::LongAirSurveillance,
            17 => Self::ExtendedSquitter,
            18 => Self::ExtendedSquitterNonTransponder,
            19 => Self::MilitaryExtendedSquitter,
            20 => Self::CommBAltitude,
            21 => Self::CommBIdentity,
            _ => Self::Unknown,
        }
    }
}

impl DownlinkFormat {
    /// Whether the address-independent checksum applies to this format.
    ///
    /// DF11 and DF17 carry a plain parity remainder; replies to
    /// interrogations XOR it with the interrogator address instead.
    pub fn has_plain_parity(self) -> bool {
        matches!(self, Self::AllCallReply | Self::ExtendedSquitter)
    }
}
