//! Parity-table checksum for 112-bit Mode S frames
//!
//! Every data bit owns a 24-bit table entry; the checksum is the XOR of
//! the entries for all set bits, compared against the 24-bit remainder
//! carried in the last 24 bits of the frame. Only the address-independent
//! form (DF11/DF17) is handled here.

use super::types::{BitVector, BITS_PER_FRAME};

/// Bits at the end of the frame holding the parity remainder
pub const PARITY_BITS: usize = 24;

/// Bits covered by the parity table
pub const DATA_BITS: usize = BITS_PER_FRAME - PARITY_BITS;

const PARITY_MASK: u32 = 0x00FF_FFFF;

/// Parity table for 112-bit frames, one entry per data bit.
/// The last 24 entries are zero so the remainder never feeds itself.
pub const PARITY_TABLE: [u32; BITS_PER_FRAME] = [
    0x3935ea, 0x1c9af5, 0xf1b77e, 0x78dbbf, 0xc397db, 0x9e31e9, 0xb0e2f0, 0x587178,
    0x2c38bc, 0x161c5e, 0x0b0e2f, 0xfa7d13, 0x82c48d, 0xbe9842, 0x5f4c21, 0xd05c14,
    0x682e0a, 0x341705, 0xe5f186, 0x72f8c3, 0xc68665, 0x9cb936, 0x4e5c9b, 0xd8d449,
    0x939020, 0x49c810, 0x24e408, 0x127204, 0x093902, 0x049c81, 0xfdb444, 0x7eda22,
    0x3f6d11, 0xe04c8c, 0x702646, 0x381323, 0xe3f395, 0x8e03ce, 0x4701e7, 0xdc7af7,
    0x91c77f, 0xb719bb, 0xa476d9, 0xadc168, 0x56e0b4, 0x2b705a, 0x15b82d, 0xf52612,
    0x7a9309, 0xc2b380, 0x6159c0, 0x30ace0, 0x185670, 0x0c2b38, 0x06159c, 0x030ace,
    0x018567, 0xff38b7, 0x80665f, 0xbfc92b, 0xa01e91, 0xaff54c, 0x57faa6, 0x2bfd53,
    0xea04ad, 0x8af852, 0x457c29, 0xdd4410, 0x6ea208, 0x375104, 0x1ba882, 0x0dd441,
    0xf91024, 0x7c8812, 0x3e4409, 0xe0d800, 0x706c00, 0x383600, 0x1c1b00, 0x0e0d80,
    0x0706c0, 0x038360, 0x01c1b0, 0x00e0d8, 0x00706c, 0x003836, 0x001c1b, 0xfff409,
    0x000000, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000,
    0x000000, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000,
    0x000000, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000,
];

/// XOR of the table entries for every set bit in the data section
pub fn compute_parity(bits: &BitVector) -> u32 {
    bits[..DATA_BITS]
        .iter()
        .zip(PARITY_TABLE.iter())
        .filter(|&(&bit, _)| bit)
        .fold(0u32, |crc, (_, &entry)| crc ^ entry)
}

/// Parity remainder carried in the last 24 bits, MSB first
pub fn remainder(bits: &BitVector) -> u32 {
    bits[DATA_BITS..]
        .iter()
        .fold(0u32, |acc, &bit| (acc << 1) | bit as u32)
}

/// Compute the frame checksum; zero means the frame is intact
pub fn compute_checksum(bits: &BitVector) -> u32 {
    (compute_parity(bits) ^ remainder(bits)) & PARITY_MASK
}

/// Check a frame against its embedded remainder
pub fn check_crc(bits: &BitVector) -> bool {
    compute_checksum(bits) == 0
}
