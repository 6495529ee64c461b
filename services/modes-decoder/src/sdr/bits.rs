//! Pulse-position bit slicing and byte packing

use crate::adsb::types::{BitVector, ByteFrame, BITS_PER_FRAME, BYTES_PER_FRAME, SAMPLES_PER_BIT};

/// Slice 224 magnitude samples into 112 bits.
///
/// Each bit period is two samples: energy in the first half is a 1,
/// energy in the second half is a 0. Ties resolve to 0.
pub fn extract_bitvector(samples: &[f32]) -> BitVector {
    debug_assert!(samples.len() >= BITS_PER_FRAME * SAMPLES_PER_BIT);

    let mut bits = [false; BITS_PER_FRAME];
    for (bit, pair) in bits.iter_mut().zip(samples.chunks_exact(SAMPLES_PER_BIT)) {
        *bit = pair[0] > pair[1];
    }
    bits
}

/// Pack bits MSB-first, eight per byte
pub fn extract_bytearray(bits: &BitVector) -> ByteFrame {
    let mut bytes = [0u8; BYTES_PER_FRAME];
    for (byte, octet) in bytes.iter_mut().zip(bits.chunks_exact(8)) {
        *byte = octet.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8);
    }
    bytes
}

/// Inverse of [`extract_bytearray`]
pub fn unpack_bytearray(bytes: &ByteFrame) -> BitVector {
    let mut bits = [false; BITS_PER_FRAME];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (bytes[i / 8] >> (7 - i % 8)) & 1 == 1;
    }
    bits
}
