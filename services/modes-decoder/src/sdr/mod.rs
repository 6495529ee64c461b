//! Sample-side Mode S demodulation
//!
//! This module provides dump1090-style decoding:
//! 1. Read samples (cu8 IQ or f32 magnitudes) at 2 MSPS
//! 2. Convert IQ to magnitude (sqrt(I² + Q²))
//! 3. Detect Mode S preambles
//! 4. Slice 112-bit frames and verify the parity checksum

pub mod bits;
pub mod capture;
pub mod demod;
pub mod detect;
pub mod source;
pub mod stream;

pub use capture::{CaptureStats, SampleCapture};
pub use demod::MagnitudeTable;
pub use detect::{detect_preamble, DetectorStats, Frame, ModeS};
pub use source::{MagnitudeReader, SampleFormat, SampleSource};
pub use stream::SampleStream;
