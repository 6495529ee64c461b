//! Mode S preamble detection and frame extraction
//!
//! Mode S preamble pattern (at 2 MSPS = 0.5µs per sample):
//! Pulse at 0, 1, 3.5, 4.5 µs → samples 0, 2, 7, 9
//! Each pulse is 0.5µs = 1 sample wide
//!
//! Frame structure:
//! - Preamble: 8µs (16 samples)
//! - Data: 112 bits at 1µs per bit = 2 samples per bit

use tracing::{debug, trace};

use super::bits::{extract_bitvector, extract_bytearray};
use crate::adsb::crc::check_crc;
use crate::adsb::types::{ByteFrame, SAMPLES_PER_FRAME, SAMPLES_PER_PACKET, SAMPLES_PER_PREAMBLE};

/// Samples examined by the preamble tests (offsets 0..=14)
pub const PREAMBLE_WINDOW: usize = 15;

/// Checksum-valid long frame lifted from the sample stream
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub data: ByteFrame,
    /// Mean magnitude of the four preamble pulses
    pub signal_level: f32,
    /// Absolute sample offset of the preamble
    pub timestamp_samples: u64,
}

impl Frame {
    /// Get the Downlink Format (first 5 bits)
    pub fn df(&self) -> u8 {
        self.data[0] >> 3
    }

    /// Convert to hex string (like dump1090 output)
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.data)
    }
}

#[derive(Debug, Default, Clone)]
pub struct DetectorStats {
    pub samples_scanned: u64,
    pub preambles_detected: u64,
    pub frames_decoded: u64,
    pub crc_errors: u64,
}

/// First-stage test: ordering relations among the ten opening samples.
///
/// Spikes sit at 0, 2, 7 and 9; everything around them must be lower.
pub fn check_preamble_relations(s: &[f32]) -> bool {
    s[0] > s[1]
        && s[1] < s[2]
        && s[2] > s[3]
        && s[3] < s[0]
        && s[4] < s[0]
        && s[5] < s[0]
        && s[6] < s[0]
        && s[7] > s[8]
        && s[8] < s[9]
        && s[9] > s[6]
}

/// Second-stage test: quiet samples must sit below the spike level.
///
/// Samples 3, 6 and 10 border a spike and may carry leaked energy from a
/// phase-shifted pulse, so they are left out.
pub fn check_preamble_levels(s: &[f32]) -> bool {
    let high = (s[0] + s[2] + s[7] + s[9]) / 6.0;
    if s[4] >= high || s[5] >= high {
        return false;
    }

    s[11..PREAMBLE_WINDOW].iter().all(|&v| v < high)
}

/// Both preamble tests at `pos`
pub fn detect_preamble(mag: &[f32], pos: usize) -> bool {
    if pos + PREAMBLE_WINDOW > mag.len() {
        return false;
    }

    let window = &mag[pos..pos + PREAMBLE_WINDOW];
    check_preamble_relations(window) && check_preamble_levels(window)
}

/// Mode S detector - finds preambles and extracts frames
#[derive(Debug, Default)]
pub struct ModeS {
    pub stats: DetectorStats,
}

impl ModeS {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan candidate offsets `[start, limit)` of `mag`.
    ///
    /// Only offsets with a full packet of samples behind them are tested.
    /// After any candidate, valid or not, scanning resumes at the first
    /// sample past its packet. Returns the offset where scanning stopped,
    /// which may lie beyond `limit` when the last candidate's packet
    /// crosses it.
    pub fn scan(
        &mut self,
        mag: &[f32],
        start: usize,
        limit: usize,
        base_sample: u64,
        frames: &mut Vec<Frame>,
    ) -> usize {
        let Some(last) = mag.len().checked_sub(SAMPLES_PER_PACKET) else {
            return start;
        };
        let limit = limit.min(last + 1);

        let mut i = start;
        while i < limit {
            if !detect_preamble(mag, i) {
                i += 1;
                continue;
            }

            self.stats.preambles_detected += 1;
            if let Some(frame) = self.decode_frame(mag, i, base_sample) {
                trace!(
                    "Frame detected at sample {}: DF={} hex={}",
                    frame.timestamp_samples,
                    frame.df(),
                    frame.to_hex()
                );
                frames.push(frame);
            }
            i += SAMPLES_PER_PACKET;
        }

        self.stats.samples_scanned += limit.saturating_sub(start) as u64;
        i
    }

    /// Slice and checksum the frame behind a preamble candidate
    fn decode_frame(&mut self, mag: &[f32], pos: usize, base_sample: u64) -> Option<Frame> {
        let data_start = pos + SAMPLES_PER_PREAMBLE;
        let bits = extract_bitvector(&mag[data_start..data_start + SAMPLES_PER_FRAME]);
        let data = extract_bytearray(&bits);

        if !check_crc(&bits) {
            self.stats.crc_errors += 1;
            // Sample the log: noise produces a steady stream of these
            if self.stats.crc_errors <= 10 || self.stats.crc_errors % 1000 == 0 {
                debug!(
                    "CRC error #{}: DF={} hex={}",
                    self.stats.crc_errors,
                    data[0] >> 3,
                    hex::encode_upper(data)
                );
            }
            return None;
        }

        self.stats.frames_decoded += 1;
        let signal_level = (mag[pos] + mag[pos + 2] + mag[pos + 7] + mag[pos + 9]) / 4.0;

        Some(Frame {
            data,
            signal_level,
            timestamp_samples: base_sample + pos as u64,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adsb::crc::compute_parity;
    use crate::sdr::bits::tests::{modulate, PULSE};
    use crate::sdr::bits::unpack_bytearray;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Canonical preamble: spikes at 0, 2, 7, 9 over a flat floor
    pub(crate) fn preamble(floor: f32) -> Vec<f32> {
        let mut s = vec![floor; SAMPLES_PER_PREAMBLE];
        for i in [0, 2, 7, 9] {
            s[i] = PULSE;
        }
        s
    }

    /// Fill in the parity remainder so the frame checks out
    pub(crate) fn seal(header: &[u8; 11]) -> ByteFrame {
        let mut frame = [0u8; 14];
        frame[..11].copy_from_slice(header);
        let crc = compute_parity(&unpack_bytearray(&frame));
        frame[11] = (crc >> 16) as u8;
        frame[12] = (crc >> 8) as u8;
        frame[13] = crc as u8;
        frame
    }

    /// Preamble followed by the modulated frame
    pub(crate) fn packet(frame: &ByteFrame, floor: f32) -> Vec<f32> {
        let mut s = preamble(floor);
        s.extend(modulate(&unpack_bytearray(frame), floor));
        s
    }

    fn fixture() -> ByteFrame {
        let mut frame = [0u8; 14];
        frame.copy_from_slice(&hex::decode("8D4840D6202CC371C32CE0576098").unwrap());
        frame
    }

    #[test]
    fn test_canonical_preamble_passes() {
        let s = preamble(0.1);
        assert!(check_preamble_relations(&s));
        assert!(check_preamble_levels(&s));
        assert!(detect_preamble(&s, 0));
    }

    #[test]
    fn test_flat_signal_fails_relations() {
        let s = vec![0.5f32; SAMPLES_PER_PREAMBLE];
        assert!(!check_preamble_relations(&s));
    }

    #[test]
    fn test_raised_gap_fails_levels() {
        let mut s = preamble(0.1);
        // Still ordered below the spikes, but above 4/6 of a spike
        s[12] = 0.7;
        assert!(check_preamble_relations(&s));
        assert!(!check_preamble_levels(&s));

        let mut s = preamble(0.1);
        s[4] = 0.9;
        assert!(check_preamble_relations(&s));
        assert!(!check_preamble_levels(&s));
    }

    #[test]
    fn test_spike_neighbours_not_level_tested() {
        let mut s = preamble(0.1);
        s[10] = 0.9;
        assert!(check_preamble_levels(&s));
    }

    #[test]
    fn test_random_noise_rarely_matches() {
        let mut rng = ChaCha8Rng::seed_from_u64(1090);
        let noise: Vec<f32> = (0..100_000).map(|_| rng.gen::<f32>()).collect();

        let hits = (0..noise.len() - PREAMBLE_WINDOW)
            .filter(|&i| detect_preamble(&noise, i))
            .count();
        assert!(hits < noise.len() / 100, "{} noise offsets passed", hits);

        let mut detector = ModeS::new();
        let mut frames = Vec::new();
        detector.scan(&noise, 0, noise.len(), 0, &mut frames);
        assert!(frames.is_empty());
        assert_eq!(detector.stats.frames_decoded, 0);
        assert_eq!(detector.stats.crc_errors, detector.stats.preambles_detected);
    }

    #[test]
    fn test_scan_finds_frame() {
        let mut mag = vec![0.0f32; 100];
        mag.extend(packet(&fixture(), 0.0));
        mag.extend(vec![0.0f32; 100]);

        let mut detector = ModeS::new();
        let mut frames = Vec::new();
        let stop = detector.scan(&mag, 0, mag.len(), 5000, &mut frames);

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, fixture());
        assert_eq!(frames[0].timestamp_samples, 5100);
        assert_eq!(frames[0].df(), 17);
        assert_eq!(frames[0].to_hex(), "8D4840D6202CC371C32CE0576098");
        assert!((frames[0].signal_level - PULSE).abs() < f32::EPSILON);
        assert_eq!(detector.stats.preambles_detected, 1);
        assert_eq!(stop, 100 + SAMPLES_PER_PACKET);
        // Only offsets with a full packet behind them are scanned
        assert_eq!(detector.stats.samples_scanned, (mag.len() - SAMPLES_PER_PACKET + 1) as u64);
    }

    #[test]
    fn test_bad_checksum_skips_packet() {
        let mut frame = fixture();
        frame[5] ^= 0x10;

        let mut mag = packet(&frame, 0.0);
        mag.extend(vec![0.0f32; SAMPLES_PER_PACKET]);

        let mut detector = ModeS::new();
        let mut frames = Vec::new();
        detector.scan(&mag, 0, 1, 0, &mut frames);

        assert!(frames.is_empty());
        assert_eq!(detector.stats.crc_errors, 1);
        assert_eq!(detector.stats.preambles_detected, 1);
    }

    #[test]
    fn test_resume_after_packet() {
        let mut mag = packet(&fixture(), 0.0);
        mag.extend(packet(&seal(&[0x8D, 0xAB, 0xCD, 0xEF, 0x20, 0, 0, 0, 0, 0, 0]), 0.0));
        mag.extend(vec![0.0f32; 10]);

        let mut detector = ModeS::new();
        let mut frames = Vec::new();
        // Limit of 1: only the first candidate is in the window
        let stop = detector.scan(&mag, 0, 1, 0, &mut frames);
        assert_eq!(stop, SAMPLES_PER_PACKET);
        assert_eq!(frames.len(), 1);

        detector.scan(&mag, stop, mag.len(), 0, &mut frames);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].timestamp_samples, SAMPLES_PER_PACKET as u64);
    }

    #[test]
    fn test_short_buffer_is_not_scanned() {
        let mag = vec![0.0f32; SAMPLES_PER_PACKET - 1];
        let mut detector = ModeS::new();
        let mut frames = Vec::new();
        assert_eq!(detector.scan(&mag, 3, mag.len(), 0, &mut frames), 3);
        assert_eq!(detector.stats.samples_scanned, 0);
    }
}
