//! Threshold-triggered sample buffering
//!
//! Samples accumulate until the buffer holds `BUFFER_THRESHOLD` samples
//! plus one packet of overlap. A decode pass then scans every offset
//! below the threshold, and the packet-length tail moves to the front so
//! a preamble straddling the boundary is still seen whole on the next pass.

use tracing::trace;

use super::detect::{DetectorStats, Frame, ModeS};
use crate::adsb::types::{BUFFER_SIZE, BUFFER_THRESHOLD};

pub struct SampleStream {
    buffer: Vec<f32>,
    detector: ModeS,
    /// Scan offset for the next pass, past any packet that crossed the threshold
    resume: usize,
    /// Absolute sample index of `buffer[0]`
    base_sample: u64,
    passes: u64,
}

impl SampleStream {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            detector: ModeS::new(),
            resume: 0,
            base_sample: 0,
            passes: 0,
        }
    }

    /// Append magnitude samples, running a decode pass each time the
    /// buffer fills. Returns the frames found by those passes.
    pub fn ingest(&mut self, mut samples: &[f32]) -> Vec<Frame> {
        let mut frames = Vec::new();

        while !samples.is_empty() {
            let room = BUFFER_SIZE - self.buffer.len();
            let take = room.min(samples.len());
            self.buffer.extend_from_slice(&samples[..take]);
            samples = &samples[take..];

            if self.buffer.len() == BUFFER_SIZE {
                self.decode_pass(&mut frames);
            }
        }

        frames
    }

    /// Scan whatever is buffered at end of input
    pub fn flush(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        let end = self.buffer.len();
        self.resume = self
            .detector
            .scan(&self.buffer, self.resume, end, self.base_sample, &mut frames);
        self.passes += 1;
        frames
    }

    fn decode_pass(&mut self, frames: &mut Vec<Frame>) {
        let found = frames.len();
        let stop = self.detector.scan(
            &self.buffer,
            self.resume,
            BUFFER_THRESHOLD,
            self.base_sample,
            frames,
        );
        self.passes += 1;

        trace!(
            "Decode pass {} at sample {}: {} frames",
            self.passes,
            self.base_sample,
            frames.len() - found
        );

        // Keep the unscanned tail; `stop` is at least the threshold
        self.buffer.copy_within(BUFFER_THRESHOLD.., 0);
        self.buffer.truncate(BUFFER_SIZE - BUFFER_THRESHOLD);
        self.resume = stop - BUFFER_THRESHOLD;
        self.base_sample += BUFFER_THRESHOLD as u64;
    }

    /// Samples currently buffered
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Decode passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn stats(&self) -> &DetectorStats {
        &self.detector.stats
    }
}

impl Default for SampleStream {
    fn default() -> Self {
        Self::new()
    }
}
