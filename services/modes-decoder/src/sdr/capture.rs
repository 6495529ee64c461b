//! Sample capture threads
//!
//! A reader thread pulls raw bytes from the sample source and converts
//! them to magnitudes, handing chunks to the decoder thread over a bounded
//! channel. The decoder thread runs the sample stream and pushes every
//! checksum-valid frame into the shared frame queue.

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fmt;
use std::io::Read;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::detect::{DetectorStats, Frame};
use super::source::{MagnitudeReader, SampleFormat, SampleSource};
use super::stream::SampleStream;
use crate::session::queue::FrameQueue;

/// Magnitude chunks in flight between reader and decoder
const CHUNK_CHANNEL_DEPTH: usize = 16;

/// Period of the decoder thread's stats log
const STATS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Statistics for sample capture (atomic for thread-safe access)
#[derive(Debug, Default)]
pub struct CaptureStats {
    pub samples_read: AtomicU64,
    pub samples_scanned: AtomicU64,
    pub decode_passes: AtomicU64,
    pub preambles_detected: AtomicU64,
    pub frames_decoded: AtomicU64,
    pub crc_errors: AtomicU64,
    pub frames_dropped: AtomicU64,
}

impl CaptureStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record_detector(&self, detector: &DetectorStats, passes: u64) {
        self.decode_passes.store(passes, Ordering::Relaxed);
        self.samples_scanned
            .store(detector.samples_scanned, Ordering::Relaxed);
        self.preambles_detected
            .store(detector.preambles_detected, Ordering::Relaxed);
        self.frames_decoded
            .store(detector.frames_decoded, Ordering::Relaxed);
        self.crc_errors.store(detector.crc_errors, Ordering::Relaxed);
    }
}

impl fmt::Display for CaptureStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Samples: {} (scanned: {}) | Passes: {} | Preambles: {} | Frames: {} | CRC errors: {} | Dropped: {}",
            self.samples_read.load(Ordering::Relaxed),
            self.samples_scanned.load(Ordering::Relaxed),
            self.decode_passes.load(Ordering::Relaxed),
            self.preambles_detected.load(Ordering::Relaxed),
            self.frames_decoded.load(Ordering::Relaxed),
            self.crc_errors.load(Ordering::Relaxed),
            self.frames_dropped.load(Ordering::Relaxed)
        )
    }
}

/// Capture controller owning the reader and decoder threads
pub struct SampleCapture {
    queue: Arc<FrameQueue>,
    running: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    stats: Arc<CaptureStats>,
}

impl SampleCapture {
    pub fn new(queue: Arc<FrameQueue>) -> Self {
        Self {
            queue,
            running: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
            stats: CaptureStats::new(),
        }
    }

    /// Open `source` and start decoding it
    pub fn start(&self, source: &SampleSource, format: SampleFormat) -> Result<()> {
        info!("Opening sample source {} ({})", source, format);
        let input = source
            .open()
            .with_context(|| format!("Failed to open sample source {}", source))?;
        self.start_reader(input, format)
    }

    /// Start decoding an already-open byte stream
    pub fn start_reader(&self, input: Box<dyn Read + Send>, format: SampleFormat) -> Result<()> {
        let (chunk_tx, chunk_rx) = bounded::<Vec<f32>>(CHUNK_CHANNEL_DEPTH);

        self.running.store(true, Ordering::SeqCst);
        self.finished.store(false, Ordering::SeqCst);

        let running = self.running.clone();
        let stats = self.stats.clone();
        thread::Builder::new()
            .name("sample-reader".to_string())
            .spawn(move || {
                if let Err(e) = run_reader(input, format, running, stats, chunk_tx) {
                    error!("Sample reader error: {:#}", e);
                }
            })
            .context("Failed to spawn reader thread")?;

        let running = self.running.clone();
        let finished = self.finished.clone();
        let stats = self.stats.clone();
        let queue = self.queue.clone();
        thread::Builder::new()
            .name("modes-decoder".to_string())
            .spawn(move || {
                run_decoder(running, stats, queue, chunk_rx);
                finished.store(true, Ordering::SeqCst);
            })
            .context("Failed to spawn decoder thread")?;

        Ok(())
    }

    /// Stop capturing
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Stopping sample capture...");
        }
    }

    /// Check if running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Decoder thread has flushed its last frame
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Get statistics
    pub fn stats(&self) -> &Arc<CaptureStats> {
        &self.stats
    }

    pub fn queue(&self) -> &Arc<FrameQueue> {
        &self.queue
    }
}

impl Drop for SampleCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read loop (runs in dedicated thread)
fn run_reader(
    input: Box<dyn Read + Send>,
    format: SampleFormat,
    running: Arc<AtomicBool>,
    stats: Arc<CaptureStats>,
    chunk_tx: Sender<Vec<f32>>,
) -> Result<()> {
    let mut reader = MagnitudeReader::new(input, format);
    let mut first_data = true;

    while running.load(Ordering::SeqCst) {
        let Some(chunk) = reader.next_chunk().context("Error reading samples")? else {
            info!("Sample source exhausted (EOF)");
            break;
        };

        if first_data {
            info!("First samples received! ({} samples)", chunk.len());
            first_data = false;
        }
        stats
            .samples_read
            .fetch_add(chunk.len() as u64, Ordering::Relaxed);

        if chunk_tx.send(chunk).is_err() {
            warn!("Decoder thread gone, stopping reader");
            break;
        }
    }

    Ok(())
}

/// Decode loop (runs in dedicated thread); ends when the reader hangs up
fn run_decoder(
    running: Arc<AtomicBool>,
    stats: Arc<CaptureStats>,
    queue: Arc<FrameQueue>,
    chunk_rx: Receiver<Vec<f32>>,
) {
    let mut stream = SampleStream::new();
    let mut last_stats_time = Instant::now();

    for chunk in chunk_rx.iter() {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let frames = stream.ingest(&chunk);
        enqueue(&queue, &stats, frames);
        stats.record_detector(stream.stats(), stream.passes());

        if last_stats_time.elapsed() >= STATS_LOG_INTERVAL {
            info!("[Decoder Stats] {}", stats);
            last_stats_time = Instant::now();
        }
    }

    let frames = stream.flush();
    enqueue(&queue, &stats, frames);
    stats.record_detector(stream.stats(), stream.passes());

    info!("Sample decoding stopped");
    info!("Final stats: {}", stats);
}

fn enqueue(queue: &FrameQueue, stats: &CaptureStats, frames: Vec<Frame>) {
    for frame in frames {
        if !queue.push(frame.data) {
            let dropped = stats.frames_dropped.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(
                "Frame queue full ({}), dropping frame #{}: {}",
                queue.capacity(),
                dropped,
                frame.to_hex()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdr::detect::tests::{packet, seal};
    use std::io::Cursor;

    fn f32_bytes(samples: &[f32]) -> Box<dyn Read + Send> {
        let bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_le_bytes()).collect();
        Box::new(Cursor::new(bytes))
    }

    fn wait_finished(capture: &SampleCapture) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !capture.is_finished() {
            assert!(Instant::now() < deadline, "decoder did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn recording(icaos: &[u32]) -> Vec<f32> {
        let mut samples = vec![0.0f32; 300];
        for &icao in icaos {
            let frame = seal(&[
                0x8D,
                (icao >> 16) as u8,
                (icao >> 8) as u8,
                icao as u8,
                0x58,
                0xC3,
                0x82,
                0xD6,
                0x90,
                0xC8,
                0xAC,
            ]);
            samples.extend(packet(&frame, 0.0));
            samples.extend(vec![0.0f32; 50]);
        }
        samples.extend(vec![0.0f32; 300]);
        samples
    }

    #[test]
    fn test_capture_decodes_recording() {
        let queue = Arc::new(FrameQueue::new(16));
        let capture = SampleCapture::new(queue.clone());
        let samples = recording(&[0x100001, 0x100002, 0x100003]);

        capture
            .start_reader(f32_bytes(&samples), SampleFormat::F32)
            .unwrap();
        wait_finished(&capture);

        let frames = queue.drain();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2][3], 0x03);

        let stats = capture.stats();
        assert_eq!(stats.samples_read.load(Ordering::Relaxed), samples.len() as u64);
        assert_eq!(stats.frames_decoded.load(Ordering::Relaxed), 3);
        assert_eq!(stats.frames_dropped.load(Ordering::Relaxed), 0);
        assert_eq!(stats.decode_passes.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_capture_counts_queue_drops() {
        let queue = Arc::new(FrameQueue::new(1));
        let capture = SampleCapture::new(queue.clone());

        capture
            .start_reader(f32_bytes(&recording(&[0x1, 0x2, 0x3])), SampleFormat::F32)
            .unwrap();
        wait_finished(&capture);

        let frames = queue.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0][3], 0x01);
        assert_eq!(capture.stats().frames_dropped.load(Ordering::Relaxed), 2);
    }
}
