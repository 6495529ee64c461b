//! Bounded frame queue between the decoder thread and the consumer

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::adsb::types::ByteFrame;

/// Default cap on queued frames
pub const DEFAULT_QUEUE_CAPACITY: usize = 1_000_000;

/// FIFO of checksum-valid frames.
///
/// When full, newly offered frames are discarded; queued frames are kept.
#[derive(Debug)]
pub struct FrameQueue {
    inner: Mutex<VecDeque<ByteFrame>>,
    capacity: usize,
}

impl FrameQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// A panic while holding the lock cannot leave the deque half-updated,
    /// so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ByteFrame>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a frame; returns false if it was dropped
    pub fn push(&self, frame: ByteFrame) -> bool {
        let mut queue = self.lock();
        if queue.len() >= self.capacity {
            return false;
        }
        queue.push_back(frame);
        true
    }

    /// Take every queued frame, oldest first
    pub fn drain(&self) -> Vec<ByteFrame> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}
