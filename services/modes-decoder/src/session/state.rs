//! Per-session message counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for the consumer side of a session
#[derive(Debug, Default)]
pub struct SessionStats {
    pub messages_received: AtomicU64,
    pub identifications: AtomicU64,
    pub unsupported: AtomicU64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_message(&self, decoded: bool) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
        if decoded {
            self.identifications.fetch_add(1, Ordering::Relaxed);
        } else {
            self.unsupported.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    pub fn get_identifications(&self) -> u64 {
        self.identifications.load(Ordering::Relaxed)
    }

    pub fn get_unsupported(&self) -> u64 {
        self.unsupported.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.messages_received.store(0, Ordering::Relaxed);
        self.identifications.store(0, Ordering::Relaxed);
        self.unsupported.store(0, Ordering::Relaxed);
    }
}
