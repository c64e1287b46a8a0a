//! Per-sink metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics for a single render sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Total overlays written
    written_count: AtomicU64,
    /// Total write failures
    failure_count: AtomicU64,
    /// Total overlays dropped due to full queue
    dropped_count: AtomicU64,
    /// Frame index of the last successful write (controller/UI sync)
    last_frame_index: AtomicUsize,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current queue length
    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    /// Set current queue length
    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    /// Get total written count
    pub fn written_count(&self) -> u64 {
        self.written_count.load(Ordering::Relaxed)
    }

    /// Record a successful write of `frame_index`
    pub fn record_written(&self, frame_index: usize) {
        self.written_count.fetch_add(1, Ordering::Relaxed);
        self.last_frame_index.store(frame_index, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get dropped count
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Increment dropped count
    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Frame index of the last successful write
    pub fn last_frame_index(&self) -> usize {
        self.last_frame_index.load(Ordering::Relaxed)
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            written_count: self.written_count(),
            failure_count: self.failure_count(),
            dropped_count: self.dropped_count(),
            last_frame_index: self.last_frame_index(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub written_count: u64,
    pub failure_count: u64,
    pub dropped_count: u64,
    pub last_frame_index: usize,
}
