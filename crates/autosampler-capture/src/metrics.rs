//! Disk thread statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the disk thread and capture handles.
#[derive(Debug, Default)]
pub struct CaptureMetrics {
    /// Files successfully opened
    opens: AtomicU64,
    /// Opens that failed
    open_failures: AtomicU64,
    /// Files finalized and closed
    finalized: AtomicU64,
    /// Frames encoded to disk
    frames_written: AtomicU64,
    /// Bytes of PCM encoded to disk
    bytes_written: AtomicU64,
    /// Write batches
    write_ops: AtomicU64,
    /// Frames lost to full ring buffers
    dropped_frames: AtomicU64,
}

impl CaptureMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_open(&self) {
        self.opens.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_open_failure(&self) {
        self.open_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_finalized(&self) {
        self.finalized.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_write(&self, frames: u64, bytes: u64) {
        self.frames_written.fetch_add(frames, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
        self.write_ops.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dropped(&self, frames: u64) {
        self.dropped_frames.fetch_add(frames, Ordering::Relaxed);
    }

    pub fn opens(&self) -> u64 {
        self.opens.load(Ordering::Relaxed)
    }

    pub fn open_failures(&self) -> u64 {
        self.open_failures.load(Ordering::Relaxed)
    }

    pub fn finalized(&self) -> u64 {
        self.finalized.load(Ordering::Relaxed)
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written.load(Ordering::Relaxed)
    }

    /// Take a snapshot of current metrics.
    pub fn snapshot(&self) -> CaptureMetricsSnapshot {
        CaptureMetricsSnapshot {
            opens: self.opens.load(Ordering::Relaxed),
            open_failures: self.open_failures.load(Ordering::Relaxed),
            finalized: self.finalized.load(Ordering::Relaxed),
            frames_written: self.frames_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_ops: self.write_ops.load(Ordering::Relaxed),
            dropped_frames: self.dropped_frames.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.opens.store(0, Ordering::Relaxed);
        self.open_failures.store(0, Ordering::Relaxed);
        self.finalized.store(0, Ordering::Relaxed);
        self.frames_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.write_ops.store(0, Ordering::Relaxed);
        self.dropped_frames.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of capture metrics at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureMetricsSnapshot {
    pub opens: u64,
    pub open_failures: u64,
    pub finalized: u64,
    pub frames_written: u64,
    pub bytes_written: u64,
    pub write_ops: u64,
    pub dropped_frames: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let metrics = CaptureMetrics::new();
        metrics.record_open();
        metrics.record_write(512, 512 * 6);
        metrics.record_write(512, 512 * 6);
        metrics.record_dropped(3);

        let snap = metrics.snapshot();
        assert_eq!(snap.opens, 1);
        assert_eq!(snap.frames_written, 1024);
        assert_eq!(snap.bytes_written, 1024 * 6);
        assert_eq!(snap.write_ops, 2);
        assert_eq!(snap.dropped_frames, 3);

        metrics.reset();
        assert_eq!(metrics.snapshot(), CaptureMetricsSnapshot::default());
    }
}
