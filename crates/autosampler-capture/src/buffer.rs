//! Lock-free ring buffer between the audio callback and the disk thread.

use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapCons, HeapProd, HeapRb,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::MIN_RING_FRAMES;

/// Counters shared by both ends of a capture buffer.
#[derive(Debug, Default)]
pub(crate) struct CaptureBufferMeta {
    frames_captured: AtomicU64,
    frames_dropped: AtomicU64,
    frames_written: AtomicU64,
}

impl CaptureBufferMeta {
    pub(crate) fn frames_captured(&self) -> u64 {
        self.frames_captured.load(Ordering::Relaxed)
    }

    pub(crate) fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    pub(crate) fn frames_written(&self) -> u64 {
        self.frames_written.load(Ordering::Relaxed)
    }
}

/// Audio-thread side. Never blocks or allocates.
pub(crate) struct CaptureBufferProducer {
    prod: HeapProd<(f32, f32)>,
    meta: Arc<CaptureBufferMeta>,
}

impl CaptureBufferProducer {
    #[inline]
    pub(crate) fn write_space(&self) -> usize {
        self.prod.vacant_len()
    }

    /// Push as many frames as fit; the rest are counted as dropped.
    #[inline]
    pub(crate) fn write_frames(&mut self, frames: impl Iterator<Item = (f32, f32)>) -> usize {
        let mut written = 0usize;
        let mut dropped = 0u64;
        for frame in frames {
            if self.prod.try_push(frame).is_ok() {
                written += 1;
            } else {
                dropped += 1;
            }
        }
        self.meta
            .frames_captured
            .fetch_add(written as u64, Ordering::Relaxed);
        if dropped > 0 {
            self.meta.frames_dropped.fetch_add(dropped, Ordering::Relaxed);
        }
        written
    }

    pub(crate) fn meta(&self) -> &Arc<CaptureBufferMeta> {
        &self.meta
    }
}

/// Disk-thread side.
pub(crate) struct CaptureBufferConsumer {
    cons: HeapCons<(f32, f32)>,
    meta: Arc<CaptureBufferMeta>,
}

impl CaptureBufferConsumer {
    pub(crate) fn available(&self) -> usize {
        self.cons.occupied_len()
    }

    pub(crate) fn read_into(&mut self, buffer: &mut [(f32, f32)]) -> usize {
        self.cons.pop_slice(buffer)
    }

    pub(crate) fn add_frames_written(&self, count: u64) {
        self.meta.frames_written.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn meta(&self) -> &Arc<CaptureBufferMeta> {
        &self.meta
    }
}

/// Capture buffer factory.
pub(crate) struct CaptureBuffer;

impl CaptureBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> (CaptureBufferProducer, CaptureBufferConsumer) {
        let rb = HeapRb::<(f32, f32)>::new(capacity.max(MIN_RING_FRAMES));
        let (prod, cons) = rb.split();
        let meta = Arc::new(CaptureBufferMeta::default());

        (
            CaptureBufferProducer {
                prod,
                meta: Arc::clone(&meta),
            },
            CaptureBufferConsumer { cons, meta },
        )
    }
}
