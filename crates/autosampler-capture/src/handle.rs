//! Producer-side handle used by the audio callback.

use crate::buffer::CaptureBufferProducer;
use crate::{CaptureId, CaptureSpec};
use std::path::{Path, PathBuf};

/// Live handle to an open capture.
///
/// Owned by whoever feeds audio; writes go into a lock-free ring buffer that
/// the disk thread drains. Pass the handle to
/// [`CaptureWriter::close`](crate::CaptureWriter::close) to finalize the file;
/// once moved there no further writes are possible.
pub struct CaptureHandle {
    id: CaptureId,
    producer: CaptureBufferProducer,
    spec: CaptureSpec,
    path: PathBuf,
}

impl CaptureHandle {
    pub(crate) fn new(
        id: CaptureId,
        producer: CaptureBufferProducer,
        spec: CaptureSpec,
        path: PathBuf,
    ) -> Self {
        Self {
            id,
            producer,
            spec,
            path,
        }
    }

    pub fn id(&self) -> CaptureId {
        self.id
    }

    pub fn spec(&self) -> CaptureSpec {
        self.spec
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Enqueue one block of per-channel audio.
    ///
    /// A mono block is duplicated to both sides; channels beyond the second
    /// are ignored. The block length is that of the shortest channel. Frames
    /// that do not fit in the ring buffer are dropped and counted.
    ///
    /// Realtime safe: no locks, no allocation. Returns frames accepted.
    #[inline]
    pub fn write(&mut self, channels: &[&[f32]]) -> usize {
        match channels {
            [] => 0,
            [mono] => self.producer.write_frames(mono.iter().map(|&s| (s, s))),
            [left, right, ..] => self
                .producer
                .write_frames(left.iter().zip(right.iter()).map(|(&l, &r)| (l, r))),
        }
    }

    /// Enqueue interleaved stereo frames.
    #[inline]
    pub fn write_frames(&mut self, frames: &[(f32, f32)]) -> usize {
        self.producer.write_frames(frames.iter().copied())
    }

    /// Frames accepted into the ring buffer so far.
    pub fn frames_captured(&self) -> u64 {
        self.producer.meta().frames_captured()
    }

    /// Frames already encoded to disk.
    pub fn frames_written(&self) -> u64 {
        self.producer.meta().frames_written()
    }

    pub fn frames_dropped(&self) -> u64 {
        self.producer.meta().frames_dropped()
    }

    pub fn write_space(&self) -> usize {
        self.producer.write_space()
    }
}

impl std::fmt::Debug for CaptureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureHandle")
            .field("id", &self.id)
            .field("spec", &self.spec)
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CaptureBuffer;

    fn handle() -> (CaptureHandle, crate::buffer::CaptureBufferConsumer) {
        let (prod, cons) = CaptureBuffer::with_capacity(0);
        let handle = CaptureHandle::new(
            CaptureId::generate(),
            prod,
            CaptureSpec::stereo_24(48000),
            PathBuf::from("test.wav"),
        );
        (handle, cons)
    }

    #[test]
    fn test_stereo_block() {
        let (mut handle, mut cons) = handle();
        let left = [0.1f32, 0.2, 0.3];
        let right = [-0.1f32, -0.2, -0.3];
        assert_eq!(handle.write(&[&left, &right]), 3);

        let mut out = [(0.0, 0.0); 3];
        cons.read_into(&mut out);
        assert_eq!(out[1], (0.2, -0.2));
        assert_eq!(handle.frames_captured(), 3);
    }

    #[test]
    fn test_mono_block_is_duplicated() {
        let (mut handle, mut cons) = handle();
        assert_eq!(handle.write(&[&[0.5, 0.25]]), 2);
        let mut out = [(0.0, 0.0); 2];
        cons.read_into(&mut out);
        assert_eq!(out, [(0.5, 0.5), (0.25, 0.25)]);
    }

    #[test]
    fn test_extra_channels_ignored() {
        let (mut handle, mut cons) = handle();
        let a = [1.0f32; 4];
        let b = [0.5f32; 4];
        let c = [0.25f32; 4];
        assert_eq!(handle.write(&[&a, &b, &c]), 4);
        let mut out = [(0.0, 0.0); 4];
        cons.read_into(&mut out);
        assert!(out.iter().all(|&frame| frame == (1.0, 0.5)));
    }

    #[test]
    fn test_empty_block() {
        let (mut handle, _cons) = handle();
        assert_eq!(handle.write(&[]), 0);
    }
}
