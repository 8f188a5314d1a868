//! Commands sent to the disk thread.

use crate::buffer::CaptureBufferConsumer;
use crate::encode::WavFile;
use crate::{CaptureError, CaptureHandle, CaptureSpec};
use crossbeam_channel::Sender;
use std::path::PathBuf;

/// Unique identifier for a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureId(pub u64);

impl CaptureId {
    /// Generate a new unique capture ID.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Runs on the disk thread with the outcome of an [`OpenRequest`].
///
/// Returning the handle hands it back to the disk thread, which closes it
/// straight away (the take was abandoned while the file was being opened).
pub type OpenCompletion =
    Box<dyn FnOnce(Result<CaptureHandle, CaptureError>) -> Option<CaptureHandle> + Send>;

/// A deferred `open`, built off the audio thread and forwarded to the disk
/// thread without allocating.
pub struct OpenRequest {
    pub(crate) path: PathBuf,
    pub(crate) spec: CaptureSpec,
    pub(crate) ring_frames: usize,
    pub(crate) on_complete: OpenCompletion,
}

impl OpenRequest {
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn spec(&self) -> CaptureSpec {
        self.spec
    }
}

impl std::fmt::Debug for OpenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRequest")
            .field("path", &self.path)
            .field("spec", &self.spec)
            .field("ring_frames", &self.ring_frames)
            .finish()
    }
}

/// Command sent to the disk thread.
pub(crate) enum DiskCommand {
    /// Take over a capture whose file was opened on the caller's thread.
    Register {
        id: CaptureId,
        consumer: CaptureBufferConsumer,
        file: WavFile,
        path: PathBuf,
        spec: CaptureSpec,
    },
    /// Open a file on the disk thread and report back through the completion.
    Open(OpenRequest),
    /// Drain, finalize and close a capture.
    Close(CaptureId),
    /// Reply once every command queued before this one has been handled.
    Sync(Sender<()>),
    Shutdown,
}

impl std::fmt::Debug for DiskCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiskCommand::Register { id, path, spec, .. } => f
                .debug_struct("Register")
                .field("id", id)
                .field("path", path)
                .field("spec", spec)
                .finish(),
            DiskCommand::Open(req) => f.debug_tuple("Open").field(req).finish(),
            DiskCommand::Close(id) => f.debug_tuple("Close").field(id).finish(),
            DiskCommand::Sync(_) => write!(f, "Sync"),
            DiskCommand::Shutdown => write!(f, "Shutdown"),
        }
    }
}
