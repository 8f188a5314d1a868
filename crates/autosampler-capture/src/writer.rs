//! Public capture writer: owns the disk thread and hands out capture handles.

use crate::buffer::CaptureBuffer;
use crate::encode::create_wav_file;
use crate::metrics::CaptureMetrics;
use crate::request::{CaptureId, DiskCommand, OpenCompletion, OpenRequest};
use crate::thread::DiskThread;
use crate::{CaptureConfig, CaptureError, CaptureHandle, CaptureSpec, Result};
use crossbeam_channel::{bounded, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Streams captures to WAV files through a single background disk thread.
///
/// The thread is started in [`CaptureWriter::new`] and lives until the writer
/// is dropped, so individual takes never pay thread start-up cost.
pub struct CaptureWriter {
    command_tx: Sender<DiskCommand>,
    disk: DiskThread,
    metrics: Arc<CaptureMetrics>,
    config: CaptureConfig,
}

impl CaptureWriter {
    pub fn new(config: CaptureConfig) -> Result<Self> {
        let (tx, rx) = bounded(config.command_capacity.max(1));
        let metrics = Arc::new(CaptureMetrics::new());
        let disk = DiskThread::spawn(rx, Arc::clone(&metrics), config)?;

        Ok(Self {
            command_tx: tx,
            disk,
            metrics,
            config,
        })
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Open `path` for writing on the calling thread.
    ///
    /// Any existing file at `path` is deleted first. Not realtime safe; use
    /// [`prepare_open`](Self::prepare_open) and
    /// [`request_open`](Self::request_open) from the audio thread.
    pub fn open(&self, path: impl AsRef<Path>, spec: CaptureSpec) -> Result<CaptureHandle> {
        let path = path.as_ref().to_path_buf();
        let file = match create_wav_file(&path, &spec) {
            Ok(file) => file,
            Err(e) => {
                self.metrics.record_open_failure();
                return Err(e);
            }
        };

        let id = CaptureId::generate();
        let (producer, consumer) =
            CaptureBuffer::with_capacity(self.config.ring_frames(spec.sample_rate));

        self.command_tx
            .send(DiskCommand::Register {
                id,
                consumer,
                file,
                path: path.clone(),
                spec,
            })
            .map_err(|_| CaptureError::WriterUnavailable)?;

        self.metrics.record_open();
        tracing::info!("Opened {} ({:?})", path.display(), spec);

        Ok(CaptureHandle::new(id, producer, spec, path))
    }

    /// Build an open request to be forwarded later with
    /// [`request_open`](Self::request_open). Allocates; call off the audio thread.
    pub fn prepare_open(
        &self,
        path: impl Into<PathBuf>,
        spec: CaptureSpec,
        on_complete: OpenCompletion,
    ) -> OpenRequest {
        OpenRequest {
            path: path.into(),
            spec,
            ring_frames: self.config.ring_frames(spec.sample_rate),
            on_complete,
        }
    }

    /// Hand a prepared open to the disk thread without blocking.
    ///
    /// Realtime safe. The request is returned if the queue is full or the
    /// disk thread is gone.
    #[inline]
    pub fn request_open(&self, request: OpenRequest) -> std::result::Result<(), OpenRequest> {
        self.command_tx
            .try_send(DiskCommand::Open(request))
            .map_err(|e| match e.into_inner() {
                DiskCommand::Open(request) => request,
                _ => unreachable!("try_send hands back the command it was given"),
            })
    }

    /// Stop accepting writes for `handle` and have the disk thread drain and
    /// finalize its file. Returns before the file is finalized.
    pub fn close(&self, handle: CaptureHandle) {
        let id = handle.id();
        drop(handle);
        if self.command_tx.send(DiskCommand::Close(id)).is_err() {
            tracing::warn!("Disk thread gone; capture {:?} not finalized", id);
        }
    }

    /// Block until every command queued so far, including closes, has been
    /// processed. Returns false on timeout.
    pub fn sync(&self, timeout: Duration) -> bool {
        let (reply_tx, reply_rx) = bounded(1);
        if self
            .command_tx
            .send_timeout(DiskCommand::Sync(reply_tx), timeout)
            .is_err()
        {
            return false;
        }
        reply_rx.recv_timeout(timeout).is_ok()
    }

    pub fn metrics(&self) -> Arc<CaptureMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Finalize every open capture and stop the disk thread.
    pub fn shutdown(&mut self) {
        let _ = self.command_tx.send(DiskCommand::Shutdown);
        self.disk.join();
    }
}

impl Drop for CaptureWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
