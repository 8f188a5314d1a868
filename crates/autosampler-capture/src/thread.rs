//! Disk thread: the only place recorded audio touches the filesystem.

use crate::buffer::CaptureBuffer;
use crate::encode::{create_wav_file, ActiveCapture};
use crate::metrics::CaptureMetrics;
use crate::request::{CaptureId, DiskCommand, OpenRequest};
use crate::{CaptureConfig, CaptureHandle};
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thread_priority::ThreadPriority;

/// Frames encoded per scratch pass.
const SCRATCH_FRAMES: usize = 8192;

/// Long-lived disk writer thread. Started once, joined on drop.
pub(crate) struct DiskThread {
    handle: Option<JoinHandle<()>>,
}

impl DiskThread {
    pub(crate) fn spawn(
        rx: Receiver<DiskCommand>,
        metrics: Arc<CaptureMetrics>,
        config: CaptureConfig,
    ) -> std::io::Result<Self> {
        let handle = thread::Builder::new()
            .name("autosampler-disk".into())
            .spawn(move || {
                let _ = thread_priority::set_current_thread_priority(ThreadPriority::Max);
                disk_loop(rx, metrics, config);
            })?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Capture disk thread panicked");
            }
        }
    }
}

impl Drop for DiskThread {
    fn drop(&mut self) {
        self.join();
    }
}

struct DiskState {
    captures: HashMap<CaptureId, ActiveCapture>,
    metrics: Arc<CaptureMetrics>,
    scratch: Vec<(f32, f32)>,
    flush_threshold: usize,
}

impl DiskState {
    fn flush_all(&mut self, force: bool) {
        for capture in self.captures.values_mut() {
            if force || capture.consumer.available() >= self.flush_threshold {
                capture.flush(&self.metrics, &mut self.scratch, usize::MAX);
            }
        }
    }

    fn close(&mut self, id: CaptureId) {
        if let Some(capture) = self.captures.remove(&id) {
            capture.finalize(&self.metrics, &mut self.scratch);
        }
    }

    fn close_all(&mut self) {
        let ids: Vec<CaptureId> = self.captures.keys().copied().collect();
        for id in ids {
            self.close(id);
        }
    }

    fn open(&mut self, request: OpenRequest) {
        let OpenRequest {
            path,
            spec,
            ring_frames,
            on_complete,
        } = request;

        let result = create_wav_file(&path, &spec).map(|file| {
            let id = CaptureId::generate();
            let (producer, consumer) = CaptureBuffer::with_capacity(ring_frames);
            self.captures.insert(
                id,
                ActiveCapture {
                    consumer,
                    file,
                    spec,
                    path: path.clone(),
                    failed: false,
                },
            );
            CaptureHandle::new(id, producer, spec, path.clone())
        });

        match &result {
            Ok(handle) => {
                self.metrics.record_open();
                tracing::info!("Opened {} ({:?})", handle.path().display(), spec);
            }
            Err(e) => {
                self.metrics.record_open_failure();
                tracing::warn!("Open failed: {}", e);
            }
        }

        if let Some(rejected) = on_complete(result) {
            tracing::debug!("Capture {:?} abandoned before it started", rejected.id());
            let id = rejected.id();
            drop(rejected);
            self.close(id);
        }
    }

    /// Returns false when the loop should exit.
    fn handle(&mut self, cmd: DiskCommand) -> bool {
        match cmd {
            DiskCommand::Register {
                id,
                consumer,
                file,
                path,
                spec,
            } => {
                self.captures.insert(
                    id,
                    ActiveCapture {
                        consumer,
                        file,
                        spec,
                        path,
                        failed: false,
                    },
                );
            }
            DiskCommand::Open(request) => self.open(request),
            DiskCommand::Close(id) => self.close(id),
            DiskCommand::Sync(reply) => {
                self.flush_all(true);
                let _ = reply.send(());
            }
            DiskCommand::Shutdown => return false,
        }
        true
    }
}

fn disk_loop(rx: Receiver<DiskCommand>, metrics: Arc<CaptureMetrics>, config: CaptureConfig) {
    let mut state = DiskState {
        captures: HashMap::new(),
        metrics,
        scratch: vec![(0.0, 0.0); SCRATCH_FRAMES],
        flush_threshold: config.flush_threshold.max(1),
    };

    tracing::debug!("Capture disk thread started");

    'outer: loop {
        match rx.recv_timeout(config.idle_poll) {
            Ok(cmd) => {
                if !state.handle(cmd) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        loop {
            match rx.try_recv() {
                Ok(cmd) => {
                    if !state.handle(cmd) {
                        break 'outer;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'outer,
            }
        }

        state.flush_all(false);
    }

    state.close_all();
    tracing::debug!("Capture disk thread stopped");
}
