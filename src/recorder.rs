//! Record state machine: arm, countdown, take start and stop.
//!
//! Three threads touch a [`Recorder`]:
//!
//! - the control thread arms and stops takes,
//! - the audio callback ticks the countdown and streams blocks
//!   ([`Recorder::process_block`]),
//! - the capture disk thread opens the take's file and, on success, installs
//!   the handle and flips the state to `Recording`.
//!
//! When the countdown enters its start window the callback forwards an open
//! request that was fully built while arming, so the realtime path never
//! touches the filesystem or the allocator.

use crate::bridge::WriterBridge;
use crate::config::SamplerConfig;
use crate::events::SamplerEvent;
use crate::{Error, Result};
use autosampler_capture::{CaptureError, CaptureHandle, CaptureMetrics, CaptureWriter, OpenRequest};
use autosampler_core::{
    AtomicDouble, AtomicFlag, AtomicRecordState, AtomicRunState, AtomicU64, AtomicUsize, Countdown,
    Ordering, RecordState, RunState, SampleSlot, TimeStamps,
};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// State shared with the audio callback and the disk thread.
struct Shared {
    record_state: AtomicRecordState,
    run_state: AtomicRunState,
    countdown: Countdown,
    sample_rate: AtomicDouble,
    bridge: WriterBridge,
    /// Frames accepted by the writer in the current take.
    frames_recorded: AtomicU64,
    /// Incremented on every arm and stop; an open completing for an older
    /// take is discarded.
    take: AtomicU64,
    slot: AtomicUsize,
    pending_open: Mutex<Option<OpenRequest>>,
    open_unavailable: AtomicFlag,
    timestamps: Mutex<TimeStamps>,
    last_error: Mutex<Option<Arc<CaptureError>>>,
    events: Sender<SamplerEvent>,
}

impl Shared {
    fn emit(&self, event: SamplerEvent) {
        let _ = self.events.try_send(event);
    }

    /// Runs on the disk thread once the take's file is open.
    fn complete_open(
        &self,
        take: u64,
        result: autosampler_capture::Result<CaptureHandle>,
    ) -> Option<CaptureHandle> {
        let slot = self.slot.load(Ordering::Acquire);
        match result {
            Ok(handle) => {
                let path = handle.path().to_path_buf();
                let rejected = self.bridge.install(handle, || {
                    if self.take.load(Ordering::Acquire) != take {
                        return false;
                    }
                    if self
                        .record_state
                        .transition(RecordState::Armed, RecordState::Recording)
                        .is_err()
                    {
                        return false;
                    }
                    self.frames_recorded.store(0, Ordering::Release);
                    self.timestamps.lock().start();
                    true
                });
                if rejected.is_none() {
                    tracing::info!("Recording {}", path.display());
                    self.emit(SamplerEvent::RecordingStarted { slot, path });
                }
                rejected
            }
            Err(error) => {
                tracing::warn!("Take for slot {} not started: {}", slot, error);
                let error = Arc::new(error);
                if self.take.load(Ordering::Acquire) == take {
                    *self.last_error.lock() = Some(Arc::clone(&error));
                    self.emit(SamplerEvent::OpenFailed { slot, error });
                }
                None
            }
        }
    }
}

/// Arm/start/stop state machine plus the realtime write path.
pub struct Recorder {
    shared: Arc<Shared>,
    writer: CaptureWriter,
    events_rx: Receiver<SamplerEvent>,
    countdown_seconds: u8,
    start_window_seconds: f64,
}

impl Recorder {
    pub fn new(config: &SamplerConfig) -> Result<Self> {
        config.validate()?;
        let writer = CaptureWriter::new(config.capture)?;
        let (events_tx, events_rx) = crossbeam_channel::bounded(config.event_capacity.max(1));

        let shared = Arc::new(Shared {
            record_state: AtomicRecordState::default(),
            run_state: AtomicRunState::default(),
            countdown: Countdown::new(config.countdown_seconds),
            sample_rate: AtomicDouble::default(),
            bridge: WriterBridge::default(),
            frames_recorded: AtomicU64::new(0),
            take: AtomicU64::new(0),
            slot: AtomicUsize::new(0),
            pending_open: Mutex::new(None),
            open_unavailable: AtomicFlag::new(false),
            timestamps: Mutex::new(TimeStamps::new()),
            last_error: Mutex::new(None),
            events: events_tx,
        });

        Ok(Self {
            shared,
            writer,
            events_rx,
            countdown_seconds: config.countdown_seconds,
            start_window_seconds: config.start_window_seconds,
        })
    }

    /// Host sample rate. Must be set before arming.
    pub fn set_sample_rate(&self, sample_rate: f64) {
        self.shared.sample_rate.set(sample_rate);
    }

    pub fn sample_rate(&self) -> f64 {
        self.shared.sample_rate.get()
    }

    /// Begin the countdown for `slot`, recording to `<directory>/<slot>.wav`.
    ///
    /// Valid only while `Off`. Forces the run state to `Running`.
    pub fn arm(&self, slot: &SampleSlot, directory: &Path) -> Result<()> {
        let sample_rate = self.shared.sample_rate.get();
        if sample_rate <= 0.0 {
            return Err(Error::NoSampleRate);
        }
        if self.shared.record_state.get() != RecordState::Off {
            return Err(Error::AlreadyArmed);
        }

        let take = self.shared.take.fetch_add(1, Ordering::AcqRel) + 1;
        let path = directory.join(slot.file_name());
        let spec = self.writer.config().spec(sample_rate);
        let shared = Arc::clone(&self.shared);
        let request = self.writer.prepare_open(
            path,
            spec,
            Box::new(move |result: autosampler_capture::Result<CaptureHandle>| {
                shared.complete_open(take, result)
            }),
        );

        *self.shared.pending_open.lock() = Some(request);
        self.shared.open_unavailable.set(false);
        *self.shared.last_error.lock() = None;
        self.shared.timestamps.lock().clear();
        self.shared.frames_recorded.store(0, Ordering::Release);
        self.shared.slot.store(slot.index(), Ordering::Release);
        self.shared
            .countdown
            .arm(sample_rate, self.countdown_seconds, self.start_window_seconds);

        if let Err(state) = self
            .shared
            .record_state
            .transition(RecordState::Off, RecordState::Armed)
        {
            self.shared.pending_open.lock().take();
            tracing::debug!("Arm raced with state {:?}", state);
            return Err(Error::AlreadyArmed);
        }
        self.shared.run_state.set(RunState::Running);

        tracing::debug!("Armed slot {} at {} Hz", slot, sample_rate);
        self.shared.emit(SamplerEvent::Armed { slot: slot.index() });
        Ok(())
    }

    /// End the current countdown or take. No effect while `Off`.
    ///
    /// The writer is detached from the audio path before this returns; the
    /// file itself is finalized later by the disk thread. Returns whether
    /// anything was stopped.
    pub fn stop(&self) -> bool {
        if self.shared.record_state.get() == RecordState::Off {
            return false;
        }

        let handle = self.shared.bridge.retire(|| {
            self.shared.record_state.set(RecordState::Off);
            self.shared.run_state.set(RunState::Stopped);
            self.shared.take.fetch_add(1, Ordering::AcqRel);
        });

        self.shared.pending_open.lock().take();

        let was_recording = handle.is_some();
        if let Some(handle) = handle {
            self.writer.close(handle);
        }

        let frames = self.shared.frames_recorded.load(Ordering::Acquire);
        self.shared.timestamps.lock().push(frames);

        let slot = self.shared.slot.load(Ordering::Acquire);
        if was_recording {
            tracing::info!("Stopped slot {} after {} frames", slot, frames);
        } else {
            tracing::debug!("Disarmed slot {}", slot);
        }
        self.shared.emit(SamplerEvent::Stopped { slot, frames });
        true
    }

    /// Audio callback entry point. Realtime safe.
    ///
    /// Ticks the countdown while armed or recording, requests the take's file
    /// when the start window is reached, and forwards the block to the active
    /// writer while recording.
    #[inline]
    pub fn process_block(&self, channels: &[&[f32]]) {
        let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        if frames == 0 {
            return;
        }

        let shared = &*self.shared;
        if shared.record_state.get().is_active() {
            let sample_rate = shared.sample_rate.get();
            if let Some(tick) = shared.countdown.tick(frames, sample_rate) {
                if tick.entered_start_window && shared.record_state.get() == RecordState::Armed {
                    self.request_take();
                }
            }
        }

        // Counted under the bridge lock so stop() sees the final total.
        shared.bridge.try_write(
            channels,
            || shared.record_state.get() == RecordState::Recording,
            |written| {
                shared
                    .frames_recorded
                    .fetch_add(written as u64, Ordering::AcqRel);
            },
        );
    }

    /// Forward the prepared open to the disk thread.
    fn request_take(&self) {
        let Some(mut pending) = self.shared.pending_open.try_lock() else {
            return;
        };
        if let Some(request) = pending.take() {
            if let Err(request) = self.writer.request_open(request) {
                // Keep it so it is released on the control thread.
                *pending = Some(request);
                self.shared.open_unavailable.set(true);
            }
        }
    }

    pub fn record_state(&self) -> RecordState {
        self.shared.record_state.get()
    }

    pub fn run_state(&self) -> RunState {
        self.shared.run_state.get()
    }

    pub(crate) fn set_run_state(&self, state: RunState) {
        self.shared.run_state.set(state);
    }

    pub fn countdown(&self) -> &Countdown {
        &self.shared.countdown
    }

    /// Frames accepted by the writer during the current or last take.
    /// Frames dropped on ring overflow are not included.
    pub fn frames_recorded(&self) -> u64 {
        self.shared.frames_recorded.load(Ordering::Acquire)
    }

    pub fn writer_active(&self) -> bool {
        self.shared.bridge.is_present()
    }

    /// Start and stop marks of the current or last take.
    pub fn timestamps(&self) -> TimeStamps {
        self.shared.timestamps.lock().clone()
    }

    /// The most recent open failure of the current take.
    pub fn last_error(&self) -> Option<Arc<CaptureError>> {
        if self.shared.open_unavailable.get() {
            return Some(Arc::new(CaptureError::WriterUnavailable));
        }
        self.shared.last_error.lock().clone()
    }

    pub(crate) fn emit(&self, event: SamplerEvent) {
        self.shared.emit(event);
    }

    pub fn events(&self) -> Receiver<SamplerEvent> {
        self.events_rx.clone()
    }

    pub fn metrics(&self) -> Arc<CaptureMetrics> {
        self.writer.metrics()
    }

    /// Wait for the disk thread to finish everything queued so far.
    pub fn sync(&self, timeout: Duration) -> bool {
        self.writer.sync(timeout)
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.stop();
    }
}
