//! AutoSampler: the host-facing object tying the pieces together.

use crate::config::SamplerConfig;
use crate::events::{SamplerEvent, SamplerSnapshot};
use crate::recorder::Recorder;
use crate::sequencer::RunSequencer;
use crate::Result;
use autosampler_capture::{CaptureError, CaptureMetrics};
use autosampler_core::{RecordState, RunState, SampleSlot, TimeStamps};
use crossbeam_channel::Receiver;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Automated multi-sample recorder.
///
/// Driven by two narrow entry points: [`process_block`](Self::process_block)
/// from the audio callback, and the session actions (`start`, `pause`,
/// `advance_slot`, ...) from the control thread. Each take is written by a
/// long-lived disk thread to `<sample directory>/<layer>_<pitch>.wav`.
///
/// # Example
///
/// ```ignore
/// use autosampler::prelude::*;
///
/// let sampler = AutoSampler::builder()
///     .sample_directory("/tmp/piano")
///     .build()?;
///
/// sampler.prepare(48000.0)?;
/// sampler.start()?;
///
/// // In the audio callback:
/// sampler.process_block(&[left, right]);
/// ```
pub struct AutoSampler {
    sequencer: RunSequencer,
    config: SamplerConfig,
}

impl AutoSampler {
    /// Create a new sampler builder
    pub fn builder() -> crate::AutoSamplerBuilder {
        crate::AutoSamplerBuilder::default()
    }

    /// Spawns the disk thread.
    pub fn new(config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        let recorder = Recorder::new(&config)?;
        let sequencer = RunSequencer::new(recorder, config.sample_directory.clone());
        tracing::debug!(
            "AutoSampler ready ({} s countdown, {}-bit)",
            config.countdown_seconds,
            config.capture.bit_depth
        );
        Ok(Self { sequencer, config })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Host announces its sample rate before streaming.
    pub fn prepare(&self, sample_rate: f64) -> Result<()> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(autosampler_core::Error::InvalidSampleRate(sample_rate.to_string()).into());
        }
        self.recorder().set_sample_rate(sample_rate);
        tracing::debug!("Prepared at {} Hz", sample_rate);
        Ok(())
    }

    pub fn sample_rate(&self) -> f64 {
        self.recorder().sample_rate()
    }

    /// Realtime audio entry point. One slice per channel, equal lengths.
    #[inline]
    pub fn process_block(&self, channels: &[&[f32]]) {
        self.sequencer.recorder().process_block(channels);
    }

    pub fn set_sample_directory(&self, directory: impl Into<PathBuf>) {
        self.sequencer.set_sample_directory(directory);
    }

    pub fn sample_directory(&self) -> Option<PathBuf> {
        self.sequencer.sample_directory()
    }

    /// Session control
    pub fn sequencer(&self) -> &RunSequencer {
        &self.sequencer
    }

    /// Record state machine
    pub fn recorder(&self) -> &Recorder {
        self.sequencer.recorder()
    }

    /// Arm the current slot.
    pub fn start(&self) -> Result<()> {
        self.sequencer.start()
    }

    pub fn pause(&self) -> Result<()> {
        self.sequencer.pause()
    }

    pub fn resume(&self) -> Result<()> {
        self.sequencer.resume()
    }

    pub fn toggle_run(&self) -> Result<RunState> {
        self.sequencer.toggle_run()
    }

    pub fn toggle_record(&self) -> Result<RecordState> {
        self.sequencer.toggle_record()
    }

    pub fn stop(&self) -> bool {
        self.sequencer.stop()
    }

    pub fn advance_slot(&self) -> Result<usize> {
        self.sequencer.advance_slot()
    }

    pub fn reset_slot_countdown(&self) -> Result<()> {
        self.sequencer.reset_slot_countdown()
    }

    pub fn select_slot(&self, index: usize) -> Result<()> {
        self.sequencer.select_slot(index)
    }

    pub fn slot(&self) -> &'static SampleSlot {
        self.sequencer.slot()
    }

    pub fn record_state(&self) -> RecordState {
        self.recorder().record_state()
    }

    pub fn run_state(&self) -> RunState {
        self.recorder().run_state()
    }

    /// Everything the UI displays, read without blocking the audio thread.
    pub fn snapshot(&self) -> SamplerSnapshot {
        let recorder = self.recorder();
        let slot = self.sequencer.slot();
        SamplerSnapshot {
            record_state: recorder.record_state(),
            run_state: recorder.run_state(),
            slot: slot.index(),
            slot_name: slot.name().to_string(),
            countdown: recorder.countdown().display(),
            frames_recorded: recorder.frames_recorded(),
            writer_active: recorder.writer_active(),
            advance_enabled: self.sequencer.advance_enabled(),
            directory_selected: self.sequencer.directory_selected(),
            sample_rate: recorder.sample_rate(),
        }
    }

    /// Subscribe to session events.
    pub fn events(&self) -> Receiver<SamplerEvent> {
        self.recorder().events()
    }

    pub fn last_error(&self) -> Option<Arc<CaptureError>> {
        self.recorder().last_error()
    }

    pub fn timestamps(&self) -> TimeStamps {
        self.recorder().timestamps()
    }

    pub fn metrics(&self) -> Arc<CaptureMetrics> {
        self.recorder().metrics()
    }

    /// Wait until the disk thread has caught up, including finalizing
    /// stopped takes. Returns false on timeout.
    pub fn sync(&self, timeout: Duration) -> bool {
        self.recorder().sync(timeout)
    }

    /// Settings are not persisted across sessions.
    pub fn save_state(&self) -> Vec<u8> {
        Vec::new()
    }

    pub fn restore_state(&self, _data: &[u8]) {}
}

impl std::fmt::Debug for AutoSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSampler")
            .field("slot", &self.sequencer.slot_index())
            .field("record_state", &self.record_state())
            .field("run_state", &self.run_state())
            .finish()
    }
}
