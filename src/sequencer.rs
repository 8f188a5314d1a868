//! Slot-by-slot session control on top of the [`Recorder`].
//!
//! A session walks the catalog one slot at a time: start a take, stop it,
//! advance to the next pitch, repeat. The user actions here compose
//! [`Recorder::arm`] and [`Recorder::stop`] with the current slot and the
//! chosen destination directory.

use crate::events::SamplerEvent;
use crate::recorder::Recorder;
use crate::{Error, Result};
use autosampler_core::{
    AtomicFlag, AtomicUsize, Ordering, RecordState, RunState, SampleCatalog, SampleSlot, LAST_SLOT,
};
use parking_lot::Mutex;
use std::path::PathBuf;

pub struct RunSequencer {
    recorder: Recorder,
    slot: AtomicUsize,
    advance_enabled: AtomicFlag,
    directory: Mutex<Option<PathBuf>>,
}

impl RunSequencer {
    pub(crate) fn new(recorder: Recorder, directory: Option<PathBuf>) -> Self {
        Self {
            recorder,
            slot: AtomicUsize::new(0),
            advance_enabled: AtomicFlag::new(true),
            directory: Mutex::new(directory),
        }
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Destination for subsequent takes. Applies from the next arm.
    pub fn set_sample_directory(&self, directory: impl Into<PathBuf>) {
        let directory = directory.into();
        tracing::info!("Sample directory: {}", directory.display());
        *self.directory.lock() = Some(directory);
    }

    pub fn sample_directory(&self) -> Option<PathBuf> {
        self.directory.lock().clone()
    }

    pub fn slot_index(&self) -> usize {
        self.slot.load(Ordering::Acquire)
    }

    pub fn slot(&self) -> &'static SampleSlot {
        SampleCatalog::global().saturating(self.slot_index())
    }

    pub fn advance_enabled(&self) -> bool {
        self.advance_enabled.get()
    }

    /// Arm the current slot.
    pub fn start(&self) -> Result<()> {
        let directory = self.directory.lock().clone().ok_or(Error::NoSampleDirectory)?;
        self.recorder.arm(self.slot(), &directory)
    }

    /// Abort any countdown or take and hold the session.
    pub fn pause(&self) -> Result<()> {
        if self.recorder.run_state() != RunState::Running {
            return Err(Error::NotRunning);
        }
        self.recorder.stop();
        self.recorder.set_run_state(RunState::Paused);
        tracing::debug!("Paused at slot {}", self.slot());
        Ok(())
    }

    /// Re-arm the current slot after a pause.
    pub fn resume(&self) -> Result<()> {
        if self.recorder.run_state() != RunState::Paused {
            return Err(Error::NotPaused);
        }
        self.start()
    }

    /// Run button: start, pause or resume depending on the run state.
    /// Returns the new run state.
    pub fn toggle_run(&self) -> Result<RunState> {
        match self.recorder.run_state() {
            RunState::Stopped => self.start()?,
            RunState::Running => self.pause()?,
            RunState::Paused => self.resume()?,
        }
        Ok(self.recorder.run_state())
    }

    /// Record button: arm when off, otherwise stop the take.
    /// Returns the new record state.
    pub fn toggle_record(&self) -> Result<RecordState> {
        if self.recorder.record_state().is_active() {
            self.recorder.stop();
        } else {
            self.start()?;
        }
        Ok(self.recorder.record_state())
    }

    /// End the current countdown or take. Returns whether anything stopped.
    pub fn stop(&self) -> bool {
        self.recorder.stop()
    }

    /// Move to the next slot, pausing a running session first.
    ///
    /// Reaching the last slot disables further advance until a lower slot
    /// is selected.
    pub fn advance_slot(&self) -> Result<usize> {
        if !self.advance_enabled.get() {
            return Err(Error::AdvanceDisabled);
        }
        if self.recorder.run_state() == RunState::Running {
            self.pause()?;
        }
        self.recorder.countdown().reset_display();

        let next = (self.slot_index() + 1).min(LAST_SLOT);
        self.slot.store(next, Ordering::Release);
        if next >= LAST_SLOT {
            self.advance_enabled.set(false);
        }

        tracing::debug!("Advanced to slot {}", self.slot());
        self.recorder.emit(SamplerEvent::SlotChanged { slot: next });
        Ok(next)
    }

    /// Restart the countdown for the current slot.
    ///
    /// While running the take is discarded and the slot re-armed; otherwise
    /// only the displayed count is reset.
    pub fn reset_slot_countdown(&self) -> Result<()> {
        if self.recorder.run_state() == RunState::Running {
            self.pause()?;
            return self.resume();
        }
        self.recorder.countdown().reset_display();
        Ok(())
    }

    /// Jump to `index`. Not allowed while running.
    pub fn select_slot(&self, index: usize) -> Result<()> {
        if self.recorder.run_state() == RunState::Running {
            return Err(Error::SlotLockedWhileRunning);
        }
        let slot = SampleCatalog::global().slot(index)?;
        self.slot.store(index, Ordering::Release);
        self.advance_enabled.set(index < LAST_SLOT);

        tracing::debug!("Selected slot {}", slot);
        self.recorder.emit(SamplerEvent::SlotChanged { slot: index });
        Ok(())
    }

    pub(crate) fn directory_selected(&self) -> bool {
        self.directory.lock().is_some()
    }
}
