//! Record and run state enums plus their lock-free cells.

use crate::{AtomicU8, Ordering};
use serde::{Deserialize, Serialize};

/// Recording state of the current take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum RecordState {
    #[default]
    Off = 0,
    /// Counting down towards the start of the take.
    Armed = 1,
    Recording = 2,
}

impl RecordState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RecordState::Armed,
            2 => RecordState::Recording,
            _ => RecordState::Off,
        }
    }

    /// Armed or recording.
    pub fn is_active(self) -> bool {
        self != RecordState::Off
    }
}

/// Sequencing state layered above [`RecordState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum RunState {
    #[default]
    Stopped = 0,
    Running = 1,
    Paused = 2,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RunState::Running,
            2 => RunState::Paused,
            _ => RunState::Stopped,
        }
    }
}

/// [`RecordState`] readable from the audio callback without locking.
#[derive(Debug, Default)]
pub struct AtomicRecordState {
    value: AtomicU8,
}

impl AtomicRecordState {
    pub fn new(state: RecordState) -> Self {
        Self {
            value: AtomicU8::new(state as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> RecordState {
        RecordState::from_u8(self.value.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, state: RecordState) {
        self.value.store(state as u8, Ordering::Release);
    }

    /// Move from `current` to `new` only if the cell still holds `current`.
    ///
    /// Returns the value observed on failure.
    pub fn transition(&self, current: RecordState, new: RecordState) -> Result<(), RecordState> {
        self.value
            .compare_exchange(current as u8, new as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(RecordState::from_u8)
    }
}

/// [`RunState`] readable from any thread.
#[derive(Debug, Default)]
pub struct AtomicRunState {
    value: AtomicU8,
}

impl AtomicRunState {
    pub fn new(state: RunState) -> Self {
        Self {
            value: AtomicU8::new(state as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> RunState {
        RunState::from_u8(self.value.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, state: RunState) {
        self.value.store(state as u8, Ordering::Release);
    }
}
