//! Status reported to the control/UI layer.

use autosampler_capture::CaptureError;
use autosampler_core::{RecordState, RunState};
use std::path::PathBuf;
use std::sync::Arc;

/// Notifications emitted as a session progresses.
///
/// Delivered through a bounded channel; if the UI falls behind, further
/// events are dropped rather than stalling the disk thread.
#[derive(Debug, Clone)]
pub enum SamplerEvent {
    /// Countdown started for `slot`.
    Armed { slot: usize },
    /// The take's file is open and frames are being written.
    RecordingStarted { slot: usize, path: PathBuf },
    /// Opening the take's file failed; the sampler stays armed until stopped.
    OpenFailed {
        slot: usize,
        error: Arc<CaptureError>,
    },
    /// A take ended. `frames` is the number of frames the writer accepted;
    /// frames dropped on ring overflow are not included.
    Stopped { slot: usize, frames: u64 },
    /// The current slot changed.
    SlotChanged { slot: usize },
}

/// Point-in-time view of everything the UI displays.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerSnapshot {
    pub record_state: RecordState,
    pub run_state: RunState,
    pub slot: usize,
    pub slot_name: String,
    /// Countdown digit (4..=0).
    pub countdown: u8,
    /// Frames accepted by the writer during the current/last take.
    pub frames_recorded: u64,
    pub writer_active: bool,
    pub advance_enabled: bool,
    pub directory_selected: bool,
    pub sample_rate: f64,
}
