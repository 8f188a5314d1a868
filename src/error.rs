//! Centralized error type for the autosampler umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] autosampler_core::Error),

    #[error("Capture: {0}")]
    Capture(#[from] autosampler_capture::CaptureError),

    /// Rejected sampler settings.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Armed before the host supplied a sample rate.
    #[error("No sample rate: the host has not prepared the sampler")]
    NoSampleRate,

    /// Recording controls stay disabled until a destination is chosen.
    #[error("No sample directory selected")]
    NoSampleDirectory,

    #[error("Already armed or recording")]
    AlreadyArmed,

    #[error("Cannot advance past the last slot")]
    AdvanceDisabled,

    #[error("Slot cannot be changed while running")]
    SlotLockedWhileRunning,

    #[error("Run is not active")]
    NotRunning,

    #[error("Run is not paused")]
    NotPaused,

    #[cfg(feature = "standalone")]
    #[error("Audio input device not found")]
    NoInputDevice,

    #[cfg(feature = "standalone")]
    #[error("Unsupported input sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[cfg(feature = "standalone")]
    #[error("Failed to get input device config")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "standalone")]
    #[error("Failed to build input stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "standalone")]
    #[error("Failed to start input stream")]
    PlayStream(#[from] cpal::PlayStreamError),
}

pub type Result<T> = std::result::Result<T, Error>;
