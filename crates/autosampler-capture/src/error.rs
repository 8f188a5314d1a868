//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced while opening or servicing a capture.
///
/// None of these are ever produced on the audio thread; the realtime path only
/// sees whether a handle is present.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Destination path invalid or unwritable.
    #[error("Cannot create file {}: {source}", path.display())]
    CannotCreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File was created but the WAV stream could not be started.
    #[error("Cannot open WAV stream for {}: {reason}", path.display())]
    CannotOpenStream { path: PathBuf, reason: String },

    /// Bit depth, channel count or sample rate rejected by the writer.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The disk thread is not running.
    #[error("Capture disk thread unavailable")]
    WriterUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
