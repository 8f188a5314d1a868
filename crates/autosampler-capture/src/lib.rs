//! Streaming WAV capture for AutoSampler.
//!
//! A single long-lived disk thread owns every file being written. The audio
//! callback pushes frames into a lock-free ring buffer through a
//! [`CaptureHandle`]; the disk thread drains the ring, encodes PCM through
//! `hound` and finalizes the header when the handle is closed.
//!
//! ```ignore
//! use autosampler_capture::{CaptureConfig, CaptureSpec, CaptureWriter};
//!
//! let writer = CaptureWriter::new(CaptureConfig::default())?;
//! let mut handle = writer.open("takes/p_C0.wav", CaptureSpec::stereo_24(48000))?;
//!
//! // audio thread
//! handle.write(&[&left, &right]);
//!
//! // control thread
//! writer.close(handle);
//! ```

mod buffer;
mod config;
mod encode;
pub mod error;
mod handle;
mod metrics;
mod request;
mod thread;
mod writer;

pub use config::{CaptureConfig, CaptureSpec};
pub use error::{CaptureError, Result};
pub use handle::CaptureHandle;
pub use metrics::{CaptureMetrics, CaptureMetricsSnapshot};
pub use request::{CaptureId, OpenCompletion, OpenRequest};
pub use writer::CaptureWriter;
