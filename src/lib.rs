//! # AutoSampler - Automated Multi-Sample Recorder
//!
//! Records one take per (dynamic layer, pitch) slot of a 36-slot catalog,
//! each started automatically by a four-second countdown.
//!
//! ## Architecture
//!
//! AutoSampler is an umbrella crate that coordinates:
//! - **autosampler-core** - Sample catalog, record/run states, countdown, timestamps
//! - **autosampler-capture** - Capture writer (disk thread, ring buffers, WAV encoding)
//!
//! and adds the record state machine, the realtime writer bridge and the run
//! sequencer on top.
//!
//! ## Quick Start
//!
//! ```ignore
//! use autosampler::prelude::*;
//!
//! let sampler = AutoSampler::builder()
//!     .sample_directory("/tmp/piano")
//!     .build()?;
//!
//! // Host setup
//! sampler.prepare(48000.0)?;
//!
//! // Arm slot p_C0; recording begins half a second before the count hits zero
//! sampler.start()?;
//!
//! // Audio callback
//! sampler.process_block(&[&left, &right]);
//!
//! // Next pitch
//! sampler.advance_slot()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Plugin-style core, fed by the host
//! - `standalone` - Record from the default input device via CPAL

/// Re-export of autosampler-core for direct access
pub use autosampler_core as core;

/// Re-export of autosampler-capture for direct access
pub use autosampler_capture as capture;

pub use autosampler_core::{
    Countdown, RecordState, RunState, SampleCatalog, SampleSlot, TimeStamps, LAST_SLOT,
    SLOT_COUNT,
};

pub use autosampler_capture::{
    CaptureConfig, CaptureError, CaptureMetrics, CaptureMetricsSnapshot, CaptureSpec,
    CaptureWriter,
};

mod bridge;
mod builder;
mod config;
mod error;
mod events;
mod recorder;
mod sampler;
mod sequencer;

#[cfg(feature = "standalone")]
mod standalone;

pub use builder::AutoSamplerBuilder;
pub use config::SamplerConfig;
pub use error::{Error, Result};
pub use events::{SamplerEvent, SamplerSnapshot};
pub use recorder::Recorder;
pub use sampler::AutoSampler;
pub use sequencer::RunSequencer;

#[cfg(feature = "standalone")]
pub use standalone::StandaloneInput;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{AutoSampler, AutoSamplerBuilder, SamplerConfig};

    pub use crate::{Error, Result};

    pub use crate::{RecordState, RunState, SampleCatalog, SampleSlot};

    pub use crate::{SamplerEvent, SamplerSnapshot};

    #[cfg(feature = "standalone")]
    pub use crate::StandaloneInput;
}
