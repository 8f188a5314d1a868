//! Builder for configuring and constructing an `AutoSampler`.

use crate::config::SamplerConfig;
use crate::{AutoSampler, Result};
use autosampler_capture::CaptureConfig;
use std::path::PathBuf;

/// The disk thread is spawned by `build()` and lives as long as the sampler.
///
/// The sample rate is optional here; a host normally supplies it later
/// through [`AutoSampler::prepare`].
///
/// # Example
///
/// ```ignore
/// use autosampler::prelude::*;
///
/// let sampler = AutoSampler::builder()
///     .sample_rate(48000.0)
///     .sample_directory("/tmp/piano")
///     .bit_depth(24)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct AutoSamplerBuilder {
    config: SamplerConfig,
    sample_rate: Option<f64>,
}

impl AutoSamplerBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn sample_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.sample_directory = Some(directory.into());
        self
    }

    /// Default: 4
    pub fn countdown_seconds(mut self, seconds: u8) -> Self {
        self.config.countdown_seconds = seconds;
        self
    }

    /// Default: 0.5
    pub fn start_window_seconds(mut self, seconds: f64) -> Self {
        self.config.start_window_seconds = seconds;
        self
    }

    pub fn capture(mut self, capture: CaptureConfig) -> Self {
        self.config.capture = capture;
        self
    }

    /// Default: 24
    pub fn bit_depth(mut self, bits: u16) -> Self {
        self.config.capture.bit_depth = bits;
        self
    }

    /// Default: 64
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<AutoSampler> {
        let sampler = AutoSampler::new(self.config)?;
        if let Some(sample_rate) = self.sample_rate {
            sampler.prepare(sample_rate)?;
        }
        Ok(sampler)
    }
}
