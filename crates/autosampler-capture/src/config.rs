//! Capture configuration and file format.

use crate::{CaptureError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bit depths the encoder can produce (integer PCM).
const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

const MAX_SAMPLE_RATE: u32 = 768_000;

/// Ring buffers never go below this many frames.
pub(crate) const MIN_RING_FRAMES: usize = 32768;

/// Configuration for the disk thread and its capture buffers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// PCM bit depth of recorded files (default: 24)
    pub bit_depth: u16,
    /// Channels per recorded file (default: 2)
    pub channels: u16,
    /// Ring buffer length in seconds (default: 2.0, never below 32768 frames)
    pub ring_seconds: f64,
    /// Frames buffered before the disk thread writes them out (default: 4096)
    pub flush_threshold: usize,
    /// Command queue capacity (default: 64)
    pub command_capacity: usize,
    /// How long the idle disk thread waits for commands (default: 1ms)
    #[serde(with = "millis")]
    pub idle_poll: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            bit_depth: 24,
            channels: 2,
            ring_seconds: 2.0,
            flush_threshold: 4096,
            command_capacity: 64,
            idle_poll: Duration::from_millis(1),
        }
    }
}

impl CaptureConfig {
    /// File format for a take at `sample_rate`.
    pub fn spec(&self, sample_rate: f64) -> CaptureSpec {
        CaptureSpec {
            sample_rate: sample_rate.round() as u32,
            channels: self.channels,
            bit_depth: self.bit_depth,
        }
    }

    /// Ring buffer capacity in frames for a given sample rate.
    pub fn ring_frames(&self, sample_rate: u32) -> usize {
        ((self.ring_seconds * f64::from(sample_rate)) as usize).max(MIN_RING_FRAMES)
    }
}

/// Format of one recorded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureSpec {
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_depth: u16,
}

impl CaptureSpec {
    /// 24-bit stereo, the format every sample slot is recorded in.
    pub fn stereo_24(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 2,
            bit_depth: 24,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return Err(CaptureError::UnsupportedFormat(format!(
                "bit depth {} (supported: 16, 24, 32)",
                self.bit_depth
            )));
        }
        if !(1..=2).contains(&self.channels) {
            return Err(CaptureError::UnsupportedFormat(format!(
                "{} channels (supported: 1 or 2)",
                self.channels
            )));
        }
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(CaptureError::UnsupportedFormat(format!(
                "sample rate {} Hz",
                self.sample_rate
            )));
        }
        Ok(())
    }

    pub(crate) fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bit_depth,
            sample_format: hound::SampleFormat::Int,
        }
    }

    /// Bytes one frame occupies on disk.
    pub fn bytes_per_frame(&self) -> u64 {
        u64::from(self.channels) * u64::from(self.bit_depth / 8)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.bit_depth, 24);
        assert_eq!(config.channels, 2);
        assert_eq!(config.ring_seconds, 2.0);
        assert_eq!(config.flush_threshold, 4096);
        assert_eq!(config.command_capacity, 64);
        assert_eq!(config.idle_poll, Duration::from_millis(1));
    }

    #[test]
    fn test_ring_frames() {
        let config = CaptureConfig::default();
        assert_eq!(config.ring_frames(48000), 96000);
        assert_eq!(config.ring_frames(8000), MIN_RING_FRAMES);
    }

    #[test]
    fn test_spec_from_config() {
        let spec = CaptureConfig::default().spec(44100.0);
        assert_eq!(spec, CaptureSpec::stereo_24(44100));
        assert_eq!(spec.bytes_per_frame(), 6);
    }

    #[test]
    fn test_validate_rejects_unsupported() {
        assert!(CaptureSpec::stereo_24(48000).validate().is_ok());

        let odd_depth = CaptureSpec {
            bit_depth: 12,
            ..CaptureSpec::stereo_24(48000)
        };
        assert!(matches!(
            odd_depth.validate(),
            Err(CaptureError::UnsupportedFormat(_))
        ));

        let surround = CaptureSpec {
            channels: 6,
            ..CaptureSpec::stereo_24(48000)
        };
        assert!(matches!(
            surround.validate(),
            Err(CaptureError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            CaptureSpec::stereo_24(0).validate(),
            Err(CaptureError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: CaptureConfig = serde_json::from_str(r#"{"bit_depth": 16}"#).unwrap();
        assert_eq!(config.bit_depth, 16);
        assert_eq!(config.channels, 2);

        let json = serde_json::to_string(&CaptureConfig::default()).unwrap();
        assert!(json.contains("\"idle_poll\":1"));
    }
}
