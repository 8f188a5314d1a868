//! Sampler configuration.

use crate::{Error, Result};
use autosampler_capture::CaptureConfig;
use autosampler_core::{DEFAULT_COUNTDOWN_SECONDS, DEFAULT_START_WINDOW_SECONDS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for an [`AutoSampler`](crate::AutoSampler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Length of the pre-roll countdown in seconds (default: 4)
    pub countdown_seconds: u8,
    /// Recording starts when this many seconds of countdown remain (default: 0.5)
    pub start_window_seconds: f64,
    /// File format and disk thread settings
    pub capture: CaptureConfig,
    /// Capacity of the event channel (default: 64)
    pub event_capacity: usize,
    /// Destination directory, if already chosen
    pub sample_directory: Option<PathBuf>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            start_window_seconds: DEFAULT_START_WINDOW_SECONDS,
            capture: CaptureConfig::default(),
            event_capacity: 64,
            sample_directory: None,
        }
    }
}

impl SamplerConfig {
    /// Check that an armed countdown can reach its start window.
    pub fn validate(&self) -> Result<()> {
        if self.countdown_seconds == 0 {
            return Err(Error::InvalidConfig(
                "countdown_seconds must be at least 1".into(),
            ));
        }
        let window = self.start_window_seconds;
        if !(window >= 0.0 && window < f64::from(self.countdown_seconds)) {
            return Err(Error::InvalidConfig(format!(
                "start_window_seconds must be in [0, {}), got {}",
                self.countdown_seconds, window
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SamplerConfig::default();
        assert_eq!(config.countdown_seconds, 4);
        assert_eq!(config.start_window_seconds, 0.5);
        assert_eq!(config.capture.bit_depth, 24);
        assert_eq!(config.capture.channels, 2);
        assert!(config.sample_directory.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(SamplerConfig::default().validate().is_ok());

        let no_countdown = SamplerConfig {
            countdown_seconds: 0,
            ..Default::default()
        };
        assert!(matches!(no_countdown.validate(), Err(Error::InvalidConfig(_))));

        for window in [-0.5, 4.0, f64::NAN] {
            let config = SamplerConfig {
                start_window_seconds: window,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_partial_json() {
        let config: SamplerConfig =
            serde_json::from_str(r#"{"sample_directory": "/tmp/takes", "capture": {"bit_depth": 16}}"#)
                .unwrap();
        assert_eq!(config.sample_directory, Some(PathBuf::from("/tmp/takes")));
        assert_eq!(config.capture.bit_depth, 16);
        assert_eq!(config.capture.channels, 2);
        assert_eq!(config.countdown_seconds, 4);
    }
}
