//! Record from the default input device without a plugin host.

use crate::{AutoSampler, Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use std::sync::Arc;

/// Scratch capacity per channel. Larger device buffers are split.
const MAX_BLOCK_FRAMES: usize = 4096;

/// Live CPAL input stream feeding an [`AutoSampler`].
///
/// The stream stops when this value is dropped.
pub struct StandaloneInput {
    _stream: Stream,
    device_name: String,
    sample_rate: u32,
    channels: u16,
}

impl StandaloneInput {
    /// Open the default input device, prepare `sampler` with its sample rate
    /// and start streaming.
    pub fn open_default(sampler: Arc<AutoSampler>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(Error::NoInputDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "Default".to_string());

        let supported = device.default_input_config()?;
        if supported.sample_format() != SampleFormat::F32 {
            return Err(Error::UnsupportedSampleFormat(format!(
                "{:?}",
                supported.sample_format()
            )));
        }

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: StreamConfig = supported.into();
        sampler.prepare(f64::from(sample_rate))?;

        let mut deinterleaver = Deinterleaver::new(channels as usize);
        let stream = device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                deinterleaver.feed(data, |block| sampler.process_block(block));
            },
            |err| tracing::error!("Input stream error: {}", err),
            None,
        )?;
        stream.play()?;

        tracing::info!(
            "Standalone input: {} ({} ch, {} Hz)",
            device_name,
            channels,
            sample_rate
        );

        Ok(Self {
            _stream: stream,
            device_name,
            sample_rate,
            channels,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

/// Splits interleaved device buffers into per-channel blocks using
/// preallocated scratch, so the callback never allocates.
struct Deinterleaver {
    stride: usize,
    scratch: Vec<Vec<f32>>,
}

impl Deinterleaver {
    fn new(device_channels: usize) -> Self {
        let stride = device_channels.max(1);
        // Only the first two channels are recorded.
        let used = stride.min(2);
        Self {
            stride,
            scratch: vec![vec![0.0; MAX_BLOCK_FRAMES]; used],
        }
    }

    fn feed(&mut self, interleaved: &[f32], mut sink: impl FnMut(&[&[f32]])) {
        let stride = self.stride;
        for chunk in interleaved.chunks(MAX_BLOCK_FRAMES * stride) {
            let frames = chunk.len() / stride;
            if frames == 0 {
                continue;
            }
            for (ch, buf) in self.scratch.iter_mut().enumerate() {
                for (frame, sample) in buf[..frames].iter_mut().enumerate() {
                    *sample = chunk[frame * stride + ch];
                }
            }
            match self.scratch.as_slice() {
                [mono] => sink(&[&mono[..frames]]),
                [left, right, ..] => sink(&[&left[..frames], &right[..frames]]),
                [] => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deinterleave_stereo() {
        let mut d = Deinterleaver::new(2);
        let data: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let mut seen = Vec::new();
        d.feed(&data, |block| seen.push((block[0].to_vec(), block[1].to_vec())));
        assert_eq!(seen, vec![(vec![0.0, 2.0, 4.0, 6.0], vec![1.0, 3.0, 5.0, 7.0])]);
    }

    #[test]
    fn test_extra_channels_ignored() {
        let mut d = Deinterleaver::new(4);
        let data = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];
        let mut blocks = 0;
        d.feed(&data, |block| {
            assert_eq!(block.len(), 2);
            assert_eq!(block[0], &[0.1, 0.5]);
            assert_eq!(block[1], &[0.2, 0.6]);
            blocks += 1;
        });
        assert_eq!(blocks, 1);
    }

    #[test]
    fn test_large_buffers_are_split() {
        let mut d = Deinterleaver::new(1);
        let data = vec![0.0f32; MAX_BLOCK_FRAMES * 2 + 10];
        let mut sizes = Vec::new();
        d.feed(&data, |block| sizes.push(block[0].len()));
        assert_eq!(sizes, vec![MAX_BLOCK_FRAMES, MAX_BLOCK_FRAMES, 10]);
    }
}
