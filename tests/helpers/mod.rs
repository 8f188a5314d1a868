//! Test helpers and fixtures for AutoSampler integration tests
//!
//! Everything runs without audio hardware: blocks are fed by hand at a
//! fixed block size, so countdown boundaries are deterministic.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations
//! - `INT24_EPSILON`: One 24-bit quantization step
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use autosampler::prelude::*;
use std::path::Path;
use std::time::{Duration, Instant};

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Standard buffer size for deterministic testing
pub const TEST_BUFFER_SIZE: usize = 512;

/// Blocks needed at 48 kHz / 512 to reach the start window (168448 frames).
pub const BLOCKS_TO_START: usize = 329;

/// Generous upper bound for the disk thread to react.
pub const DISK_TIMEOUT: Duration = Duration::from_secs(5);

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Create a prepared sampler writing into `dir`.
pub fn test_sampler(dir: &Path) -> AutoSampler {
    init_tracing();
    AutoSampler::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .sample_directory(dir)
        .build()
        .expect("Failed to create test sampler")
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32 * 0.5
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Feed `signal` to the sampler in `TEST_BUFFER_SIZE` blocks, same data on
/// both channels. A trailing partial block is fed as-is.
pub fn feed_stereo(sampler: &AutoSampler, signal: &[f32]) {
    for block in signal.chunks(TEST_BUFFER_SIZE) {
        sampler.process_block(&[block, block]);
    }
}

/// Feed `count` blocks of silence.
pub fn feed_silence(sampler: &AutoSampler, count: usize) {
    let block = generate_silence(TEST_BUFFER_SIZE);
    for _ in 0..count {
        sampler.process_block(&[&block, &block]);
    }
}

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}

/// Wait for the sampler to reach `state`.
pub fn wait_for_state(sampler: &AutoSampler, state: RecordState) -> bool {
    wait_until(DISK_TIMEOUT, || sampler.record_state() == state)
}

/// Arm and feed silence until the take's file is open.
pub fn arm_and_start(sampler: &AutoSampler) {
    sampler.start().expect("arm failed");
    feed_silence(sampler, BLOCKS_TO_START);
    assert!(
        wait_for_state(sampler, RecordState::Recording),
        "take did not start"
    );
}

/// Read back a recorded file as normalized floats, interleaved.
pub fn read_wav(path: &Path) -> (hound::WavSpec, Vec<f32>) {
    let mut reader = hound::WavReader::open(path).expect("Failed to open recorded file");
    let spec = reader.spec();
    let scale = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f32;
    let samples = reader
        .samples::<i32>()
        .map(|s| s.expect("bad sample") as f32 / scale)
        .collect();
    (spec, samples)
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}
