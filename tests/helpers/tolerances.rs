//! Tolerance constants for comparing recorded audio.

/// Floating point rounding errors.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Silence threshold (~-80dB).
pub const SILENCE_THRESHOLD: f32 = 0.0001;

/// 24-bit quantization step size.
pub const INT24_EPSILON: f32 = 1.0 / 8388608.0;
