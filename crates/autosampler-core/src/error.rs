//! Error types for autosampler-core.

use thiserror::Error;

/// Error type for autosampler-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid slot index: {0}. Must be below {max}", max = crate::SLOT_COUNT)]
    InvalidSlot(usize),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
