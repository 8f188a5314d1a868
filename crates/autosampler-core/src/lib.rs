//! Core types for AutoSampler.
//!
//! Everything in this crate is free of I/O and threads so it can be shared
//! between the realtime audio callback and the control thread:
//!
//! - [`SampleCatalog`] - the fixed bank of 36 sample slots (3 layers x 12 pitches)
//! - [`RecordState`] / [`RunState`] and their lock-free cells
//! - [`Countdown`] - frame-based pre-roll timer with the coarse display count
//! - [`TimeStamps`] - record start/stop markers

pub mod catalog;
pub mod countdown;
pub mod error;
pub mod lockfree;
pub mod state;
pub mod timestamps;

pub use catalog::{SampleCatalog, SampleSlot, DYNAMIC_LAYERS, LAST_SLOT, PITCHES, SLOT_COUNT};
pub use countdown::{Countdown, CountdownTick, DEFAULT_COUNTDOWN_SECONDS, DEFAULT_START_WINDOW_SECONDS};
pub use error::{Error, Result};
pub use lockfree::{AtomicDouble, AtomicFlag};
pub use state::{AtomicRecordState, AtomicRunState, RecordState, RunState};
pub use timestamps::TimeStamps;

pub use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicU8, AtomicUsize, Ordering};
