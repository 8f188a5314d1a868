//! Lock-free primitives shared with the audio callback.

use crate::Ordering;
use atomic_float::AtomicF64;
use std::sync::atomic::AtomicBool;

/// Cache-line aligned atomic f64.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicDouble {
    value: AtomicF64,
}

impl AtomicDouble {
    pub fn new(value: f64) -> Self {
        Self {
            value: AtomicF64::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Release);
    }
}

impl Default for AtomicDouble {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Atomic boolean with acquire/release semantics.
#[derive(Debug, Default)]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    /// Set the flag, returning the previous value.
    #[inline]
    pub fn swap(&self, value: bool) -> bool {
        self.value.swap(value, Ordering::AcqRel)
    }
}
