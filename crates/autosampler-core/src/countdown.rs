//! Frame-based pre-roll countdown.
//!
//! The countdown is armed with `seconds x sample_rate` frames and ticked once
//! per audio block. Its display count uses coarse one-second thresholds: with
//! a 4 second countdown the display shows 4 while more than 3 seconds remain,
//! 3 above 2 seconds, 2 above 1 second and 1 while any frames remain. It reaches 0 only once the remaining frames are <= 0.
//!
//! Only the audio callback ticks the countdown; the control thread arms it and
//! reads it for display. Reads are advisory and may lag by one block.

use crate::{AtomicBool, AtomicI64, AtomicU8, Ordering};

pub const DEFAULT_COUNTDOWN_SECONDS: u8 = 4;

/// Recording starts when this much of the countdown is left.
pub const DEFAULT_START_WINDOW_SECONDS: f64 = 0.5;

/// Result of a single [`Countdown::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    /// Display count after this tick.
    pub display: u8,
    /// Remaining frames after this tick.
    pub remaining: i64,
    /// True for exactly one tick per arm: the one that moved the remaining
    /// frames into the start window.
    pub entered_start_window: bool,
}

#[derive(Debug)]
pub struct Countdown {
    remaining: AtomicI64,
    display: AtomicU8,
    seconds: AtomicU8,
    start_window: AtomicI64,
    window_entered: AtomicBool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECONDS)
    }
}

impl Countdown {
    /// An idle countdown showing `seconds` on its display.
    pub fn new(seconds: u8) -> Self {
        Self {
            remaining: AtomicI64::new(0),
            display: AtomicU8::new(seconds),
            seconds: AtomicU8::new(seconds),
            start_window: AtomicI64::new(0),
            window_entered: AtomicBool::new(true),
        }
    }

    /// Load the countdown with `seconds x sample_rate` frames.
    pub fn arm(&self, sample_rate: f64, seconds: u8, start_window_seconds: f64) {
        let total = (sample_rate * f64::from(seconds)) as i64;
        let window = (sample_rate * start_window_seconds) as i64;

        self.seconds.store(seconds, Ordering::Relaxed);
        self.start_window.store(window, Ordering::Relaxed);
        self.remaining.store(total, Ordering::Relaxed);
        self.display.store(seconds, Ordering::Relaxed);
        self.window_entered.store(false, Ordering::Release);
    }

    /// Advance by one audio block. Returns `None` once the display reached 0.
    ///
    /// Realtime safe: atomics only.
    #[inline]
    pub fn tick(&self, block_size: usize, sample_rate: f64) -> Option<CountdownTick> {
        if self.display.load(Ordering::Relaxed) == 0 {
            return None;
        }

        let remaining = self
            .remaining
            .fetch_sub(block_size as i64, Ordering::Relaxed)
            - block_size as i64;

        let display = Self::display_for(remaining, sample_rate, self.seconds.load(Ordering::Relaxed))
            .min(self.display.load(Ordering::Relaxed));
        self.display.store(display, Ordering::Relaxed);

        let entered_start_window = remaining <= self.start_window.load(Ordering::Relaxed)
            && !self.window_entered.swap(true, Ordering::AcqRel);

        Some(CountdownTick {
            display,
            remaining,
            entered_start_window,
        })
    }

    /// Coarse display count for `remaining` frames: the number of whole-second
    /// thresholds (`k x sample_rate`, k = 0..seconds) that `remaining` exceeds.
    pub fn display_for(remaining: i64, sample_rate: f64, seconds: u8) -> u8 {
        let remaining = remaining as f64;
        (0..seconds)
            .rev()
            .find(|&k| remaining > f64::from(k) * sample_rate)
            .map_or(0, |k| k + 1)
    }

    pub fn remaining(&self) -> i64 {
        self.remaining.load(Ordering::Relaxed)
    }

    pub fn display(&self) -> u8 {
        self.display.load(Ordering::Relaxed)
    }

    /// Reset the display to its full count without arming.
    pub fn reset_display(&self) {
        self.display
            .store(self.seconds.load(Ordering::Relaxed), Ordering::Relaxed);
    }

    /// Whether the start window has been reached since the last arm.
    pub fn start_window_entered(&self) -> bool {
        self.window_entered.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SR: f64 = 48000.0;

    #[test]
    fn test_arm_loads_four_seconds() {
        let countdown = Countdown::default();
        countdown.arm(SR, 4, 0.5);
        assert_eq!(countdown.remaining(), 192_000);
        assert_eq!(countdown.display(), 4);
        assert!(!countdown.start_window_entered());
    }

    #[test]
    fn test_display_thresholds() {
        assert_eq!(Countdown::display_for(192_000, SR, 4), 4);
        assert_eq!(Countdown::display_for(144_001, SR, 4), 4);
        assert_eq!(Countdown::display_for(144_000, SR, 4), 3);
        assert_eq!(Countdown::display_for(96_000, SR, 4), 2);
        assert_eq!(Countdown::display_for(48_001, SR, 4), 2);
        assert_eq!(Countdown::display_for(48_000, SR, 4), 1);
        assert_eq!(Countdown::display_for(24_000, SR, 4), 1);
        assert_eq!(Countdown::display_for(1, SR, 4), 1);
        assert_eq!(Countdown::display_for(0, SR, 4), 0);
        assert_eq!(Countdown::display_for(-512, SR, 4), 0);
    }

    #[test]
    fn test_start_window_entered_once() {
        let countdown = Countdown::default();
        countdown.arm(SR, 4, 0.5);

        let mut frames = 0usize;
        let mut entries = Vec::new();
        while let Some(tick) = countdown.tick(512, SR) {
            frames += 512;
            if tick.entered_start_window {
                entries.push(frames);
            }
        }

        // 192000 - 329 * 512 = 23552 <= 24000
        assert_eq!(entries, vec![329 * 512]);
        assert!(frames >= 192_000);
        assert_eq!(countdown.display(), 0);
        assert!(countdown.tick(512, SR).is_none());
    }

    #[test]
    fn test_oversized_block_still_enters_window() {
        let countdown = Countdown::default();
        countdown.arm(SR, 4, 0.5);
        countdown.tick(150_000, SR).unwrap();
        let tick = countdown.tick(150_000, SR).unwrap();
        assert!(tick.entered_start_window);
        assert_eq!(tick.display, 0);
    }

    #[test]
    fn test_reset_display() {
        let countdown = Countdown::default();
        countdown.arm(SR, 4, 0.5);
        while countdown.tick(4096, SR).is_some() {}
        assert_eq!(countdown.display(), 0);
        countdown.reset_display();
        assert_eq!(countdown.display(), 4);
    }

    #[test]
    fn test_idle_countdown_does_not_enter_window() {
        let countdown = Countdown::default();
        let tick = countdown.tick(512, SR).unwrap();
        assert!(!tick.entered_start_window);
    }

    proptest! {
        #[test]
        fn display_is_non_increasing(
            sample_rate in prop::sample::select(vec![22050.0, 44100.0, 48000.0, 88200.0, 96000.0]),
            block in 1usize..4096,
        ) {
            let countdown = Countdown::default();
            countdown.arm(sample_rate, 4, 0.5);
            let mut last = countdown.display();
            let mut entries = 0;
            while let Some(tick) = countdown.tick(block, sample_rate) {
                prop_assert!(tick.display <= last);
                prop_assert!(tick.display <= 4);
                if tick.display == 0 {
                    prop_assert!(tick.remaining <= 0);
                }
                if tick.entered_start_window {
                    entries += 1;
                    prop_assert!(tick.remaining <= (sample_rate * 0.5) as i64);
                }
                last = tick.display;
            }
            prop_assert_eq!(entries, 1);
            prop_assert_eq!(last, 0);
        }
    }
}
