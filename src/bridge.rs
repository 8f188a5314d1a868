//! Handoff of the active capture handle between the control side and the
//! audio callback.
//!
//! The handle lives in a slot guarded by a short mutex. The control side and
//! the disk thread take the lock only to swap the handle in or out together
//! with the record-state change; no I/O or allocation happens while it is
//! held. The audio callback only ever `try_lock`s: if the slot is momentarily
//! busy the block is skipped rather than waiting. A lock-free presence flag
//! lets the callback skip the lock entirely when nothing is recording.

use autosampler_capture::CaptureHandle;
use autosampler_core::AtomicFlag;
use parking_lot::Mutex;

#[derive(Default)]
pub(crate) struct WriterBridge {
    slot: Mutex<Option<CaptureHandle>>,
    present: AtomicFlag,
}

/// Outcome of [`WriterBridge::try_write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteOutcome {
    /// No handle installed, or the gate refused the write.
    Absent,
    /// The slot was being swapped; the block was skipped.
    Busy,
    Written(usize),
}

impl WriterBridge {
    /// Install `handle` if `accept` (run under the lock) agrees. A refused
    /// handle is returned to the caller.
    pub(crate) fn install(
        &self,
        handle: CaptureHandle,
        accept: impl FnOnce() -> bool,
    ) -> Option<CaptureHandle> {
        let mut slot = self.slot.lock();
        if slot.is_some() || !accept() {
            return Some(handle);
        }
        *slot = Some(handle);
        self.present.set(true);
        None
    }

    /// Clear the slot, running `with_lock` inside the same critical section.
    /// Once this returns no callback can reach the old handle.
    pub(crate) fn retire(&self, with_lock: impl FnOnce()) -> Option<CaptureHandle> {
        let mut slot = self.slot.lock();
        self.present.set(false);
        with_lock();
        slot.take()
    }

    /// Realtime safe. Writes `channels` if a handle is installed and `gate`
    /// (checked under the lock) allows it. `on_written` receives the frames
    /// the writer accepted, still under the lock.
    #[inline]
    pub(crate) fn try_write(
        &self,
        channels: &[&[f32]],
        gate: impl FnOnce() -> bool,
        on_written: impl FnOnce(usize),
    ) -> WriteOutcome {
        if !self.present.get() {
            return WriteOutcome::Absent;
        }
        let Some(mut slot) = self.slot.try_lock() else {
            return WriteOutcome::Busy;
        };
        match slot.as_mut() {
            Some(handle) if gate() => {
                let written = handle.write(channels);
                on_written(written);
                WriteOutcome::Written(written)
            }
            _ => WriteOutcome::Absent,
        }
    }

    pub(crate) fn is_present(&self) -> bool {
        self.present.get()
    }
}
