//! Record start/stop markers, in frames relative to the start of a take.

use serde::Serialize;

/// Append-only list of frame offsets. `0` marks the start of a take and the
/// final entry the frame count at which it was stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeStamps {
    marks: Vec<u64>,
}

impl TimeStamps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Clear and mark the start of a take.
    pub fn start(&mut self) {
        self.marks.clear();
        self.marks.push(0);
    }

    pub fn push(&mut self, frame: u64) {
        self.marks.push(frame);
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn last(&self) -> Option<u64> {
        self.marks.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_resets_to_zero_mark() {
        let mut marks = TimeStamps::new();
        marks.push(10);
        marks.push(20);
        marks.start();
        assert_eq!(marks.as_slice(), &[0]);
        marks.push(48000);
        assert_eq!(marks.as_slice(), &[0, 48000]);
        assert_eq!(marks.last(), Some(48000));
    }
}
