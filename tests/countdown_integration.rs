//! Countdown display as seen by a UI polling between audio blocks.

#[path = "helpers/mod.rs"]
mod helpers;

use autosampler::prelude::*;
use helpers::*;

#[test]
fn test_display_steps_through_four_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let sampler = test_sampler(dir.path());
    sampler.start().unwrap();

    let mut seen = vec![sampler.snapshot().countdown];
    // 192000 / 512 = 375 blocks to reach zero exactly.
    for _ in 0..380 {
        feed_silence(&sampler, 1);
        let countdown = sampler.recorder().countdown();
        let display = countdown.display();
        assert!(display <= *seen.last().unwrap(), "display went up");
        if display == 0 {
            assert!(countdown.remaining() <= 0);
        }
        if seen.last() != Some(&display) {
            seen.push(display);
        }
    }
    assert_eq!(seen, vec![4, 3, 2, 1, 0]);
    sampler.stop();
}

/// Transitions happen on the first block past each whole-second threshold.
#[test]
fn test_display_boundaries_at_48k() {
    let dir = tempfile::tempdir().unwrap();
    let sampler = test_sampler(dir.path());
    sampler.start().unwrap();

    let mut transitions = Vec::new();
    let mut last = 4;
    for block in 1..=375usize {
        feed_silence(&sampler, 1);
        let display = sampler.recorder().countdown().display();
        if display != last {
            transitions.push((block, display));
            last = display;
        }
    }
    // remaining after n blocks = 192000 - 512n
    assert_eq!(transitions, vec![(94, 3), (188, 2), (282, 1), (375, 0)]);
    sampler.stop();
}

/// A countdown configured shorter than the default scales both the length
/// and the first displayed digit.
#[test]
fn test_custom_countdown_length() {
    let dir = tempfile::tempdir().unwrap();
    let sampler = AutoSampler::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .sample_directory(dir.path())
        .countdown_seconds(2)
        .build()
        .unwrap();

    sampler.start().unwrap();
    assert_eq!(sampler.recorder().countdown().remaining(), 96_000);
    assert_eq!(sampler.snapshot().countdown, 2);

    // (96000 - 24000) / 512 = 140.6
    feed_silence(&sampler, 141);
    assert!(wait_for_state(&sampler, RecordState::Recording));
    sampler.stop();
}
