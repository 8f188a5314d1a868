//! WAV file creation and PCM encoding, run off the audio thread.

use crate::buffer::CaptureBufferConsumer;
use crate::metrics::CaptureMetrics;
use crate::{CaptureError, CaptureSpec, Result};
use hound::WavWriter;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

pub(crate) type WavFile = WavWriter<BufWriter<File>>;

/// Create `path` as a fresh WAV file, replacing anything already there.
///
/// The format is validated before the disk is touched. If the header cannot
/// be written the new file is removed again, so a failed open leaves nothing
/// behind beyond the deletion of the old file.
pub(crate) fn create_wav_file(path: &Path, spec: &CaptureSpec) -> Result<WavFile> {
    spec.validate()?;

    match fs::remove_file(path) {
        Ok(()) => tracing::debug!("Replaced existing take {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(CaptureError::CannotCreateFile {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let file = File::create(path).map_err(|source| CaptureError::CannotCreateFile {
        path: path.to_path_buf(),
        source,
    })?;

    WavWriter::new(BufWriter::new(file), spec.wav_spec()).map_err(|e| {
        let _ = fs::remove_file(path);
        CaptureError::CannotOpenStream {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })
}

/// Convert a float sample to a signed integer of `bits` width.
#[inline]
pub(crate) fn quantize(sample: f32, bits: u16) -> i32 {
    let max = ((1i64 << (bits - 1)) - 1) as f64;
    (f64::from(sample.clamp(-1.0, 1.0)) * max).round() as i32
}

/// Per-capture state owned by the disk thread.
pub(crate) struct ActiveCapture {
    pub consumer: CaptureBufferConsumer,
    pub file: WavFile,
    pub spec: CaptureSpec,
    pub path: std::path::PathBuf,
    /// Set after an encode error; the capture keeps draining but stops writing.
    pub failed: bool,
}

impl ActiveCapture {
    /// Move up to `max_frames` from the ring buffer into the file.
    pub(crate) fn flush(
        &mut self,
        metrics: &CaptureMetrics,
        scratch: &mut [(f32, f32)],
        max_frames: usize,
    ) {
        let mut remaining = self.consumer.available().min(max_frames);

        while remaining > 0 {
            let chunk = remaining.min(scratch.len());
            let read = self.consumer.read_into(&mut scratch[..chunk]);
            if read == 0 {
                break;
            }
            remaining -= read;

            if self.failed {
                continue;
            }

            if let Err(e) = self.encode(&scratch[..read]) {
                tracing::warn!("Write to {} failed: {}", self.path.display(), e);
                self.failed = true;
                continue;
            }

            metrics.record_write(read as u64, read as u64 * self.spec.bytes_per_frame());
            self.consumer.add_frames_written(read as u64);
        }
    }

    fn encode(&mut self, frames: &[(f32, f32)]) -> std::result::Result<(), hound::Error> {
        let bits = self.spec.bit_depth;
        for &(left, right) in frames {
            self.file.write_sample(quantize(left, bits))?;
            if self.spec.channels > 1 {
                self.file.write_sample(quantize(right, bits))?;
            }
        }
        Ok(())
    }

    /// Drain everything left and write the final header.
    pub(crate) fn finalize(mut self, metrics: &CaptureMetrics, scratch: &mut [(f32, f32)]) {
        self.flush(metrics, scratch, usize::MAX);

        let meta = self.consumer.meta();
        let dropped = meta.frames_dropped();
        if dropped > 0 {
            metrics.record_dropped(dropped);
            tracing::warn!(
                "{} frames dropped while recording {}",
                dropped,
                self.path.display()
            );
        }
        let captured = meta.frames_captured();
        let written = meta.frames_written();

        match self.file.finalize() {
            Ok(()) => {
                metrics.record_finalized();
                tracing::info!(
                    "Finalized {} ({} of {} frames)",
                    self.path.display(),
                    written,
                    captured
                );
            }
            Err(e) => tracing::warn!("Failed to finalize {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CaptureBuffer;

    #[test]
    fn test_quantize_24_bit() {
        assert_eq!(quantize(0.0, 24), 0);
        assert_eq!(quantize(1.0, 24), 8_388_607);
        assert_eq!(quantize(-1.0, 24), -8_388_607);
        assert_eq!(quantize(2.0, 24), 8_388_607);
        assert_eq!(quantize(0.5, 16), 16_384);
        assert_eq!(quantize(1.0, 32), i32::MAX);

        let step = 1.0 / 8_388_607.0;
        for sample in [0.123_f32, -0.5, 0.999] {
            let decoded = quantize(sample, 24) as f32 * step;
            approx::assert_abs_diff_eq!(decoded, sample, epsilon = step);
        }
    }

    #[test]
    fn test_create_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p_C0.wav");
        std::fs::write(&path, b"not a wav file, much longer than a header would be").unwrap();

        let file = create_wav_file(&path, &CaptureSpec::stereo_24(48000)).unwrap();
        file.finalize().unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().bits_per_sample, 24);
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.duration(), 0);
    }

    #[test]
    fn test_unsupported_format_leaves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p_C0.wav");
        std::fs::write(&path, b"keep me").unwrap();

        let spec = CaptureSpec {
            bit_depth: 20,
            ..CaptureSpec::stereo_24(48000)
        };
        assert!(matches!(
            create_wav_file(&path, &spec),
            Err(CaptureError::UnsupportedFormat(_))
        ));
        assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
    }

    #[test]
    fn test_missing_directory_is_cannot_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("p_C0.wav");
        assert!(matches!(
            create_wav_file(&path, &CaptureSpec::stereo_24(48000)),
            Err(CaptureError::CannotCreateFile { .. })
        ));
    }

    #[test]
    fn test_flush_and_finalize_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let spec = CaptureSpec {
            channels: 1,
            ..CaptureSpec::stereo_24(44100)
        };
        let (mut prod, consumer) = CaptureBuffer::with_capacity(0);
        let mut capture = ActiveCapture {
            consumer,
            file: create_wav_file(&path, &spec).unwrap(),
            spec,
            path: path.clone(),
            failed: false,
        };

        prod.write_frames((0..1000).map(|_| (0.5, -0.5)));
        let metrics = CaptureMetrics::new();
        let mut scratch = vec![(0.0, 0.0); 256];
        capture.flush(&metrics, &mut scratch, 600);
        assert_eq!(metrics.frames_written(), 600);

        capture.finalize(&metrics, &mut scratch);
        assert_eq!(metrics.frames_written(), 1000);
        assert_eq!(metrics.finalized(), 1);

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 1000);
        let first: i32 = reader.samples::<i32>().next().unwrap().unwrap();
        assert_eq!(first, quantize(0.5, 24));
    }
}
