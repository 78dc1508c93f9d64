// src/audio/analysis/frame.rs
//! Pulls a decimated frame of the most recent samples out of the capture buffer.

use rustfft::num_complex::Complex;
use tracing::warn;

use crate::audio::capture::CaptureView;

/// Outcome of one extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// Slots that could not be read from the capture buffer and were zero-filled
    pub guarded_reads: usize,
    /// Whether the write index was outside the buffer and had to be wrapped
    pub write_index_wrapped: bool,
}

impl ExtractReport {
    pub fn is_clean(&self) -> bool {
        self.guarded_reads == 0 && !self.write_index_wrapped
    }
}

/// Reads `frame_length` samples, `stride` apart, ending at the capture write cursor.
#[derive(Debug, Clone)]
pub struct FrameExtractor {
    frame_length: usize,
    stride: usize,
}

impl FrameExtractor {
    pub fn new(frame_length: usize, stride: usize) -> Self {
        Self {
            frame_length,
            stride,
        }
    }

    /// Fill `frame` with the newest decimated samples as real parts, imaginary parts zeroed.
    ///
    /// The read starts `stride * frame_length` samples behind the write index
    /// and wraps modulo capacity. Any slot that cannot be read is zero-filled
    /// and counted in the returned report.
    pub fn extract(&self, capture: &CaptureView<'_>, frame: &mut [Complex<f32>]) -> ExtractReport {
        debug_assert_eq!(frame.len(), self.frame_length);

        let mut report = ExtractReport::default();
        let capacity = capture.capacity();

        if capacity == 0 {
            frame.fill(Complex::new(0.0, 0.0));
            report.guarded_reads = frame.len();
            warn!("capture buffer is empty; frame zero-filled");
            return report;
        }

        let mut write_index = capture.write_index;
        if write_index >= capacity {
            report.write_index_wrapped = true;
            write_index %= capacity;
        }

        let span = (self.stride * self.frame_length) as i64;
        let mut cursor = (write_index as i64 - span).rem_euclid(capacity as i64) as usize;
        let step = self.stride % capacity;

        for slot in frame.iter_mut() {
            let re = match capture.samples.get(cursor) {
                Some(&sample) => sample,
                None => {
                    report.guarded_reads += 1;
                    0.0
                }
            };
            *slot = Complex::new(re, 0.0);

            cursor += step;
            if cursor >= capacity {
                cursor -= capacity;
            }
        }

        if !report.is_clean() {
            warn!(
                guarded_reads = report.guarded_reads,
                write_index = capture.write_index,
                capacity,
                "frame extraction left the capture buffer bounds"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(len: usize) -> Vec<Complex<f32>> {
        vec![Complex::new(f32::NAN, f32::NAN); len]
    }

    fn ramp(capacity: usize) -> Vec<f32> {
        (0..capacity).map(|i| i as f32).collect()
    }

    #[test]
    fn test_reads_newest_samples_with_stride() {
        let samples = ramp(32);
        let extractor = FrameExtractor::new(4, 2);
        let mut out = frame(4);

        let report = extractor.extract(&CaptureView::new(&samples, 20), &mut out);
        assert!(report.is_clean());
        let real: Vec<f32> = out.iter().map(|c| c.re).collect();
        assert_eq!(real, vec![12.0, 14.0, 16.0, 18.0]);
        assert!(out.iter().all(|c| c.im == 0.0));
    }

    #[test]
    fn test_wraps_around_buffer_start() {
        let samples = ramp(16);
        let extractor = FrameExtractor::new(4, 2);
        let mut out = frame(4);

        extractor.extract(&CaptureView::new(&samples, 2), &mut out);
        let real: Vec<f32> = out.iter().map(|c| c.re).collect();
        assert_eq!(real, vec![10.0, 12.0, 14.0, 0.0]);
    }

    #[test]
    fn test_capacity_smaller_than_span() {
        let samples = ramp(5);
        let extractor = FrameExtractor::new(4, 2);
        let mut out = frame(4);

        let report = extractor.extract(&CaptureView::new(&samples, 0), &mut out);
        assert!(report.is_clean());
        // start = -8 mod 5 = 2
        let real: Vec<f32> = out.iter().map(|c| c.re).collect();
        assert_eq!(real, vec![2.0, 4.0, 1.0, 3.0]);
    }

    #[test]
    fn test_every_write_index_stays_in_bounds() {
        let capacity = 4096;
        let samples = ramp(capacity);
        let extractor = FrameExtractor::new(2048, 2);
        let mut out = frame(2048);

        for write_index in (0..capacity).step_by(7) {
            let report = extractor.extract(&CaptureView::new(&samples, write_index), &mut out);
            assert!(report.is_clean(), "write index {write_index} read out of bounds");
            assert_eq!(out.len(), 2048);
            assert!(out.iter().all(|c| c.re >= 0.0 && (c.re as usize) < capacity));
        }
    }

    #[test]
    fn test_out_of_range_write_index_is_wrapped() {
        let samples = ramp(16);
        let extractor = FrameExtractor::new(4, 2);
        let mut out = frame(4);

        let report = extractor.extract(&CaptureView::new(&samples, 18), &mut out);
        assert!(report.write_index_wrapped);
        let real: Vec<f32> = out.iter().map(|c| c.re).collect();
        assert_eq!(real, vec![10.0, 12.0, 14.0, 0.0]);
    }

    #[test]
    fn test_empty_capture_zero_fills() {
        let extractor = FrameExtractor::new(8, 2);
        let mut out = frame(8);

        let report = extractor.extract(&CaptureView::new(&[], 0), &mut out);
        assert_eq!(report.guarded_reads, 8);
        assert!(out.iter().all(|c| c.re == 0.0 && c.im == 0.0));
    }
}
