// src/audio/analysis/spectrum.rs
//! Windowed forward FFT producing per-bin power.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};
use tracing::debug;

use super::window::AnalysisWindow;
use crate::config::WindowFamily;
use crate::error::{PipelineError, Result};

/// FFT front end: windows a frame, transforms it in place and keeps the
/// scaled magnitude-squared of the lower half of the spectrum.
pub struct SpectralAnalyzer {
    /// Planned forward transform of `frame_length` points
    fft: Arc<dyn Fft<f32>>,
    /// Scratch space for the in-place transform
    scratch: Vec<Complex<f32>>,
    /// Window coefficients, `frame_length` long
    window: AnalysisWindow,
    /// Magnitude-squared of bins `0..frame_length / 2`
    magnitudes: Vec<f32>,
    /// `scale_constant / frame_length`
    scale: f32,
    frame_length: usize,
}

impl SpectralAnalyzer {
    /// Plan the transform and compute the window. Fails when `frame_length` is
    /// not a power of two of at least 2.
    pub fn new(frame_length: usize, window: WindowFamily, scale_constant: f32) -> Result<Self> {
        if frame_length < 2 || !frame_length.is_power_of_two() {
            return Err(PipelineError::UnsupportedFrameLength(frame_length));
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_length);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        debug!(frame_length, ?window, "spectral analyzer planned");

        Ok(Self {
            fft,
            scratch,
            window: AnalysisWindow::new(window, frame_length),
            magnitudes: vec![0.0; frame_length / 2],
            scale: scale_constant / frame_length as f32,
            frame_length,
        })
    }

    pub fn window(&self) -> &AnalysisWindow {
        &self.window
    }

    /// Transform `frame` in place and return the scaled power spectrum.
    ///
    /// Only the first half of the frame is multiplied by the window; the
    /// second half enters the transform unweighted.
    pub fn analyze(&mut self, frame: &mut [Complex<f32>]) -> &[f32] {
        debug_assert_eq!(frame.len(), self.frame_length);

        let half = self.frame_length / 2;
        for (sample, &w) in frame[..half]
            .iter_mut()
            .zip(&self.window.coefficients()[..half])
        {
            sample.re *= w;
        }

        self.fft.process_with_scratch(frame, &mut self.scratch);

        for (magnitude, bin) in self.magnitudes.iter_mut().zip(&frame[..half]) {
            *magnitude = bin.norm_sqr() * self.scale;
        }
        &self.magnitudes
    }

    /// Most recent spectrum.
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// Index of the strongest bin in the most recent spectrum, ignoring DC.
    pub fn peak_bin(&self) -> Option<usize> {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, m)| m.is_finite() && **m > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }

    /// Centre frequency of `bin` in Hz, for a capture running at `sample_rate`
    /// decimated by `stride`.
    pub fn bin_frequency(&self, bin: usize, sample_rate: f32, stride: usize) -> f32 {
        let effective_rate = sample_rate / stride.max(1) as f32;
        bin as f32 * effective_rate / self.frame_length as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(len: usize, bin: f32, amplitude: f32) -> Vec<Complex<f32>> {
        (0..len)
            .map(|n| {
                let phase = 2.0 * PI * bin * n as f32 / len as f32;
                Complex::new(amplitude * phase.sin(), 0.0)
            })
            .collect()
    }

    #[test]
    fn test_rejects_unsupported_lengths() {
        for len in [0, 1, 3, 1000] {
            assert_eq!(
                SpectralAnalyzer::new(len, WindowFamily::Blackman, 1024.0).err(),
                Some(PipelineError::UnsupportedFrameLength(len))
            );
        }
    }

    #[test]
    fn test_output_length_is_half_frame() {
        let mut analyzer = SpectralAnalyzer::new(512, WindowFamily::Blackman, 1024.0).unwrap();
        assert_eq!(analyzer.window().coefficients().len(), 512);

        let mut frame = tone(512, 10.0, 1.0);
        assert_eq!(analyzer.analyze(&mut frame).len(), 256);
        assert_eq!(analyzer.magnitudes().len(), 256);
    }

    #[test]
    fn test_silence_gives_zero_spectrum() {
        let mut analyzer = SpectralAnalyzer::new(2048, WindowFamily::Blackman, 1024.0).unwrap();
        let mut frame = vec![Complex::new(0.0, 0.0); 2048];
        let magnitudes = analyzer.analyze(&mut frame);
        assert_eq!(magnitudes.len(), 1024);
        assert!(magnitudes.iter().all(|&m| m == 0.0));
        assert_eq!(analyzer.peak_bin(), None);
    }

    #[test]
    fn test_rectangular_tone_power_and_scale() {
        // Unwindowed sine of amplitude A at an exact bin gives |X|^2 = (A N / 2)^2
        let len = 256;
        let mut analyzer = SpectralAnalyzer::new(len, WindowFamily::Rectangular, 1024.0).unwrap();
        let mut frame = tone(len, 16.0, 1.0);
        let magnitudes = analyzer.analyze(&mut frame);

        let expected = (len as f32 / 2.0).powi(2) * 1024.0 / len as f32;
        assert!(
            (magnitudes[16] - expected).abs() / expected < 1e-3,
            "bin 16 = {}, expected {}",
            magnitudes[16],
            expected
        );
        assert_eq!(analyzer.peak_bin(), Some(16));
    }

    #[test]
    fn test_blackman_tone_peaks_near_bin() {
        let mut analyzer = SpectralAnalyzer::new(2048, WindowFamily::Blackman, 1024.0).unwrap();
        let mut frame = tone(2048, 100.0, 0.5);
        analyzer.analyze(&mut frame);

        let peak = analyzer.peak_bin().unwrap();
        assert!(peak.abs_diff(100) <= 1, "peak at bin {peak}, expected ~100");
    }

    #[test]
    fn test_only_first_half_is_windowed() {
        let mut analyzer = SpectralAnalyzer::new(8, WindowFamily::Blackman, 8.0).unwrap();
        // Impulse in the second half passes through unweighted: flat spectrum of 1
        let mut frame = vec![Complex::new(0.0, 0.0); 8];
        frame[6] = Complex::new(1.0, 0.0);
        let magnitudes = analyzer.analyze(&mut frame).to_vec();
        assert!(magnitudes.iter().all(|&m| (m - 1.0).abs() < 1e-6), "{magnitudes:?}");

        // Impulse at index 0 meets a zero window coefficient
        let mut frame = vec![Complex::new(0.0, 0.0); 8];
        frame[0] = Complex::new(1.0, 0.0);
        let magnitudes = analyzer.analyze(&mut frame);
        assert!(magnitudes.iter().all(|&m| m < 1e-10), "{magnitudes:?}");
    }

    #[test]
    fn test_bin_frequency_accounts_for_decimation() {
        let analyzer = SpectralAnalyzer::new(2048, WindowFamily::Blackman, 1024.0).unwrap();
        // 48 kHz decimated by 2 -> 24 kHz over 2048 bins
        let hz = analyzer.bin_frequency(128, 48_000.0, 2);
        assert!((hz - 1500.0).abs() < 1e-3);
    }
}
