// src/config/mod.rs
//! Build-time configuration for the waterfall pipeline.
//!
//! The defaults describe the shipped display: a 256x256 waterfall fed by a
//! 2048-point transform. Tests and embedders can construct other shapes, but
//! every shape goes through [`WaterfallConfig::validate`] before a pipeline
//! is built from it.

use crate::error::{PipelineError, Result};

/// Width of the waterfall in pixels (one column per frequency bin).
pub const DISPLAY_WIDTH: usize = 256;
/// Number of visible rows (time slices).
pub const DISPLAY_HEIGHT: usize = 256;
/// Transform length as a multiple of the display width.
pub const FRAME_LENGTH_FACTOR: usize = 8;
/// Step between consecutive capture samples taken into a frame.
pub const DECIMATION_STRIDE: usize = 2;
/// Constant part of the per-bin frequency weighting.
pub const BASE_WEIGHT: f32 = 1024.0;
/// Per-bin slope of the frequency weighting.
pub const SLOPE_WEIGHT: f32 = 64.0;
/// Numerator of the magnitude scale factor (`SCALE_CONSTANT / frame_length`).
pub const SCALE_CONSTANT: f32 = 1024.0;
/// Display refresh rate the render loop aims for.
pub const REFRESH_RATE_HZ: u32 = 60;

/// Analysis window applied before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFamily {
    /// Strong sidelobe suppression, wide main lobe.
    #[default]
    Blackman,
    /// Raised cosine.
    Hann,
    /// No weighting.
    Rectangular,
}

/// Shape and tuning constants for one pipeline instance.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallConfig {
    /// Columns in the waterfall, and bins consumed from each spectrum
    pub display_width: usize,
    /// Visible rows in the waterfall
    pub display_height: usize,
    /// Transform length; must be a power of two
    pub frame_length: usize,
    /// Capture samples skipped per frame sample
    pub decimation_stride: usize,
    /// Frequency weighting: `base_weight + slope_weight * bin`
    pub base_weight: f32,
    pub slope_weight: f32,
    /// Magnitudes are scaled by `scale_constant / frame_length`
    pub scale_constant: f32,
    /// Window applied to the frame before the transform
    pub window: WindowFamily,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,
            frame_length: FRAME_LENGTH_FACTOR * DISPLAY_WIDTH,
            decimation_stride: DECIMATION_STRIDE,
            base_weight: BASE_WEIGHT,
            slope_weight: SLOPE_WEIGHT,
            scale_constant: SCALE_CONSTANT,
            window: WindowFamily::Blackman,
        }
    }
}

impl WaterfallConfig {
    /// Default tuning for a display of the given size, keeping the
    /// frame length at eight times the width.
    pub fn with_display(display_width: usize, display_height: usize) -> Self {
        Self {
            display_width,
            display_height,
            frame_length: FRAME_LENGTH_FACTOR * display_width,
            ..Self::default()
        }
    }

    /// Number of magnitude bins the analyzer produces.
    pub fn spectrum_len(&self) -> usize {
        self.frame_length / 2
    }

    /// Capture samples spanned by one frame.
    pub fn frame_span(&self) -> usize {
        self.frame_length * self.decimation_stride
    }

    /// Check every invariant the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        if self.display_width == 0 || self.display_height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "display must be non-empty, got {}x{}",
                self.display_width, self.display_height
            )));
        }
        if self.frame_length < 2 || !self.frame_length.is_power_of_two() {
            return Err(PipelineError::UnsupportedFrameLength(self.frame_length));
        }
        if self.spectrum_len() < self.display_width {
            return Err(PipelineError::InvalidConfig(format!(
                "frame length {} yields {} bins, fewer than display width {}",
                self.frame_length,
                self.spectrum_len(),
                self.display_width
            )));
        }
        if self.decimation_stride == 0 {
            return Err(PipelineError::InvalidConfig(
                "decimation stride must be at least 1".into(),
            ));
        }
        let weights = [self.base_weight, self.slope_weight, self.scale_constant];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(PipelineError::InvalidConfig(
                "weighting and scale constants must be finite".into(),
            ));
        }
        Ok(())
    }
}
