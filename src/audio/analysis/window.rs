// src/audio/analysis/window.rs
//! Analysis window coefficients, computed once per pipeline.

use std::f32::consts::PI;

use crate::config::WindowFamily;

/// Precomputed window weights, one per frame sample.
#[derive(Debug, Clone)]
pub struct AnalysisWindow {
    coefficients: Vec<f32>,
}

impl AnalysisWindow {
    /// Compute `len` coefficients of `family`.
    ///
    /// Windows are periodic (denominator `len`), so the last coefficient
    /// does not return to the first and consecutive frames tile cleanly.
    pub fn new(family: WindowFamily, len: usize) -> Self {
        let n = len as f32;
        let coefficients = (0..len)
            .map(|i| {
                let phase = 2.0 * PI * i as f32 / n;
                match family {
                    WindowFamily::Blackman => {
                        0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
                    }
                    WindowFamily::Hann => 0.5 * (1.0 - phase.cos()),
                    WindowFamily::Rectangular => 1.0,
                }
            })
            .collect();

        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }
}
