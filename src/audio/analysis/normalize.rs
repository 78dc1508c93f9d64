// src/audio/analysis/normalize.rs
//! Self-calibrating log scaling of spectra into display intensity.

/// Session-wide bounds of the weighted magnitude. Only ever widens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningExtrema {
    pub min: f32,
    pub max: f32,
}

impl RunningExtrema {
    /// Sentinels that the first finite observation replaces on both sides.
    pub const INITIAL_MIN: f32 = 1.0e12;
    pub const INITIAL_MAX: f32 = -1.0e12;

    /// Fold `x` into the bounds.
    pub fn observe(&mut self, x: f32) {
        if x > self.max {
            self.max = x;
        }
        if x < self.min {
            self.min = x;
        }
    }

    /// `true` once at least one finite value has been observed.
    pub fn is_initialized(&self) -> bool {
        self.max >= self.min
    }
}

impl Default for RunningExtrema {
    fn default() -> Self {
        Self {
            min: Self::INITIAL_MIN,
            max: Self::INITIAL_MAX,
        }
    }
}

/// Maps raw bin magnitudes to `[0, 1]` using frequency weighting and the
/// log of the headroom above the running floor.
#[derive(Debug, Clone)]
pub struct AdaptiveNormalizer {
    base_weight: f32,
    slope_weight: f32,
    extrema: RunningExtrema,
}

impl AdaptiveNormalizer {
    pub fn new(base_weight: f32, slope_weight: f32) -> Self {
        Self {
            base_weight,
            slope_weight,
            extrema: RunningExtrema::default(),
        }
    }

    pub fn extrema(&self) -> RunningExtrema {
        self.extrema
    }

    /// Weighted value of `magnitude` at `bin`.
    pub fn weight(&self, bin: usize, magnitude: f32) -> f32 {
        (self.base_weight + self.slope_weight * bin as f32) * magnitude
    }

    /// Normalize one bin, widening the extrema as a side effect.
    pub fn normalize_bin(&mut self, bin: usize, magnitude: f32) -> f32 {
        let x = self.weight(bin, magnitude);
        if !x.is_finite() {
            return 0.0;
        }

        self.extrema.observe(x);
        let RunningExtrema { min, max } = self.extrema;
        if x <= min {
            return 0.0;
        }

        let x = x.max(1.0);
        let range = (max - min).ln() - 1.0f32.ln();
        if !range.is_finite() || range <= 0.0 {
            return 0.0;
        }
        let u = (x - min).ln() - 1.0f32.ln();
        let y = u / range;
        if y.is_finite() { y.clamp(0.0, 1.0) } else { 0.0 }
    }

    /// Normalize the first `out.len()` bins of `magnitudes` into `out`.
    /// Bins missing from `magnitudes` are written as 0.
    pub fn normalize(&mut self, magnitudes: &[f32], out: &mut [f32]) {
        for (bin, slot) in out.iter_mut().enumerate() {
            *slot = match magnitudes.get(bin) {
                Some(&m) => self.normalize_bin(bin, m),
                None => 0.0,
            };
        }
    }
}
