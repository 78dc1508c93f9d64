// src/waterfall/pipeline.rs
//! One waterfall session: capture frame in, published row out.

use rustfft::num_complex::Complex;
use tracing::{debug, trace};

use super::layout::WaterfallLayout;
use super::surface::{PixelSurface, WaterfallImage};
use super::writer::WaterfallWriter;
use crate::audio::analysis::{
    AdaptiveNormalizer, ExtractReport, FrameExtractor, RunningExtrema, SpectralAnalyzer,
};
use crate::audio::capture::CaptureView;
use crate::config::WaterfallConfig;
use crate::error::{PipelineError, Result};

/// Result of a single refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The pipeline is disabled; nothing changed.
    Paused,
    /// A new row was published.
    Written {
        frame_count: u64,
        scroll_row: usize,
        extract: ExtractReport,
    },
}

/// Owns every piece of session state: the analysis buffers, the running
/// extrema and the published surface.
///
/// The renderer reads `surface()` first in each refresh, then [`tick`] writes
/// the next row, so a row becomes visible one refresh after it is computed.
///
/// [`tick`]: WaterfallPipeline::tick
pub struct WaterfallPipeline<S = WaterfallImage> {
    config: WaterfallConfig,
    extractor: FrameExtractor,
    analyzer: SpectralAnalyzer,
    normalizer: AdaptiveNormalizer,
    writer: WaterfallWriter,
    surface: S,
    /// Complex frame handed to the transform
    frame: Vec<Complex<f32>>,
    /// Latest normalized spectrum, `display_width` long
    normalized: Vec<f32>,
    frame_count: u64,
    enabled: bool,
}

impl WaterfallPipeline<WaterfallImage> {
    /// Build a pipeline publishing into an in-memory image.
    pub fn new(config: WaterfallConfig) -> Result<Self> {
        let layout = WaterfallLayout::new(config.display_width, config.display_height);
        Self::with_surface(config, WaterfallImage::new(layout))
    }
}

impl<S: PixelSurface> WaterfallPipeline<S> {
    /// Build a pipeline publishing into `surface`, which must be large enough
    /// for the layout of `config`.
    pub fn with_surface(config: WaterfallConfig, surface: S) -> Result<Self> {
        config.validate()?;

        let layout = WaterfallLayout::new(config.display_width, config.display_height);
        if surface.len_pixels() < layout.total_pixels() {
            return Err(PipelineError::InvalidConfig(format!(
                "surface holds {} pixels, layout needs {}",
                surface.len_pixels(),
                layout.total_pixels()
            )));
        }

        let analyzer =
            SpectralAnalyzer::new(config.frame_length, config.window, config.scale_constant)?;
        debug!(
            width = config.display_width,
            height = config.display_height,
            frame_length = config.frame_length,
            "waterfall pipeline ready"
        );

        Ok(Self {
            extractor: FrameExtractor::new(config.frame_length, config.decimation_stride),
            analyzer,
            normalizer: AdaptiveNormalizer::new(config.base_weight, config.slope_weight),
            writer: WaterfallWriter::new(layout),
            surface,
            frame: vec![Complex::new(0.0, 0.0); config.frame_length],
            normalized: vec![0.0; config.display_width],
            frame_count: 0,
            enabled: true,
            config,
        })
    }

    pub fn config(&self) -> &WaterfallConfig {
        &self.config
    }

    pub fn layout(&self) -> WaterfallLayout {
        self.writer.layout()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn analyzer(&self) -> &SpectralAnalyzer {
        &self.analyzer
    }

    /// Latest normalized spectrum.
    pub fn normalized(&self) -> &[f32] {
        &self.normalized
    }

    pub fn extrema(&self) -> RunningExtrema {
        self.normalizer.extrema()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            debug!(enabled, "waterfall toggled");
        }
        self.enabled = enabled;
    }

    pub fn toggle_enabled(&mut self) {
        self.set_enabled(!self.enabled);
    }

    /// Run extraction, transform and normalization on the newest capture data,
    /// leaving the result in [`normalized`](Self::normalized).
    pub fn analyze(&mut self, capture: &CaptureView<'_>) -> ExtractReport {
        let report = self.extractor.extract(capture, &mut self.frame);
        let magnitudes = self.analyzer.analyze(&mut self.frame);
        self.normalizer.normalize(magnitudes, &mut self.normalized);
        report
    }

    /// Write the current normalized spectrum as the row for `frame_count`.
    pub fn publish(&mut self, frame_count: u64) -> usize {
        self.writer
            .write(&mut self.surface, &self.normalized, frame_count)
    }

    /// Advance one refresh: bump the frame counter, analyze and publish.
    /// A disabled pipeline leaves every piece of state untouched.
    pub fn tick(&mut self, capture: &CaptureView<'_>) -> TickOutcome {
        if !self.enabled {
            return TickOutcome::Paused;
        }

        self.frame_count += 1;
        let extract = self.analyze(capture);
        let scroll_row = self.publish(self.frame_count);
        trace!(frame_count = self.frame_count, scroll_row, "row published");

        TickOutcome::Written {
            frame_count: self.frame_count,
            scroll_row,
            extract,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> WaterfallConfig {
        WaterfallConfig::with_display(32, 8)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = WaterfallConfig {
            frame_length: 300,
            ..small_config()
        };
        assert!(matches!(
            WaterfallPipeline::new(config),
            Err(PipelineError::UnsupportedFrameLength(300))
        ));
    }

    #[test]
    fn test_rejects_undersized_surface() {
        let mut mapped = vec![0.0f32; 16];
        let result = WaterfallPipeline::with_surface(small_config(), mapped.as_mut_slice());
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_tick_advances_frame_and_scroll() {
        let mut pipeline = WaterfallPipeline::new(small_config()).unwrap();
        let samples = vec![0.0; 1024];
        let capture = CaptureView::new(&samples, 0);

        for expected in 1..=10u64 {
            match pipeline.tick(&capture) {
                TickOutcome::Written {
                    frame_count,
                    scroll_row,
                    extract,
                } => {
                    assert_eq!(frame_count, expected);
                    assert_eq!(scroll_row, (expected % 8) as usize);
                    assert!(extract.is_clean());
                }
                TickOutcome::Paused => panic!("pipeline should be enabled"),
            }
        }
        assert_eq!(pipeline.surface().scroll_row(), 2);
    }

    #[test]
    fn test_paused_tick_changes_nothing() {
        let mut pipeline = WaterfallPipeline::new(small_config()).unwrap();
        let samples: Vec<f32> = (0..1024).map(|i| ((i * 37) % 101) as f32 / 50.0 - 1.0).collect();
        let capture = CaptureView::new(&samples, 500);
        pipeline.tick(&capture);

        let image = pipeline.surface().clone();
        let extrema = pipeline.extrema();

        pipeline.set_enabled(false);
        pipeline.set_enabled(false);
        for _ in 0..5 {
            assert_eq!(pipeline.tick(&capture), TickOutcome::Paused);
        }
        assert_eq!(pipeline.frame_count(), 1);
        assert_eq!(pipeline.extrema(), extrema);
        assert_eq!(pipeline.surface(), &image);

        pipeline.toggle_enabled();
        assert!(matches!(
            pipeline.tick(&capture),
            TickOutcome::Written { frame_count: 2, .. }
        ));
    }

    #[test]
    fn test_independent_instances() {
        let mut loud = WaterfallPipeline::new(small_config()).unwrap();
        let quiet = WaterfallPipeline::new(small_config()).unwrap();

        let samples: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.3).sin()).collect();
        loud.tick(&CaptureView::new(&samples, 0));

        assert!(loud.extrema().is_initialized());
        assert!(!quiet.extrema().is_initialized());
        assert_eq!(quiet.frame_count(), 0);
    }

    #[test]
    fn test_publishes_into_mapped_floats() {
        let config = small_config();
        let layout = WaterfallLayout::new(config.display_width, config.display_height);
        let mut mapped = vec![0.0f32; layout.total_pixels() * 4];

        let samples = vec![0.0; 1024];
        {
            let mut pipeline =
                WaterfallPipeline::with_surface(config, mapped.as_mut_slice()).unwrap();
            pipeline.tick(&CaptureView::new(&samples, 0));
            pipeline.tick(&CaptureView::new(&samples, 0));
        }

        assert_eq!(mapped[layout.control_index() * 4], 2.0);
        let primary = layout.pixel_index(layout.primary_row(2), 0) * 4;
        assert_eq!(&mapped[primary..primary + 4], &[0.0, 0.0, 0.0, 1.0]);
    }
}
