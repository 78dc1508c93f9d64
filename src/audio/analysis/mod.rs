// src/audio/analysis/mod.rs
//! Frame extraction, spectral analysis and adaptive normalization.

mod frame;
mod normalize;
mod spectrum;
mod window;

pub use frame::{ExtractReport, FrameExtractor};
pub use normalize::{AdaptiveNormalizer, RunningExtrema};
pub use spectrum::SpectralAnalyzer;
pub use window::AnalysisWindow;
