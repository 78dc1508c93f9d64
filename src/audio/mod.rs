// src/audio/mod.rs
//! Audio module - capture, playback and spectral analysis.

pub mod analysis;
pub mod capture;
pub mod player;
pub mod sample_capture;

// Re-export commonly used types
pub use capture::{CaptureBuffer, CaptureView};
pub use player::{PlaybackSource, Player};
pub use sample_capture::SampleCapture;
