// src/error.rs
//! Errors raised while setting up a waterfall pipeline.

use thiserror::Error;

/// Setup failures. Per-tick numeric edge cases never surface here; they resolve to
/// zero intensity instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The transform length cannot be planned as a radix-2 FFT.
    #[error("unsupported frame length {0}: must be a power of two and at least 2")]
    UnsupportedFrameLength(usize),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
