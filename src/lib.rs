// src/lib.rs
//! Waterfall - a real-time audio spectrum waterfall.
//!
//! Captured audio is windowed, transformed and adaptively normalized once per
//! display refresh, and each resulting spectrum is appended as a row to a
//! double-height scrolling image that a renderer reads without copying.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod ui;
pub mod waterfall;

pub use config::WaterfallConfig;
pub use error::PipelineError;
pub use waterfall::{TickOutcome, WaterfallPipeline};
