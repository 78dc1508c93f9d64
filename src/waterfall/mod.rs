// src/waterfall/mod.rs
//! The scrolling waterfall region and the pipeline that feeds it.

pub mod layout;
pub mod pipeline;
pub mod surface;
pub mod writer;

pub use layout::{Pixel, WaterfallLayout};
pub use pipeline::{TickOutcome, WaterfallPipeline};
pub use surface::{PixelSurface, WaterfallImage};
pub use writer::WaterfallWriter;
