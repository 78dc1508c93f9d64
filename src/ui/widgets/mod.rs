// src/ui/widgets/mod.rs
//! Custom widgets for the waterfall UI.

pub mod status;
pub mod waterfall;

// Re-export widget rendering functions
pub use status::{Status, render_status};
pub use waterfall::{WaterfallView, render_waterfall};
