// src/waterfall/layout.rs
//! Memory layout of the double-height waterfall region shared with the renderer.
//!
//! The region is row-major, `width` pixels per row, each pixel four `f32`
//! channels (RGBA, 16 bytes):
//!
//! ```text
//! row 0            never written
//! rows 1..=height  primary copy, newest row at `height - scroll_row`
//! rows height+1..=2*height
//!                  mirror copy, newest row at `2 * height - scroll_row`
//! pixel width * (2 * height + 1)
//!                  control pixel: [scroll_row, 0, 0, 0]
//! ```
//!
//! Because every row exists twice, the `height` rows starting at
//! [`WaterfallLayout::window_top`] always read as one unbroken image with the
//! newest row on top, no matter where the scroll position is.

/// One RGBA pixel.
pub type Pixel = [f32; 4];

pub const CHANNELS: usize = 4;
pub const BYTES_PER_PIXEL: usize = CHANNELS * std::mem::size_of::<f32>();

/// Geometry of a waterfall region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterfallLayout {
    pub width: usize,
    pub height: usize,
}

impl WaterfallLayout {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Rows in the image part of the region (excluding the control pixel).
    pub fn image_rows(&self) -> usize {
        2 * self.height + 1
    }

    /// Flat pixel index of `(row, col)`.
    pub fn pixel_index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Flat pixel index of the control pixel.
    pub fn control_index(&self) -> usize {
        self.width * self.image_rows()
    }

    /// Pixels in the whole region, control pixel included.
    pub fn total_pixels(&self) -> usize {
        self.control_index() + 1
    }

    pub fn byte_len(&self) -> usize {
        self.total_pixels() * BYTES_PER_PIXEL
    }

    /// Scroll row written for `frame_count`.
    pub fn scroll_row(&self, frame_count: u64) -> usize {
        (frame_count % self.height as u64) as usize
    }

    /// Primary row holding the spectrum written at `scroll_row`.
    pub fn primary_row(&self, scroll_row: usize) -> usize {
        self.height - scroll_row
    }

    /// Mirror row holding the same spectrum, `height` rows further down.
    pub fn mirror_row(&self, scroll_row: usize) -> usize {
        self.primary_row(scroll_row) + self.height
    }

    /// First row of the `height`-tall window that shows the newest row on top.
    pub fn window_top(&self, scroll_row: usize) -> usize {
        self.primary_row(scroll_row)
    }
}
