// src/waterfall/surface.rs
//! Pixel regions the waterfall can be published into.

use tracing::warn;

use super::layout::{CHANNELS, Pixel, WaterfallLayout};

/// A mapped pixel region laid out as described in [`super::layout`].
///
/// Implemented by the in-memory [`WaterfallImage`] and by raw `f32` slices,
/// so a GPU buffer mapping can be written exactly like the software image.
pub trait PixelSurface {
    /// Capacity of the region in pixels.
    fn len_pixels(&self) -> usize;

    /// Copy `pixels` into the region starting at pixel `offset`.
    ///
    /// Writes past the end of the region are an internal defect: the
    /// in-bounds part is written and the rest is dropped with a warning.
    fn write_pixels(&mut self, offset: usize, pixels: &[Pixel]);
}

impl<T: PixelSurface + ?Sized> PixelSurface for &mut T {
    fn len_pixels(&self) -> usize {
        (**self).len_pixels()
    }

    fn write_pixels(&mut self, offset: usize, pixels: &[Pixel]) {
        (**self).write_pixels(offset, pixels);
    }
}

/// A flat float mapping, four channels per pixel.
impl PixelSurface for [f32] {
    fn len_pixels(&self) -> usize {
        self.len() / CHANNELS
    }

    fn write_pixels(&mut self, offset: usize, pixels: &[Pixel]) {
        let fit = clip(offset, pixels.len(), self.len_pixels());
        if fit == 0 {
            return;
        }
        let start = offset * CHANNELS;
        self[start..start + fit * CHANNELS].copy_from_slice(pixels[..fit].as_flattened());
    }
}

/// Number of pixels that fit at `offset` in a region of `len` pixels.
fn clip(offset: usize, count: usize, len: usize) -> usize {
    let fit = len.saturating_sub(offset).min(count);
    if fit < count {
        warn!(offset, count, len, "pixel write past end of surface clipped");
    }
    fit
}

/// Software copy of the waterfall region.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallImage {
    layout: WaterfallLayout,
    pixels: Vec<Pixel>,
}

impl WaterfallImage {
    /// Allocate a zeroed region for `layout`.
    pub fn new(layout: WaterfallLayout) -> Self {
        Self {
            layout,
            pixels: vec![[0.0; CHANNELS]; layout.total_pixels()],
        }
    }

    pub fn layout(&self) -> WaterfallLayout {
        self.layout
    }

    /// Pixel at `(row, col)` of the image part.
    pub fn pixel(&self, row: usize, col: usize) -> Option<Pixel> {
        if row >= self.layout.image_rows() || col >= self.layout.width {
            return None;
        }
        self.pixels.get(self.layout.pixel_index(row, col)).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[Pixel]> {
        if row >= self.layout.image_rows() {
            return None;
        }
        let start = self.layout.pixel_index(row, 0);
        self.pixels.get(start..start + self.layout.width)
    }

    pub fn control(&self) -> Pixel {
        self.pixels[self.layout.control_index()]
    }

    /// Scroll row recorded in the control pixel, or 0 if it holds garbage.
    pub fn scroll_row(&self) -> usize {
        let raw = self.control()[0];
        if raw.is_finite() && raw >= 0.0 && (raw as usize) < self.layout.height {
            raw as usize
        } else {
            0
        }
    }

    /// The `height` rows currently on screen, newest first.
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Pixel]> + '_ {
        let top = self.layout.window_top(self.scroll_row());
        (top..top + self.layout.height).filter_map(move |row| self.row(row))
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// The region as flat floats, ready for upload.
    pub fn as_floats(&self) -> &[f32] {
        self.pixels.as_flattened()
    }
}

impl PixelSurface for WaterfallImage {
    fn len_pixels(&self) -> usize {
        self.pixels.len()
    }

    fn write_pixels(&mut self, offset: usize, pixels: &[Pixel]) {
        let fit = clip(offset, pixels.len(), self.pixels.len());
        if fit == 0 {
            return;
        }
        self.pixels[offset..offset + fit].copy_from_slice(&pixels[..fit]);
    }
}
