// src/waterfall/writer.rs
//! Appends one spectrum row per frame to a waterfall surface.

use super::layout::{Pixel, WaterfallLayout};
use super::surface::PixelSurface;

/// Alpha written with every spectrum pixel.
const OPAQUE: f32 = 1.0;

/// Writes rows into the double-height region. Holds no frame counter: the same
/// spectrum and frame count always produce the same region contents.
#[derive(Debug, Clone)]
pub struct WaterfallWriter {
    layout: WaterfallLayout,
    /// Pixel row assembled before each publish
    row: Vec<Pixel>,
}

impl WaterfallWriter {
    pub fn new(layout: WaterfallLayout) -> Self {
        Self {
            layout,
            row: vec![[0.0, 0.0, 0.0, OPAQUE]; layout.width],
        }
    }

    pub fn layout(&self) -> WaterfallLayout {
        self.layout
    }

    /// Write `spectrum` as the row for `frame_count` and update the control
    /// pixel. Columns beyond the end of `spectrum` are written black.
    /// Returns the scroll row written.
    pub fn write<S>(&mut self, surface: &mut S, spectrum: &[f32], frame_count: u64) -> usize
    where
        S: PixelSurface + ?Sized,
    {
        let layout = self.layout;
        let scroll_row = layout.scroll_row(frame_count);

        for (col, pixel) in self.row.iter_mut().enumerate() {
            let v = spectrum.get(col).copied().unwrap_or(0.0);
            *pixel = [v, v, v, OPAQUE];
        }

        surface.write_pixels(layout.pixel_index(layout.primary_row(scroll_row), 0), &self.row);
        surface.write_pixels(layout.pixel_index(layout.mirror_row(scroll_row), 0), &self.row);
        surface.write_pixels(layout.control_index(), &[[scroll_row as f32, 0.0, 0.0, 0.0]]);

        scroll_row
    }
}
