// src/ui/widgets/waterfall.rs
//! Terminal renderer for the waterfall region.
//!
//! Reads the scroll row from the control pixel, takes the `height`-tall
//! window that starts there and scales it onto the terminal area, two image
//! rows per cell using upper half blocks.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Block, Borders, Widget},
};

use crate::waterfall::{Pixel, WaterfallImage};

const UPPER_HALF: &str = "▀";

/// Stateless view of a waterfall image.
pub struct WaterfallView<'a> {
    image: &'a WaterfallImage,
}

impl<'a> WaterfallView<'a> {
    pub fn new(image: &'a WaterfallImage) -> Self {
        Self { image }
    }
}

/// Terminal colour for one pixel. Channels are clamped to [0, 1].
pub fn pixel_color(pixel: Pixel) -> Color {
    let channel = |v: f32| {
        if v.is_finite() {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            0
        }
    };
    Color::Rgb(channel(pixel[0]), channel(pixel[1]), channel(pixel[2]))
}

impl Widget for WaterfallView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.image.layout();
        if area.is_empty() || layout.width == 0 || layout.height == 0 {
            return;
        }

        let top = layout.window_top(self.image.scroll_row());
        let pixel_rows = area.height as usize * 2;
        let sample = |x: usize, y: usize| -> Pixel {
            let row = top + y * layout.height / pixel_rows;
            let col = x * layout.width / area.width as usize;
            self.image.pixel(row, col).unwrap_or([0.0; 4])
        };

        for cy in 0..area.height as usize {
            for cx in 0..area.width as usize {
                let upper = sample(cx, cy * 2);
                let lower = sample(cx, cy * 2 + 1);
                let position = (area.x + cx as u16, area.y + cy as u16);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_symbol(UPPER_HALF)
                        .set_fg(pixel_color(upper))
                        .set_bg(pixel_color(lower));
                }
            }
        }
    }
}

/// Render the waterfall inside a bordered panel.
pub fn render_waterfall(f: &mut Frame<'_>, area: Rect, image: &WaterfallImage, title: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string());
    let inner = block.inner(area);

    f.render_widget(block, area);
    f.render_widget(WaterfallView::new(image), inner);
}
