//! Vertical colorbar legend.

use geoplot_common::Color;

use crate::canvas::{Canvas, PixelRect};
use crate::colormap::{Colormap, Normalize};
use crate::format::TickFormat;
use crate::text::Label;
use crate::ticks::{nice_ticks, DEFAULT_MAX_BINS};

/// A colorbar for one continuous scale.
#[derive(Debug, Clone)]
pub struct Colorbar {
    pub cmap: Colormap,
    pub norm: Normalize,
    pub format: TickFormat,
    /// Draw tick marks and labels
    pub ticks_visible: bool,
}

/// Pixel geometry of a drawn colorbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorbarStyle {
    pub rect: PixelRect,
    pub outline: Color,
    pub outline_width: f32,
    pub tick_length: f32,
    /// Gap between tick end and label start
    pub label_pad: f32,
}

impl Colorbar {
    pub fn new(cmap: Colormap, norm: Normalize, format: TickFormat) -> Self {
        Self {
            cmap,
            norm,
            format,
            ticks_visible: true,
        }
    }

    pub fn with_ticks_visible(mut self, visible: bool) -> Self {
        self.ticks_visible = visible;
        self
    }

    /// Tick values along the bar; empty when ticks are hidden.
    pub fn tick_values(&self) -> Vec<f64> {
        if !self.ticks_visible {
            return Vec::new();
        }
        nice_ticks(self.norm.vmin, self.norm.vmax, DEFAULT_MAX_BINS)
    }

    /// Draw the color strip, outline and tick marks, returning the tick
    /// labels to render once the geometry is rasterized.
    pub fn draw(&self, canvas: &mut Canvas, style: &ColorbarStyle) -> Vec<Label> {
        let rect = style.rect;
        let rows = rect.height.round().max(1.0) as usize;
        let row_height = rect.height / rows as f32;

        // Row 0 is the top of the bar (highest value).
        for row in 0..rows {
            let t = 1.0 - (row as f64 + 0.5) / rows as f64;
            let color = self.cmap.sample(t);
            canvas.fill_rect(
                PixelRect::new(rect.x, rect.y + row as f32 * row_height, rect.width, row_height + 0.5),
                color,
            );
        }
        canvas.stroke_rect(rect, style.outline, style.outline_width);

        self.tick_values()
            .into_iter()
            .map(|value| {
                let y = self.value_to_y(value, &rect);
                let tick_end = rect.right() + style.tick_length;
                canvas.line((rect.right(), y), (tick_end, y), style.outline, style.outline_width);
                Label {
                    text: self.format.format(value),
                    x: tick_end + style.label_pad,
                    y,
                }
            })
            .collect()
    }

    fn value_to_y(&self, value: f64, rect: &PixelRect) -> f32 {
        let t = self.norm.apply(value) as f32;
        rect.bottom() - t * rect.height
    }
}
