//! Text labels drawn onto a finished raster.

use geoplot_common::{Color, PlotError, PlotResult};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use std::path::Path;

/// A TrueType/OpenType font used for tick labels.
#[derive(Clone)]
pub struct LabelFont {
    font: Font<'static>,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont").finish_non_exhaustive()
    }
}

impl LabelFont {
    pub fn from_file(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            PlotError::Config(format!("failed to read font {}: {}", path.display(), e))
        })?;
        Self::from_bytes(bytes).map_err(|_| {
            PlotError::Config(format!("{} is not a usable font file", path.display()))
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> PlotResult<Self> {
        Font::try_from_vec(bytes)
            .map(|font| Self { font })
            .ok_or_else(|| PlotError::Config("invalid font data".to_string()))
    }

    /// Width and height in pixels of `text` at `size_px`.
    pub fn measure(&self, text: &str, size_px: f32) -> (i32, i32) {
        text_size(Scale::uniform(size_px), &self.font, text)
    }
}

/// A label to place. Text starts at `x`; `y` is its vertical center.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Draw `labels` onto `image`.
///
/// With no font every label is skipped and a warning is logged once.
pub fn draw_labels(
    image: &mut RgbaImage,
    labels: &[Label],
    font: Option<&LabelFont>,
    size_px: f32,
    color: Color,
) {
    if labels.is_empty() {
        return;
    }
    let Some(font) = font else {
        tracing::warn!(labels = labels.len(), "no label font configured, skipping labels");
        return;
    };

    let scale = Scale::uniform(size_px);
    let rgba = Rgba([color.r, color.g, color.b, color.a]);

    for label in labels {
        let (_, h) = font.measure(&label.text, size_px);
        let x = label.x.round() as i32;
        let y = (label.y - h as f32 / 2.0).round() as i32;
        draw_text_mut(image, rgba, x, y, scale, &font.font, &label.text);
    }
}
