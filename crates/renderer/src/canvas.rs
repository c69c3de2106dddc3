//! Anti-aliased raster canvas for figure geometry.
//!
//! Coordinates are pixels with the origin at the top-left corner. Drawing
//! calls may be restricted to a rectangular clip region, which is how map
//! panels keep their content inside their frame.

use geoplot_common::{Color, PlotError, PlotResult};
use image::RgbaImage;
use tiny_skia::{
    FillRule, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

/// A pixel-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    fn to_skia(self) -> Option<Rect> {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

pub struct Canvas {
    pixmap: Pixmap,
    clip: Option<Mask>,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> PlotResult<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            PlotError::render(format!("cannot allocate {}x{} canvas", width, height))
        })?;
        pixmap.fill(skia_color(background));
        Ok(Self { pixmap, clip: None })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Restrict subsequent drawing to `rect`.
    pub fn set_clip(&mut self, rect: PixelRect) -> PlotResult<()> {
        let skia_rect = rect
            .to_skia()
            .ok_or_else(|| PlotError::render(format!("invalid clip rectangle {:?}", rect)))?;
        let mut mask = Mask::new(self.width(), self.height())
            .ok_or_else(|| PlotError::render("cannot allocate clip mask"))?;
        mask.fill_path(
            &PathBuilder::from_rect(skia_rect),
            FillRule::Winding,
            false,
            Transform::identity(),
        );
        self.clip = Some(mask);
        Ok(())
    }

    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    /// Fill a polygon given as rings (exterior and holes), even-odd rule.
    ///
    /// Rings with fewer than three points are ignored.
    pub fn fill_rings<R, P>(&mut self, rings: R, color: Color)
    where
        R: IntoIterator<Item = P>,
        P: IntoIterator<Item = (f32, f32)>,
    {
        if color.a == 0 {
            return;
        }
        if let Some(path) = rings_path(rings) {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::EvenOdd,
                Transform::identity(),
                self.clip.as_ref(),
            );
        }
    }

    /// Stroke closed rings.
    pub fn stroke_rings<R, P>(&mut self, rings: R, color: Color, width: f32)
    where
        R: IntoIterator<Item = P>,
        P: IntoIterator<Item = (f32, f32)>,
    {
        if color.a == 0 || width <= 0.0 {
            return;
        }
        if let Some(path) = rings_path(rings) {
            self.stroke(&path, color, width);
        }
    }

    /// Fill a circle, optionally with an outline.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, fill: Color, edge: Option<(Color, f32)>) {
        if radius <= 0.0 {
            return;
        }
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        if fill.a > 0 {
            self.pixmap.fill_path(
                &path,
                &paint(fill),
                FillRule::Winding,
                Transform::identity(),
                self.clip.as_ref(),
            );
        }
        if let Some((color, width)) = edge {
            if color.a > 0 && width > 0.0 {
                self.stroke(&path, color, width);
            }
        }
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        if color.a == 0 {
            return;
        }
        if let Some(r) = rect.to_skia() {
            self.pixmap
                .fill_rect(r, &paint(color), Transform::identity(), self.clip.as_ref());
        }
    }

    pub fn stroke_rect(&mut self, rect: PixelRect, color: Color, width: f32) {
        if let Some(r) = rect.to_skia() {
            self.stroke(&PathBuilder::from_rect(r), color, width);
        }
    }

    /// Straight line segment.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        if let Some(path) = pb.finish() {
            self.stroke(&path, color, width);
        }
    }

    fn stroke(&mut self, path: &Path, color: Color, width: f32) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            path,
            &paint(color),
            &stroke,
            Transform::identity(),
            self.clip.as_ref(),
        );
    }

    /// Straight-alpha RGBA copy of the canvas.
    pub fn into_image(self) -> RgbaImage {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut raw = Vec::with_capacity((width * height * 4) as usize);
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        // Buffer length always matches the pixmap dimensions.
        RgbaImage::from_raw(width, height, raw).unwrap_or_else(|| RgbaImage::new(width, height))
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn rings_path<R, P>(rings: R) -> Option<Path>
where
    R: IntoIterator<Item = P>,
    P: IntoIterator<Item = (f32, f32)>,
{
    let mut pb = PathBuilder::new();
    for ring in rings {
        let points: Vec<(f32, f32)> = ring.into_iter().collect();
        if points.len() < 3 {
            continue;
        }
        pb.move_to(points[0].0, points[0].1);
        for &(x, y) in &points[1..] {
            pb.line_to(x, y);
        }
        pb.close();
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, size: f32) -> Vec<(f32, f32)> {
        vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size)]
    }

    #[test]
    fn test_background_fill() {
        let canvas = Canvas::new(4, 3, Color::WHITE).unwrap();
        let img = canvas.into_image();
        assert_eq!(img.dimensions(), (4, 3));
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_fill_rings_with_hole() {
        let mut canvas = Canvas::new(40, 40, Color::WHITE).unwrap();
        canvas.fill_rings(vec![square(0.0, 0.0, 40.0), square(10.0, 10.0, 20.0)], Color::BLACK);
        let img = canvas.into_image();
        assert_eq!(img.get_pixel(5, 5).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(20, 20).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_clip_confines_drawing() {
        let mut canvas = Canvas::new(20, 20, Color::WHITE).unwrap();
        canvas.set_clip(PixelRect::new(0.0, 0.0, 10.0, 20.0)).unwrap();
        canvas.fill_rect(PixelRect::new(0.0, 0.0, 20.0, 20.0), Color::BLACK);
        canvas.clear_clip();
        let img = canvas.into_image();
        assert_eq!(img.get_pixel(5, 10).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(15, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_transparent_background_demultiplies() {
        let mut canvas = Canvas::new(10, 10, Color::TRANSPARENT).unwrap();
        canvas.fill_rect(PixelRect::new(0.0, 0.0, 10.0, 10.0), Color::new(255, 0, 0, 128));
        let px = canvas.into_image().get_pixel(5, 5).0;
        assert_eq!(px[3], 128);
        assert!(px[0] >= 254);
    }

    #[test]
    fn test_zero_size_canvas_is_error() {
        assert!(matches!(Canvas::new(0, 10, Color::WHITE), Err(PlotError::Render(_))));
    }
}
