//! Drawing encoded plots onto a figure canvas.
//!
//! Each layer is drawn panel by panel with the canvas clipped to the panel
//! frame, so inset content never spills over the main map.

use boundary_store::BoundaryFeature;
use geoplot_common::{PlotError, PlotResult};
use image::RgbaImage;
use renderer::{draw_labels, Canvas, Colorbar, ColorbarStyle, Label, LabelFont, PixelRect};

use crate::config::{EdgeStyle, EngineConfig};
use crate::encode::{HistCell, Marker, RegionFill};
use crate::layout::{Layout, Panel};

type Ring = Vec<(f32, f32)>;

pub struct Figure<'a> {
    canvas: Canvas,
    layout: &'a Layout,
    config: &'a EngineConfig,
    labels: Vec<Label>,
}

impl<'a> Figure<'a> {
    pub fn new(config: &'a EngineConfig, layout: &'a Layout) -> PlotResult<Self> {
        let canvas = Canvas::new(layout.width, layout.height, config.figure.background)?;
        Ok(Self {
            canvas,
            layout,
            config,
            labels: Vec::new(),
        })
    }

    fn px(&self, pt: f64) -> f32 {
        (pt * self.config.figure.px_per_pt()) as f32
    }

    /// Run `draw` once per panel with drawing clipped to the panel frame.
    fn each_panel<F>(&mut self, mut draw: F) -> PlotResult<()>
    where
        F: FnMut(&mut Canvas, &Panel) -> PlotResult<()>,
    {
        for panel in self.layout.panels() {
            self.canvas.set_clip(panel.frame)?;
            let result = draw(&mut self.canvas, panel);
            self.canvas.clear_clip();
            result?;
        }
        Ok(())
    }

    /// Fill regions in order.
    pub fn fill_regions(&mut self, fills: &[RegionFill<'_>]) -> PlotResult<()> {
        self.each_panel(|canvas, panel| {
            for fill in fills.iter().filter(|f| f.feature.bbox.intersects(&panel.extent)) {
                canvas.fill_rings(project_rings(panel, fill.feature)?, fill.color);
            }
            Ok(())
        })
    }

    /// Stroke the outline of every feature.
    pub fn stroke_features(&mut self, features: &[BoundaryFeature], edge: EdgeStyle) -> PlotResult<()> {
        let width = self.px(edge.width_pt);
        self.each_panel(|canvas, panel| {
            for feature in features.iter().filter(|f| f.bbox.intersects(&panel.extent)) {
                canvas.stroke_rings(project_rings(panel, feature)?, edge.color, width);
            }
            Ok(())
        })
    }

    /// Histogram cells of one panel, snapped to whole pixels.
    pub fn hist_cells(&mut self, panel: &Panel, cells: &[HistCell]) -> PlotResult<()> {
        self.canvas.set_clip(panel.frame)?;
        for cell in cells {
            let b = cell.bounds;
            let (Some((x0, y0)), Some((x1, y1))) =
                (panel.project(b.min_x, b.max_y), panel.project(b.max_x, b.min_y))
            else {
                continue;
            };
            let (x0, y0, x1, y1) = (x0.round(), y0.round(), x1.round(), y1.round());
            if x1 > x0 && y1 > y0 {
                self.canvas.fill_rect(PixelRect::new(x0, y0, x1 - x0, y1 - y0), cell.color);
            }
        }
        self.canvas.clear_clip();
        Ok(())
    }

    /// Scatter markers in input order, optionally outlined.
    pub fn markers(&mut self, markers: &[Marker], edge: Option<EdgeStyle>) -> PlotResult<()> {
        let px_per_pt = self.config.figure.px_per_pt();
        let edge = edge.map(|e| (e.color, self.px(e.width_pt)));
        self.each_panel(|canvas, panel| {
            let frame = panel.frame;
            for marker in markers {
                let (cx, cy) = panel.project(marker.x, marker.y).ok_or_else(|| {
                    PlotError::render(format!("marker at ({}, {}) cannot be projected", marker.x, marker.y))
                })?;
                let r = marker.radius_px(px_per_pt);
                let outside = cx + r < frame.x
                    || cx - r > frame.right()
                    || cy + r < frame.y
                    || cy - r > frame.bottom();
                if !outside {
                    canvas.circle(cx, cy, r, marker.fill, edge);
                }
            }
            Ok(())
        })
    }

    /// Border around every framed panel.
    pub fn frames(&mut self) {
        let edge = self.config.style.panel_frame;
        let width = self.px(edge.width_pt);
        for panel in self.layout.panels().iter().filter(|p| p.framed) {
            self.canvas.stroke_rect(panel.frame, edge.color, width);
        }
    }

    /// Colorbar at its configured place; labels are queued for [`finish`](Self::finish).
    pub fn colorbar(&mut self, colorbar: &Colorbar) {
        let cb = &self.config.colorbar;
        let style = ColorbarStyle {
            rect: cb.rect.to_pixels(self.layout.width, self.layout.height),
            outline: cb.outline.color,
            outline_width: self.px(cb.outline.width_pt),
            tick_length: self.px(cb.tick_length_pt),
            label_pad: self.px(cb.label_pad_pt),
        };
        let labels = colorbar.draw(&mut self.canvas, &style);
        self.labels.extend(labels);
    }

    /// Labels waiting to be drawn.
    pub fn pending_labels(&self) -> usize {
        self.labels.len()
    }

    /// Rasterize and draw queued labels.
    pub fn finish(self, font: Option<&LabelFont>) -> RgbaImage {
        let size_px = self.px(self.config.colorbar.font_size_pt);
        let color = self.config.colorbar.label_color;
        let mut image = self.canvas.into_image();
        draw_labels(&mut image, &self.labels, font, size_px, color);
        image
    }
}

fn project_rings(panel: &Panel, feature: &BoundaryFeature) -> PlotResult<Vec<Ring>> {
    feature
        .rings()
        .map(|ring| {
            ring.coords()
                .map(|c| {
                    panel.project(c.x, c.y).ok_or_else(|| {
                        PlotError::render(format!(
                            "region '{}' has a non-finite coordinate",
                            feature.name
                        ))
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutConfig;
    use geo::{polygon, MultiPolygon};
    use geoplot_common::{BoundingBox, Color};

    fn setup() -> (EngineConfig, Layout) {
        let config = EngineConfig::default().with_dpi(20.0);
        let (w, h) = config.figure.pixel_size();
        let layout = Layout::resolve(&LayoutConfig::single(BoundingBox::new(0.0, 0.0, 10.0, 10.0)), w, h).unwrap();
        (config, layout)
    }

    fn square(x: f64, y: f64, size: f64) -> BoundaryFeature {
        let geometry = MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]]);
        BoundaryFeature::new("sq", None, geometry).unwrap()
    }

    fn pixel(image: &RgbaImage, panel: &Panel, x: f64, y: f64) -> [u8; 4] {
        let (px, py) = panel.project(x, y).unwrap();
        image.get_pixel(px as u32, py as u32).0
    }

    #[test]
    fn test_fill_and_clip() {
        let (config, layout) = setup();
        let feature = square(2.0, 2.0, 4.0);
        // reaches past the panel's right edge
        let wide = square(8.0, 8.0, 6.0);
        let red = Color::rgb(255, 0, 0);

        let mut figure = Figure::new(&config, &layout).unwrap();
        let fills = [
            RegionFill { feature: &feature, value: Some(1.0), color: red },
            RegionFill { feature: &wide, value: None, color: red },
        ];
        figure.fill_regions(&fills).unwrap();
        let image = figure.finish(None);

        let panel = layout.panel("main").unwrap();
        assert_eq!(pixel(&image, panel, 4.0, 4.0), [255, 0, 0, 255]);
        assert_eq!(pixel(&image, panel, 1.0, 1.0), [255, 255, 255, 255]);

        let frame = panel.frame;
        let beyond = image.get_pixel(frame.right() as u32 + 3, (frame.y + 2.0) as u32);
        assert_eq!(beyond.0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_markers_and_labels_queue() {
        let (config, layout) = setup();
        let mut figure = Figure::new(&config, &layout).unwrap();
        let marker = Marker { x: 5.0, y: 5.0, radius_pt: 20.0, fill: Color::BLACK };
        figure.markers(&[marker], None).unwrap();
        assert_eq!(figure.pending_labels(), 0);
        let image = figure.finish(None);

        let panel = layout.panel("main").unwrap();
        assert_eq!(pixel(&image, panel, 5.0, 5.0), [0, 0, 0, 255]);
    }
}
