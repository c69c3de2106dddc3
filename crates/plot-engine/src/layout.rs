//! Figure layout: map panels and their placement on the canvas.
//!
//! Placement is given in fractions with a bottom-left origin. Panel
//! rectangles are fractions of the map axes, and the axes rectangle is a
//! fraction of the whole figure. [`Layout::resolve`] turns them into pixel
//! frames for a concrete canvas size.

use geoplot_common::{BoundingBox, PlotError, PlotResult};
use renderer::PixelRect;
use serde::{Deserialize, Serialize};

/// A rectangle in fractional units, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FracRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FracRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub const FULL: FracRect = FracRect::new(0.0, 0.0, 1.0, 1.0);

    /// `self` placed inside `parent`.
    pub fn within(&self, parent: &FracRect) -> FracRect {
        FracRect::new(
            parent.x + self.x * parent.width,
            parent.y + self.y * parent.height,
            self.width * parent.width,
            self.height * parent.height,
        )
    }

    /// Pixel rectangle on a `width`×`height` canvas (top-left origin).
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let (w, h) = (width as f64, height as f64);
        PixelRect::new(
            (self.x * w) as f32,
            ((1.0 - self.y - self.height) * h) as f32,
            (self.width * w) as f32,
            (self.height * h) as f32,
        )
    }

    fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height].iter().all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// One map panel as configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub name: String,
    /// Geographic extent shown (lon/lat)
    pub extent: BoundingBox,
    /// Placement within the map axes
    pub rect: FracRect,
    /// Draw a border around the panel
    #[serde(default = "default_framed")]
    pub framed: bool,
}

fn default_framed() -> bool {
    true
}

/// All panels of a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Map axes within the figure
    pub axes: FracRect,
    pub panels: Vec<PanelSpec>,
}

/// Default map axes.
const AXES: FracRect = FracRect::new(0.125, 0.11, 0.775, 0.77);

// Inset columns and widths, in axes fractions.
const INSET_X: f64 = 0.02;
const SUB_INSET_X: f64 = 0.19;
const INSET_WIDTH: f64 = 0.21;
const SUB_INSET_WIDTH: f64 = 0.06;
const INSET_GAP: f64 = 0.01;
const FIRST_INSET_Y: f64 = 0.35;

impl LayoutConfig {
    /// Taiwan with its outlying islands as insets: Penghu, Kinmen (with
    /// Wuqiu) and Lienchiang (with Dongyin and Juguang).
    pub fn taiwan() -> Self {
        let taiwan = BoundingBox::new(118.9, 21.75, 122.6, 25.35);
        let penghu = BoundingBox::new(119.3, 23.16, 119.74, 23.86);
        let kinmen = BoundingBox::new(118.1, 24.34, 118.6, 24.56);
        let wuqiu = BoundingBox::new(119.42, 24.96, 119.5, 25.02);
        let lienchiang = BoundingBox::new(119.86, 26.12, 120.1, 26.30);
        let dongyin = BoundingBox::new(120.45, 26.34, 120.52, 26.4);
        let juguang = BoundingBox::new(119.91, 25.93, 120.0, 26.0);

        let mut panels = vec![PanelSpec {
            name: "taiwan".into(),
            extent: taiwan,
            rect: FracRect::FULL,
            framed: false,
        }];
        let mut push = |name: &str, extent: BoundingBox, rect: FracRect| {
            panels.push(PanelSpec {
                name: name.into(),
                extent,
                rect,
                framed: true,
            })
        };

        let mut y = FIRST_INSET_Y;
        let h = INSET_WIDTH * penghu.aspect();
        push("penghu", penghu, FracRect::new(INSET_X, y, INSET_WIDTH, h));

        y += h + INSET_GAP;
        let h = INSET_WIDTH * kinmen.aspect();
        push("kinmen", kinmen, FracRect::new(INSET_X, y, INSET_WIDTH, h));
        let sub = SUB_INSET_WIDTH * wuqiu.aspect();
        push("kinmen-wuqiu", wuqiu, FracRect::new(SUB_INSET_X, y + sub - 0.02, SUB_INSET_WIDTH, sub));

        y += h + INSET_GAP;
        let h = INSET_WIDTH * lienchiang.aspect();
        push("lienchiang", lienchiang, FracRect::new(INSET_X, y, INSET_WIDTH, h));
        let sub = SUB_INSET_WIDTH * dongyin.aspect();
        push("lienchiang-dongyin", dongyin, FracRect::new(SUB_INSET_X, y + sub - 0.03, SUB_INSET_WIDTH, sub));
        let sub = SUB_INSET_WIDTH * juguang.aspect();
        push("lienchiang-juguang", juguang, FracRect::new(SUB_INSET_X, y + sub + 0.05, SUB_INSET_WIDTH, sub));

        Self { axes: AXES, panels }
    }

    /// A single unframed panel over `extent`.
    pub fn single(extent: BoundingBox) -> Self {
        Self {
            axes: AXES,
            panels: vec![PanelSpec {
                name: "main".into(),
                extent,
                rect: FracRect::FULL,
                framed: false,
            }],
        }
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.axes.is_valid() {
            return Err(PlotError::Config(format!("invalid map axes {:?}", self.axes)));
        }
        if self.panels.is_empty() {
            return Err(PlotError::Config("layout has no panels".into()));
        }
        for panel in &self.panels {
            if !panel.extent.is_valid() {
                return Err(PlotError::Config(format!(
                    "panel '{}' has an empty or non-finite extent",
                    panel.name
                )));
            }
            if !panel.rect.is_valid() {
                return Err(PlotError::Config(format!(
                    "panel '{}' has an invalid placement",
                    panel.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::taiwan()
    }
}

/// A panel resolved to pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub name: String,
    pub extent: BoundingBox,
    pub frame: PixelRect,
    pub framed: bool,
}

impl Panel {
    /// Pixel position of a lon/lat coordinate. `None` for non-finite input.
    ///
    /// Points outside the extent project outside the frame.
    pub fn project(&self, x: f64, y: f64) -> Option<(f32, f32)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let fx = (x - self.extent.min_x) / self.extent.width();
        let fy = (self.extent.max_y - y) / self.extent.height();
        Some((
            self.frame.x + (fx * self.frame.width as f64) as f32,
            self.frame.y + (fy * self.frame.height as f64) as f32,
        ))
    }
}

/// Resolved layout for one canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    panels: Vec<Panel>,
}

impl Layout {
    pub fn resolve(config: &LayoutConfig, width: u32, height: u32) -> PlotResult<Self> {
        config.validate()?;
        let panels = config
            .panels
            .iter()
            .map(|spec| Panel {
                name: spec.name.clone(),
                extent: spec.extent,
                frame: spec.rect.within(&config.axes).to_pixels(width, height),
                framed: spec.framed,
            })
            .collect();
        Ok(Self {
            width,
            height,
            panels,
        })
    }

    /// Panels in drawing order (main panel first).
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.name == name)
    }
}
