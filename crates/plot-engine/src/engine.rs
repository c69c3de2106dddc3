//! Render entry points.

use boundary_store::BoundaryStore;
use geoplot_common::{Level, PlotResult};
use rayon::prelude::*;
use renderer::{png, LabelFont};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::draw::Figure;
use crate::encode::{encode_choropleth, encode_markers, Hist2DGrid};
use crate::join::join;
use crate::layout::Layout;
use crate::params::{
    BoundaryParams, BubbleParams, ChoroplethParams, DotParams, Hist2DParams, PlotKind, PlotRequest,
    PointParams,
};

/// A non-fatal problem noticed while rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderWarning {
    /// Data rows whose key matched no region
    UnmatchedKeys { keys: Vec<String> },
    /// Every value was equal; all regions share the midpoint color
    DegenerateScale { value: f64 },
    /// Boundaries for an optional layer could not be loaded
    MissingBoundaries { level: Level, message: String },
    /// Colorbar labels were not drawn for lack of a font
    LabelsSkipped { count: usize },
}

/// A finished image.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
    /// Regions, histogram cells or markers drawn
    pub elements: usize,
    pub warnings: Vec<RenderWarning>,
}

/// The plot engine: configuration, boundaries and a resolved layout.
///
/// `Engine` is `Send + Sync`; render calls share nothing but the boundary
/// store and may run concurrently.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    store: Arc<BoundaryStore>,
    layout: Layout,
    font: Option<LabelFont>,
}

impl Engine {
    pub fn new(config: EngineConfig, store: Arc<BoundaryStore>) -> PlotResult<Self> {
        config.validate()?;
        let font = config.font.as_ref().map(|path| LabelFont::from_file(path)).transpose()?;
        let (width, height) = config.figure.pixel_size();
        let layout = Layout::resolve(&config.layout, width, height)?;
        tracing::info!(
            width,
            height,
            panels = layout.panels().len(),
            font = font.is_some(),
            "plot engine ready"
        );
        Ok(Self {
            config,
            store,
            layout,
            font,
        })
    }

    /// Engine with its own boundary store over the configured sources.
    pub fn from_config(config: EngineConfig) -> PlotResult<Self> {
        let store = Arc::new(BoundaryStore::new(config.boundaries.clone()));
        Self::new(config, store)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn store(&self) -> &Arc<BoundaryStore> {
        &self.store
    }

    pub fn render(&self, request: &PlotRequest) -> PlotResult<RenderResult> {
        match request {
            PlotRequest::Choropleth(p) => self.choropleth(p),
            PlotRequest::Hist2D(p) => self.hist2d(p),
            PlotRequest::Dot(p) => self.dot(p),
            PlotRequest::Bubble(p) => self.bubble(p),
            PlotRequest::Boundary(p) => self.boundary(p),
        }
    }

    pub fn choropleth(&self, params: &ChoroplethParams) -> PlotResult<RenderResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();
        let features = self.store.get(params.level)?;

        let joined = join(&params.rows, params.level, features)?;
        if !joined.unmatched_keys.is_empty() {
            warnings.push(RenderWarning::UnmatchedKeys {
                keys: joined.unmatched_keys.clone(),
            });
        }
        let encoding = encode_choropleth(&joined, params, self.config.figure.no_data)?;
        if encoding.degenerate {
            warnings.push(RenderWarning::DegenerateScale {
                value: encoding.colorbar.norm.vmin,
            });
        }

        let style = &self.config.style;
        let mut figure = Figure::new(&self.config, &self.layout)?;
        figure.fill_regions(&encoding.fills)?;
        let edge = match params.level {
            Level::County => style.county_edge,
            Level::Town => style.town_edge,
        };
        figure.stroke_features(features, edge)?;
        // Enclosing regions are outlined on top.
        if let Some(parent) = params.level.parent() {
            match self.store.get(parent) {
                Ok(parents) => figure.stroke_features(parents, style.county_edge)?,
                Err(e) => self.missing_boundaries(&mut warnings, parent, &e.to_string()),
            }
        }
        figure.frames();
        figure.colorbar(&encoding.colorbar);

        self.finish(PlotKind::Choropleth, figure, encoding.fills.len(), warnings, start)
    }

    pub fn hist2d(&self, params: &Hist2DParams) -> PlotResult<RenderResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        // Every panel bins over its own extent.
        let grids = self
            .layout
            .panels()
            .par_iter()
            .map(|panel| Hist2DGrid::bin(&params.x, &params.y, panel.extent, params.nx, params.ny))
            .collect::<PlotResult<Vec<_>>>()?;

        let mut figure = Figure::new(&self.config, &self.layout)?;
        self.backdrop(&mut figure, &mut warnings)?;
        let mut elements = 0;
        for (panel, grid) in self.layout.panels().iter().zip(&grids) {
            let cells = grid.cells(&params.cmap, params.cmin, params.alpha);
            elements += cells.len();
            figure.hist_cells(panel, &cells)?;
        }
        figure.frames();

        self.finish(PlotKind::Hist2d, figure, elements, warnings, start)
    }

    pub fn dot(&self, params: &DotParams) -> PlotResult<RenderResult> {
        self.scatter(PlotKind::Dot, &params.points, false)
    }

    pub fn bubble(&self, params: &BubbleParams) -> PlotResult<RenderResult> {
        self.scatter(PlotKind::Bubble, &params.points, true)
    }

    /// Plain outline of every region at a level.
    pub fn boundary(&self, params: &BoundaryParams) -> PlotResult<RenderResult> {
        let start = Instant::now();
        let outline = self.store.get_outline(params.level)?;

        let mut figure = Figure::new(&self.config, &self.layout)?;
        figure.stroke_features(outline.features, self.config.style.county_edge)?;
        figure.frames();

        self.finish(PlotKind::Boundary, figure, outline.features.len(), Vec::new(), start)
    }

    fn scatter(
        &self,
        kind: PlotKind,
        points: &PointParams,
        outlined: bool,
    ) -> PlotResult<RenderResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();
        let markers = encode_markers(points)?;

        let mut figure = Figure::new(&self.config, &self.layout)?;
        self.backdrop(&mut figure, &mut warnings)?;
        let edge = outlined.then_some(self.config.style.marker_edge);
        figure.markers(&markers, edge)?;
        figure.frames();

        self.finish(kind, figure, markers.len(), warnings, start)
    }

    /// County outline under point plots. Optional: a load failure is a warning.
    fn backdrop(&self, figure: &mut Figure<'_>, warnings: &mut Vec<RenderWarning>) -> PlotResult<()> {
        match self.store.get(Level::County) {
            Ok(features) => figure.stroke_features(features, self.config.style.county_edge),
            Err(e) => {
                self.missing_boundaries(warnings, Level::County, &e.to_string());
                Ok(())
            }
        }
    }

    fn missing_boundaries(&self, warnings: &mut Vec<RenderWarning>, level: Level, message: &str) {
        tracing::warn!(level = %level, error = %message, "rendering without boundaries");
        warnings.push(RenderWarning::MissingBoundaries {
            level,
            message: message.to_string(),
        });
    }

    fn finish(
        &self,
        kind: PlotKind,
        figure: Figure<'_>,
        elements: usize,
        mut warnings: Vec<RenderWarning>,
        start: Instant,
    ) -> PlotResult<RenderResult> {
        let labels = figure.pending_labels();
        if labels > 0 && self.font.is_none() {
            warnings.push(RenderWarning::LabelsSkipped { count: labels });
        }
        let draw_ms = start.elapsed().as_millis() as u64;

        let image = figure.finish(self.font.as_ref());
        let bytes = png::encode_image(&image)?;

        tracing::debug!(
            kind = %kind,
            elements,
            warnings = warnings.len(),
            draw_ms,
            total_ms = start.elapsed().as_millis() as u64,
            bytes = bytes.len(),
            "rendered plot"
        );

        Ok(RenderResult {
            bytes,
            content_type: png::CONTENT_TYPE,
            width: image.width(),
            height: image.height(),
            elements,
            warnings,
        })
    }
}
