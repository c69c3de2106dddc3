//! Engine configuration.
//!
//! Every field has a default matching the standard Taiwan figure, so an
//! empty YAML document is a valid configuration. A typical file:
//!
//! ```yaml
//! figure:
//!   dpi: 100
//! font: /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf
//! boundaries:
//!   county:
//!     path: res/shp/COUNTY_MOI_1090820.shp
//!     name_field: COUNTYNAME
//!   town:
//!     path: res/shp/TOWN_MOI_1120825.shp
//!     name_field: TOWNNAME
//!     parent_field: COUNTYNAME
//! ```

use boundary_store::BoundarySources;
use geoplot_common::{Color, PlotError, PlotResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::layout::{FracRect, LayoutConfig};

/// Largest accepted canvas side, in pixels.
const MAX_CANVAS_SIDE: f64 = 16_384.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub figure: FigureConfig,
    pub style: StyleConfig,
    pub colorbar: ColorbarConfig,
    /// TrueType font for colorbar labels; labels are skipped without one
    pub font: Option<PathBuf>,
    /// Geometry source for each level
    pub boundaries: BoundarySources,
    pub layout: LayoutConfig,
}

/// Canvas size and base colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
    pub background: Color,
    /// Fill of regions without a data value
    pub no_data: Color,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: 14.65,
            height_in: 16.0,
            dpi: 200.0,
            background: Color::WHITE,
            no_data: Color::rgb(0xe0, 0xe0, 0xe0),
        }
    }
}

impl FigureConfig {
    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round() as u32,
            (self.height_in * self.dpi).round() as u32,
        )
    }

    /// Pixels per typographic point.
    pub fn px_per_pt(&self) -> f64 {
        self.dpi / 72.0
    }
}

/// A line style; width in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub color: Color,
    pub width_pt: f64,
}

impl EdgeStyle {
    pub const fn new(color: Color, width_pt: f64) -> Self {
        Self { color, width_pt }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub county_edge: EdgeStyle,
    pub town_edge: EdgeStyle,
    /// Border of framed inset panels
    pub panel_frame: EdgeStyle,
    /// Outline of bubble markers
    pub marker_edge: EdgeStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            county_edge: EdgeStyle::new(Color::BLACK, 0.8),
            town_edge: EdgeStyle::new(Color::rgb(0x80, 0x80, 0x80), 0.5),
            panel_frame: EdgeStyle::new(Color::BLACK, 0.8),
            marker_edge: EdgeStyle::new(Color::BLACK, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorbarConfig {
    /// Placement within the figure, bottom-left origin
    pub rect: FracRect,
    pub outline: EdgeStyle,
    pub tick_length_pt: f64,
    pub label_pad_pt: f64,
    pub font_size_pt: f64,
    pub label_color: Color,
}

impl Default for ColorbarConfig {
    fn default() -> Self {
        Self {
            rect: FracRect::new(0.877, 0.2825, 0.023, 0.425),
            outline: EdgeStyle::new(Color::BLACK, 0.8),
            tick_length_pt: 3.5,
            label_pad_pt: 3.5,
            font_size_pt: 18.0,
            label_color: Color::BLACK,
        }
    }
}

impl EngineConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PlotError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
            Some("json") => Self::from_json(&contents)?,
            _ => {
                return Err(PlotError::Config(format!(
                    "unsupported config format: {}",
                    path.display()
                )))
            }
        };

        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> PlotResult<Self> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|e| PlotError::Config(format!("invalid YAML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(contents: &str) -> PlotResult<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| PlotError::Config(format!("invalid JSON config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Same configuration at a different resolution.
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.figure.dpi = dpi;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        let fig = &self.figure;
        for (name, value) in [
            ("figure.width_in", fig.width_in),
            ("figure.height_in", fig.height_in),
            ("figure.dpi", fig.dpi),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlotError::Config(format!("{} must be positive, got {}", name, value)));
            }
        }
        let (w, h) = (fig.width_in * fig.dpi, fig.height_in * fig.dpi);
        if w.round() < 1.0 || h.round() < 1.0 || w > MAX_CANVAS_SIDE || h > MAX_CANVAS_SIDE {
            return Err(PlotError::Config(format!(
                "canvas of {:.0}x{:.0} px is outside 1..={}",
                w, h, MAX_CANVAS_SIDE
            )));
        }

        let style = &self.style;
        for (name, edge) in [
            ("style.county_edge", style.county_edge),
            ("style.town_edge", style.town_edge),
            ("style.panel_frame", style.panel_frame),
            ("style.marker_edge", style.marker_edge),
            ("colorbar.outline", self.colorbar.outline),
        ] {
            if !(edge.width_pt.is_finite() && edge.width_pt >= 0.0) {
                return Err(PlotError::Config(format!("{} width must be >= 0", name)));
            }
        }

        let cb = &self.colorbar;
        if !(cb.font_size_pt.is_finite() && cb.font_size_pt > 0.0) {
            return Err(PlotError::Config("colorbar.font_size_pt must be positive".into()));
        }
        if !(cb.rect.width > 0.0 && cb.rect.height > 0.0) {
            return Err(PlotError::Config("colorbar.rect must have a positive size".into()));
        }

        self.layout.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoplot_common::Level;

    #[test]
    fn test_default_figure_size() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.figure.pixel_size(), (2930, 3200));
        assert!(config.font.is_none());
        assert!(config.boundaries.is_empty());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = EngineConfig::from_yaml("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_yaml_with_boundaries() {
        let config = EngineConfig::from_yaml(
            r##"
figure:
  dpi: 50
  no_data: "#cccccc"
boundaries:
  county:
    path: counties.geojson
    name_field: COUNTYNAME
  town:
    path: towns.shp
    name_field: TOWNNAME
    parent_field: COUNTYNAME
"##,
        )
        .unwrap();

        assert_eq!(config.figure.dpi, 50.0);
        assert_eq!(config.figure.width_in, 14.65);
        assert_eq!(config.figure.no_data, Color::rgb(0xcc, 0xcc, 0xcc));
        assert_eq!(
            config.boundaries[&Level::Town].parent_field.as_deref(),
            Some("COUNTYNAME")
        );
    }

    #[test]
    fn test_json_partial_override() {
        let config = EngineConfig::from_json(r#"{"style": {"county_edge": {"color": "red", "width_pt": 1.5}}}"#).unwrap();
        assert_eq!(config.style.county_edge, EdgeStyle::new(Color::rgb(255, 0, 0), 1.5));
        assert_eq!(config.style.town_edge, StyleConfig::default().town_edge);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(
            EngineConfig::default().with_dpi(0.0).validate(),
            Err(PlotError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_yaml("figure: {dpi: -3}"),
            Err(PlotError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_yaml("figure: [1, 2]"),
            Err(PlotError::Config(_))
        ));
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("engine.yaml");
        std::fs::write(&yaml, "figure:\n  dpi: 72\n").unwrap();
        assert_eq!(EngineConfig::from_file(&yaml).unwrap().figure.dpi, 72.0);

        let toml = dir.path().join("engine.toml");
        std::fs::write(&toml, "").unwrap();
        assert!(matches!(EngineConfig::from_file(&toml), Err(PlotError::Config(_))));
    }
}
