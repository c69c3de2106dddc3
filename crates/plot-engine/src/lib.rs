//! Plot engine: parameter objects, data joining, visual encoding and
//! figure composition on top of the boundary store and renderer.
//!
//! ```ignore
//! let config = EngineConfig::from_file("geoplot.yaml")?;
//! let engine = Engine::from_config(config)?;
//! let request = PlotRequest::from_json(&std::fs::read_to_string("params.json")?)?;
//! let result = engine.render(&request)?;
//! std::fs::write("plot.png", &result.bytes)?;
//! ```

pub mod config;
pub mod draw;
pub mod encode;
pub mod engine;
pub mod join;
pub mod layout;
pub mod params;

pub use config::{ColorbarConfig, EdgeStyle, EngineConfig, FigureConfig, StyleConfig};
pub use engine::{Engine, RenderResult, RenderWarning};
pub use join::{join, Join, JoinedFeature};
pub use layout::{FracRect, Layout, LayoutConfig, Panel, PanelSpec};
pub use params::{
    Bins, BoundaryParams, BoundarySpec, BubbleParams, BubbleSpec, ChoroplethParams, ChoroplethSpec,
    ColorSpec, ColorValue, DataRow, DotParams, DotSpec, Hist2DParams, Hist2DSpec, PlotKind,
    PlotRequest, PlotRequestSpec, PointParams, SizeSpec,
};

pub use geoplot_common::{ErrorKind, ErrorPayload, Level, PlotError, PlotResult};
