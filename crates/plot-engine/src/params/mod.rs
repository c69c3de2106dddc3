//! Parameter objects: one validated, immutable struct per plot kind.
//!
//! Each kind comes in two forms. The `*Spec` struct is what callers send:
//! plain serde data with documented defaults. The `*Params` struct is built
//! from a spec by `TryFrom` and holds resolved values (parsed level,
//! colormap, per-point sizes and colors). Every validation error is raised
//! there, before any geometry is touched.

mod boundary;
mod choropleth;
mod hist2d;
mod points;
mod request;

pub use boundary::{BoundaryParams, BoundarySpec};
pub use choropleth::{ChoroplethParams, ChoroplethSpec, DataRow};
pub use hist2d::{Bins, Hist2DParams, Hist2DSpec};
pub use points::{
    BubbleParams, BubbleSpec, ColorSpec, ColorValue, DotParams, DotSpec, PointParams, SizeSpec,
};
pub use request::{PlotKind, PlotRequest, PlotRequestSpec};

use geoplot_common::{PlotError, PlotResult};

fn check_alpha(alpha: f64) -> PlotResult<f64> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(alpha)
    } else {
        Err(PlotError::invalid_parameter(
            "alpha",
            format!("must be within 0..=1, got {}", alpha),
        ))
    }
}

fn check_len(field: &str, expected: usize, actual: usize) -> PlotResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(PlotError::length_mismatch(field, expected, actual))
    }
}

fn default_level() -> String {
    "county".to_string()
}

fn default_gnbu() -> String {
    "GnBu".to_string()
}

fn default_viridis() -> String {
    "viridis".to_string()
}

fn default_point_alpha() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}
