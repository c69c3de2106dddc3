use geoplot_common::{PlotError, PlotResult};
use renderer::Colormap;
use serde::{Deserialize, Serialize};

use super::{check_alpha, check_len, default_gnbu, default_point_alpha};

/// Largest accepted bin count per axis.
const MAX_BINS: u32 = 4096;

/// Bin resolution: one count for both axes, or `[nx, ny]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bins {
    Square(u32),
    Pair([u32; 2]),
}

impl Default for Bins {
    fn default() -> Self {
        Bins::Square(100)
    }
}

impl Bins {
    /// `(nx, ny)`
    pub fn counts(&self) -> (u32, u32) {
        match *self {
            Bins::Square(n) => (n, n),
            Bins::Pair([nx, ny]) => (nx, ny),
        }
    }
}

/// 2D histogram request as sent by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist2DSpec {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub bins: Bins,
    #[serde(default = "default_gnbu")]
    pub cmap: String,
    #[serde(default = "default_point_alpha")]
    pub alpha: f64,
    /// Cells with fewer points are not drawn
    #[serde(default = "default_cmin")]
    pub cmin: u32,
}

fn default_cmin() -> u32 {
    1
}

impl Hist2DSpec {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x,
            y,
            bins: Bins::default(),
            cmap: default_gnbu(),
            alpha: default_point_alpha(),
            cmin: default_cmin(),
        }
    }
}

/// Validated 2D histogram parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Hist2DSpec")]
pub struct Hist2DParams {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub nx: usize,
    pub ny: usize,
    pub cmap: Colormap,
    pub alpha: f64,
    pub cmin: u32,
}

impl TryFrom<Hist2DSpec> for Hist2DParams {
    type Error = PlotError;

    fn try_from(spec: Hist2DSpec) -> PlotResult<Self> {
        check_len("y", spec.x.len(), spec.y.len())?;
        let cmap = Colormap::lookup(&spec.cmap)?;
        let alpha = check_alpha(spec.alpha)?;

        let (nx, ny) = spec.bins.counts();
        if !(1..=MAX_BINS).contains(&nx) || !(1..=MAX_BINS).contains(&ny) {
            return Err(PlotError::invalid_parameter(
                "bins",
                format!("each axis needs 1..={} bins, got {}x{}", MAX_BINS, nx, ny),
            ));
        }

        Ok(Self {
            x: spec.x,
            y: spec.y,
            nx: nx as usize,
            ny: ny as usize,
            cmap,
            alpha,
            cmin: spec.cmin,
        })
    }
}

impl Hist2DParams {
    pub fn from_spec(spec: Hist2DSpec) -> PlotResult<Self> {
        spec.try_into()
    }
}
