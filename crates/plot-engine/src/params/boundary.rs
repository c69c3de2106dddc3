use geoplot_common::{Level, PlotError, PlotResult};
use serde::{Deserialize, Serialize};

use super::default_level;

/// Plain outline of every region at a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySpec {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for BoundarySpec {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BoundarySpec")]
pub struct BoundaryParams {
    pub level: Level,
}

impl TryFrom<BoundarySpec> for BoundaryParams {
    type Error = PlotError;

    fn try_from(spec: BoundarySpec) -> PlotResult<Self> {
        Ok(Self {
            level: spec.level.parse()?,
        })
    }
}

impl BoundaryParams {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}
