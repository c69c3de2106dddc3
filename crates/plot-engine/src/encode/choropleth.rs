use boundary_store::BoundaryFeature;
use geoplot_common::{Color, PlotError, PlotResult};
use renderer::{Colorbar, Normalize};

use crate::join::Join;
use crate::params::ChoroplethParams;

/// Fill color of one region.
#[derive(Debug, Clone, Copy)]
pub struct RegionFill<'a> {
    pub feature: &'a BoundaryFeature,
    pub value: Option<f64>,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct ChoroplethEncoding<'a> {
    /// One fill per feature, in feature order
    pub fills: Vec<RegionFill<'a>>,
    pub colorbar: Colorbar,
    /// All values equal: every region got the scale midpoint
    pub degenerate: bool,
}

/// Color every joined region.
///
/// The scale spans the matched values unless `vmin`/`vmax` override an end.
/// Values outside the scale clamp to its ends; regions without a value get
/// `no_data`.
pub fn encode_choropleth<'a>(
    join: &Join<'a>,
    params: &ChoroplethParams,
    no_data: Color,
) -> PlotResult<ChoroplethEncoding<'a>> {
    let data = Normalize::from_values(join.values())
        .ok_or_else(|| PlotError::EmptyJoin(params.level.to_string()))?;
    let vmin = params.vmin.unwrap_or(data.vmin);
    let vmax = params.vmax.unwrap_or(data.vmax);
    if vmin > vmax {
        return Err(PlotError::invalid_parameter(
            if params.vmin.is_some() { "vmin" } else { "vmax" },
            format!("scale would run from {} down to {}", vmin, vmax),
        ));
    }

    let norm = Normalize::new(vmin, vmax);
    let degenerate = norm.is_degenerate();
    if degenerate {
        tracing::warn!(value = vmin, "all choropleth values are equal, using the colormap midpoint");
    }

    let fills = join
        .matched
        .iter()
        .map(|joined| RegionFill {
            feature: joined.feature,
            value: joined.value,
            color: match joined.value {
                Some(v) => params.cmap.map(v, &norm).with_alpha(params.alpha),
                None => no_data,
            },
        })
        .collect();

    let colorbar = Colorbar::new(params.cmap.clone(), norm, params.format.clone())
        .with_ticks_visible(params.ticks_visible);

    Ok(ChoroplethEncoding {
        fills,
        colorbar,
        degenerate,
    })
}
