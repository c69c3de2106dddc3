use geoplot_common::{BoundingBox, Color, PlotError, PlotResult};
use renderer::{Colormap, Normalize};

/// Point counts on a regular grid over one extent.
///
/// Bins are half-open except the last on each axis, which also holds
/// points lying exactly on the upper edge. Points outside the extent are
/// not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist2DGrid {
    pub extent: BoundingBox,
    pub nx: usize,
    pub ny: usize,
    /// Row-major, `iy * nx + ix`, with `iy = 0` at the bottom
    counts: Vec<u32>,
}

/// A grid cell to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistCell {
    pub bounds: BoundingBox,
    pub count: u32,
    pub color: Color,
}

impl Hist2DGrid {
    pub fn bin(x: &[f64], y: &[f64], extent: BoundingBox, nx: usize, ny: usize) -> PlotResult<Self> {
        if x.len() != y.len() {
            return Err(PlotError::length_mismatch("y", x.len(), y.len()));
        }
        if !extent.is_valid() || nx == 0 || ny == 0 {
            return Err(PlotError::render(format!(
                "cannot bin {}x{} cells over {:?}",
                nx, ny, extent
            )));
        }

        let mut counts = vec![0u32; nx * ny];
        for (&px, &py) in x.iter().zip(y) {
            if !px.is_finite() || !py.is_finite() {
                return Err(PlotError::render(format!("point ({}, {}) is not finite", px, py)));
            }
            let (Some(ix), Some(iy)) = (
                bin_index(px, extent.min_x, extent.max_x, nx),
                bin_index(py, extent.min_y, extent.max_y, ny),
            ) else {
                continue;
            };
            counts[iy * nx + ix] += 1;
        }

        Ok(Self {
            extent,
            nx,
            ny,
            counts,
        })
    }

    pub fn count(&self, ix: usize, iy: usize) -> u32 {
        self.counts[iy * self.nx + ix]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Geographic bounds of cell `(ix, iy)`.
    pub fn cell_bounds(&self, ix: usize, iy: usize) -> BoundingBox {
        let dx = self.extent.width() / self.nx as f64;
        let dy = self.extent.height() / self.ny as f64;
        BoundingBox::new(
            self.extent.min_x + ix as f64 * dx,
            self.extent.min_y + iy as f64 * dy,
            self.extent.min_x + (ix + 1) as f64 * dx,
            self.extent.min_y + (iy + 1) as f64 * dy,
        )
    }

    /// Cells holding at least `cmin` points, colored over the range of the
    /// visible counts. With `cmin = 0` empty bins are drawn as well.
    pub fn cells(&self, cmap: &Colormap, cmin: u32, alpha: f64) -> Vec<HistCell> {
        let visible = self.counts.iter().filter(|&&c| c >= cmin).map(|&c| f64::from(c));
        let Some(norm) = Normalize::from_values(visible) else {
            return Vec::new();
        };

        let mut cells = Vec::new();
        for iy in 0..self.ny {
            for ix in 0..self.nx {
                let count = self.count(ix, iy);
                if count < cmin {
                    continue;
                }
                cells.push(HistCell {
                    bounds: self.cell_bounds(ix, iy),
                    count,
                    color: cmap.map(count as f64, &norm).with_alpha(alpha),
                });
            }
        }
        cells
    }
}

fn bin_index(v: f64, min: f64, max: f64, n: usize) -> Option<usize> {
    if v < min || v > max {
        return None;
    }
    if v == max {
        return Some(n - 1);
    }
    let i = ((v - min) / (max - min) * n as f64).floor() as usize;
    Some(i.min(n - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_bin_edges() {
        assert_eq!(bin_index(0.0, 0.0, 1.0, 4), Some(0));
        assert_eq!(bin_index(0.25, 0.0, 1.0, 4), Some(1));
        assert_eq!(bin_index(1.0, 0.0, 1.0, 4), Some(3));
        assert_eq!(bin_index(1.01, 0.0, 1.0, 4), None);
        assert_eq!(bin_index(-0.01, 0.0, 1.0, 4), None);
    }

    #[test]
    fn test_counts_ignore_outside_points() {
        let x = [0.1, 0.1, 0.9, 5.0];
        let y = [0.1, 0.1, 0.9, 0.5];
        let grid = Hist2DGrid::bin(&x, &y, unit(), 2, 2).unwrap();
        assert_eq!(grid.count(0, 0), 2);
        assert_eq!(grid.count(1, 1), 1);
        assert_eq!(grid.total(), 3);
        assert_eq!(grid.cell_bounds(1, 0), BoundingBox::new(0.5, 0.0, 1.0, 0.5));
    }

    #[test]
    fn test_lattice_fills_every_bin_once() {
        let (x, y) = test_utils::lattice((0.0, 0.0, 1.0, 1.0), 4, 4);
        let grid = Hist2DGrid::bin(&x, &y, unit(), 4, 4).unwrap();
        assert_eq!(grid.total(), 16);
        for iy in 0..4 {
            for ix in 0..4 {
                assert_eq!(grid.count(ix, iy), 1, "bin ({}, {})", ix, iy);
            }
        }
    }

    #[test]
    fn test_cmin_floor() {
        let x = [0.1, 0.1, 0.1];
        let y = [0.1, 0.1, 0.1];
        let grid = Hist2DGrid::bin(&x, &y, unit(), 10, 10).unwrap();
        let cmap = Colormap::lookup("GnBu").unwrap();

        let cells = grid.cells(&cmap, 2, 1.0);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].count, 3);
        // a single visible count sits at the scale midpoint
        assert_eq!(cells[0].color, cmap.sample(0.5));

        assert!(grid.cells(&cmap, 5, 1.0).is_empty());
    }

    #[test]
    fn test_zero_cmin_draws_empty_bins() {
        let grid = Hist2DGrid::bin(&[0.1], &[0.1], unit(), 2, 2).unwrap();
        let cmap = Colormap::lookup("GnBu").unwrap();

        let cells = grid.cells(&cmap, 0, 1.0);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].count, 1);
        assert_eq!(cells[0].color, cmap.sample(1.0));
        assert!(cells[1..].iter().all(|c| c.count == 0 && c.color == cmap.sample(0.0)));
    }

    #[test]
    fn test_colors_span_visible_counts() {
        let x = [0.1, 0.1, 0.1, 0.9];
        let y = [0.1, 0.1, 0.1, 0.9];
        let grid = Hist2DGrid::bin(&x, &y, unit(), 2, 2).unwrap();
        let cmap = Colormap::lookup("Greys").unwrap();
        let cells = grid.cells(&cmap, 1, 0.5);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].color, cmap.sample(1.0).with_alpha(0.5));
        assert_eq!(cells[1].color, cmap.sample(0.0).with_alpha(0.5));
    }

    #[test]
    fn test_non_finite_point_is_render_error() {
        let err = Hist2DGrid::bin(&[f64::NAN], &[0.0], unit(), 2, 2).unwrap_err();
        assert!(matches!(err, PlotError::Render(_)));
    }
}
