use geoplot_common::{Color, PlotError, PlotResult};

use crate::params::PointParams;

/// One scatter marker in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    /// Radius in typographic points
    pub radius_pt: f64,
    pub fill: Color,
}

impl Marker {
    pub fn radius_px(&self, px_per_pt: f64) -> f32 {
        (self.radius_pt * px_per_pt) as f32
    }
}

/// Markers for every point, in input order. Sizes are marker areas in
/// points², so the radius is `sqrt(size) / 2`.
pub fn encode_markers(points: &PointParams) -> PlotResult<Vec<Marker>> {
    points
        .x
        .iter()
        .zip(&points.y)
        .zip(points.sizes.iter().zip(&points.colors))
        .enumerate()
        .map(|(i, ((&x, &y), (&size, &color)))| {
            if !x.is_finite() || !y.is_finite() {
                return Err(PlotError::render(format!(
                    "point {} ({}, {}) cannot be projected",
                    i, x, y
                )));
            }
            Ok(Marker {
                x,
                y,
                radius_pt: size.sqrt() / 2.0,
                fill: color.with_alpha(points.alpha),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(x: Vec<f64>, y: Vec<f64>, sizes: Vec<f64>) -> PointParams {
        let n = x.len();
        PointParams {
            x,
            y,
            sizes,
            colors: vec![Color::rgb(255, 0, 0); n],
            alpha: 0.5,
        }
    }

    #[test]
    fn test_radius_from_area() {
        let markers = encode_markers(&points(vec![1.0, 2.0], vec![3.0, 4.0], vec![36.0, 0.0])).unwrap();
        assert_eq!(markers[0].radius_pt, 3.0);
        assert_eq!(markers[1].radius_pt, 0.0);
        assert_eq!(markers[0].fill, Color::new(255, 0, 0, 128));
        // 72 dpi: one point is one pixel
        assert_eq!(markers[0].radius_px(1.0), 3.0);
    }

    #[test]
    fn test_non_finite_position() {
        let err = encode_markers(&points(vec![f64::INFINITY], vec![0.0], vec![1.0])).unwrap_err();
        assert!(matches!(err, PlotError::Render(_)));
    }
}
