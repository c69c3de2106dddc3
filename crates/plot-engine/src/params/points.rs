use geoplot_common::{Color, PlotError, PlotResult};
use renderer::{Colormap, Normalize};
use serde::{Deserialize, Serialize};

use super::{check_alpha, check_len, default_point_alpha, default_viridis};

/// Marker area in points², one value for all points or one per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSpec {
    Scalar(f64),
    PerPoint(Vec<f64>),
}

impl Default for SizeSpec {
    fn default() -> Self {
        SizeSpec::Scalar(1.0)
    }
}

/// A color name/hex string, or a number mapped through the colormap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Number(f64),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Scalar(ColorValue),
    PerPoint(Vec<ColorValue>),
}

impl Default for ColorSpec {
    fn default() -> Self {
        ColorSpec::Scalar(ColorValue::Name("red".to_string()))
    }
}

/// Scatter plot with uniform markers unless overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotSpec {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub size: SizeSpec,
    #[serde(default)]
    pub color: ColorSpec,
    #[serde(default = "default_point_alpha")]
    pub alpha: f64,
    /// Used for numeric colors
    #[serde(default = "default_viridis")]
    pub cmap: String,
}

/// Scatter plot whose markers usually vary per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleSpec {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub size: SizeSpec,
    #[serde(default)]
    pub color: ColorSpec,
    #[serde(default = "default_point_alpha")]
    pub alpha: f64,
    #[serde(default = "default_viridis")]
    pub cmap: String,
}

impl DotSpec {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x,
            y,
            size: SizeSpec::default(),
            color: ColorSpec::default(),
            alpha: default_point_alpha(),
            cmap: default_viridis(),
        }
    }
}

impl BubbleSpec {
    pub fn new(x: Vec<f64>, y: Vec<f64>, size: Vec<f64>, color: Vec<ColorValue>) -> Self {
        Self {
            x,
            y,
            size: SizeSpec::PerPoint(size),
            color: ColorSpec::PerPoint(color),
            alpha: default_point_alpha(),
            cmap: default_viridis(),
        }
    }
}

/// Points with sizes and colors resolved one per point.
///
/// `sizes.len() == colors.len() == x.len() == y.len()` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct PointParams {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Marker areas in points²
    pub sizes: Vec<f64>,
    /// Fill colors, alpha not yet applied
    pub colors: Vec<Color>,
    pub alpha: f64,
}

impl PointParams {
    fn resolve(
        x: Vec<f64>,
        y: Vec<f64>,
        size: SizeSpec,
        color: ColorSpec,
        alpha: f64,
        cmap: &str,
    ) -> PlotResult<Self> {
        let n = x.len();
        check_len("y", n, y.len())?;
        let cmap = Colormap::lookup(cmap)?;
        let alpha = check_alpha(alpha)?;
        let sizes = resolve_sizes(size, n)?;
        let colors = resolve_colors(color, n, &cmap)?;
        Ok(Self {
            x,
            y,
            sizes,
            colors,
            alpha,
        })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

fn resolve_sizes(size: SizeSpec, n: usize) -> PlotResult<Vec<f64>> {
    let sizes = match size {
        SizeSpec::Scalar(s) => {
            check_size(s)?;
            return Ok(vec![s; n]);
        }
        SizeSpec::PerPoint(sizes) => sizes,
    };
    check_len("size", n, sizes.len())?;
    for s in &sizes {
        check_size(*s)?;
    }
    Ok(sizes)
}

fn check_size(s: f64) -> PlotResult<()> {
    if s.is_finite() && s >= 0.0 {
        Ok(())
    } else {
        Err(PlotError::invalid_parameter(
            "size",
            format!("marker sizes must be finite and >= 0, got {}", s),
        ))
    }
}

fn resolve_colors(color: ColorSpec, n: usize, cmap: &Colormap) -> PlotResult<Vec<Color>> {
    let values = match color {
        // Validated even when there are no points.
        ColorSpec::Scalar(ColorValue::Name(name)) => return Ok(vec![name.parse::<Color>()?; n]),
        ColorSpec::Scalar(ColorValue::Number(x)) if !x.is_finite() => {
            return Err(PlotError::invalid_parameter("color", "numeric colors must be finite"))
        }
        ColorSpec::Scalar(value) => vec![value; n],
        ColorSpec::PerPoint(values) => {
            check_len("color", n, values.len())?;
            values
        }
    };

    let mut names = Vec::new();
    let mut numbers = Vec::new();
    for value in &values {
        match value {
            ColorValue::Name(name) => names.push(name.as_str()),
            ColorValue::Number(x) => numbers.push(*x),
        }
    }

    if numbers.is_empty() {
        return names.iter().map(|name| name.parse::<Color>()).collect();
    }
    if !names.is_empty() {
        return Err(PlotError::invalid_parameter(
            "color",
            "cannot mix color names and numeric values",
        ));
    }
    if numbers.iter().any(|x| !x.is_finite()) {
        return Err(PlotError::invalid_parameter("color", "numeric colors must be finite"));
    }

    // Non-empty and finite, so a range always exists.
    let norm = Normalize::from_values(numbers.iter().copied()).unwrap_or(Normalize::new(0.0, 1.0));
    Ok(numbers.iter().map(|x| cmap.map(*x, &norm)).collect())
}

/// Validated dot plot parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "DotSpec")]
pub struct DotParams {
    pub points: PointParams,
}

impl TryFrom<DotSpec> for DotParams {
    type Error = PlotError;

    fn try_from(spec: DotSpec) -> PlotResult<Self> {
        let points = PointParams::resolve(spec.x, spec.y, spec.size, spec.color, spec.alpha, &spec.cmap)?;
        Ok(Self { points })
    }
}

impl DotParams {
    pub fn from_spec(spec: DotSpec) -> PlotResult<Self> {
        spec.try_into()
    }
}

/// Validated bubble plot parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BubbleSpec")]
pub struct BubbleParams {
    pub points: PointParams,
}

impl TryFrom<BubbleSpec> for BubbleParams {
    type Error = PlotError;

    fn try_from(spec: BubbleSpec) -> PlotResult<Self> {
        let points = PointParams::resolve(spec.x, spec.y, spec.size, spec.color, spec.alpha, &spec.cmap)?;
        Ok(Self { points })
    }
}

impl BubbleParams {
    pub fn from_spec(spec: BubbleSpec) -> PlotResult<Self> {
        spec.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dot_defaults_broadcast() {
        let params = DotParams::from_spec(DotSpec::new(vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0])).unwrap();
        let points = &params.points;
        assert_eq!(points.sizes, vec![1.0; 3]);
        assert_eq!(points.colors, vec![Color::rgb(255, 0, 0); 3]);
        assert_eq!(points.alpha, 0.5);
    }

    #[test]
    fn test_scalar_or_array_from_json() {
        let params: BubbleParams = serde_json::from_value(json!({
            "x": [1.0, 2.0],
            "y": [1.0, 2.0],
            "size": [10.0, 40.0],
            "color": ["tab:blue", "#00ff00"]
        }))
        .unwrap();
        assert_eq!(params.points.sizes, vec![10.0, 40.0]);
        assert_eq!(params.points.colors[0], Color::rgb(31, 119, 180));
        assert_eq!(params.points.colors[1], Color::rgb(0, 255, 0));

        let params: DotParams =
            serde_json::from_value(json!({"x": [0.0], "y": [0.0], "size": 25, "color": "k"})).unwrap();
        assert_eq!(params.points.sizes, vec![25.0]);
        assert_eq!(params.points.colors, vec![Color::BLACK]);
    }

    #[test]
    fn test_numeric_colors_use_colormap() {
        let spec = BubbleSpec {
            cmap: "Greys".into(),
            ..BubbleSpec::new(
                vec![0.0, 0.0],
                vec![0.0, 0.0],
                vec![1.0, 1.0],
                vec![ColorValue::Number(0.0), ColorValue::Number(10.0)],
            )
        };
        let params = BubbleParams::from_spec(spec).unwrap();
        let cmap = Colormap::lookup("Greys").unwrap();
        assert_eq!(params.points.colors, vec![cmap.sample(0.0), cmap.sample(1.0)]);
    }

    #[test]
    fn test_array_length_mismatch() {
        let spec = BubbleSpec::new(
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0],
            vec![ColorValue::Name("red".into()); 3],
        );
        let err = BubbleParams::from_spec(spec).unwrap_err();
        assert!(matches!(
            err,
            PlotError::ArrayLengthMismatch { ref field, expected: 3, actual: 2 } if field == "size"
        ));

        let spec = BubbleSpec::new(vec![1.0], vec![1.0], vec![1.0], vec![]);
        assert!(matches!(
            BubbleParams::from_spec(spec),
            Err(PlotError::ArrayLengthMismatch { ref field, .. }) if field == "color"
        ));
    }

    #[test]
    fn test_invalid_values() {
        let spec = DotSpec { size: SizeSpec::Scalar(-1.0), ..DotSpec::new(vec![0.0], vec![0.0]) };
        assert!(matches!(DotParams::from_spec(spec), Err(PlotError::InvalidParameter { .. })));

        let spec = DotSpec {
            color: ColorSpec::Scalar(ColorValue::Name("blurple".into())),
            ..DotSpec::new(vec![0.0], vec![0.0])
        };
        assert!(matches!(DotParams::from_spec(spec), Err(PlotError::InvalidColor(_))));

        let spec = DotSpec {
            color: ColorSpec::PerPoint(vec![ColorValue::Number(1.0), ColorValue::Name("red".into())]),
            ..DotSpec::new(vec![0.0, 1.0], vec![0.0, 1.0])
        };
        assert!(matches!(DotParams::from_spec(spec), Err(PlotError::InvalidParameter { .. })));

        let spec = DotSpec { cmap: "nope".into(), ..DotSpec::new(vec![], vec![]) };
        assert!(matches!(DotParams::from_spec(spec), Err(PlotError::UnknownColormap(_))));
    }
}
