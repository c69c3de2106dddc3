use boundary_store::{canonical_joined_key, composite_key};
use geoplot_common::{Level, PlotError, PlotResult};
use renderer::{Colormap, TickFormat};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{check_alpha, default_gnbu, default_level, default_true};

/// Choropleth request as sent by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethSpec {
    /// Rows with key fields (`county`, plus `town` at town level, or a
    /// literal `key`) and a numeric `column`
    pub data: Vec<Map<String, Value>>,
    #[serde(default = "default_column")]
    pub column: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_gnbu")]
    pub cmap: String,
    #[serde(default = "default_format")]
    pub colorbar_format: String,
    #[serde(default = "default_true")]
    pub colorbar_tick_visible: bool,
    /// Lower end of the color scale; data minimum when absent
    #[serde(default)]
    pub vmin: Option<f64>,
    /// Upper end of the color scale; data maximum when absent
    #[serde(default)]
    pub vmax: Option<f64>,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_column() -> String {
    "value".to_string()
}

fn default_format() -> String {
    "{x:,.0f}".to_string()
}

fn default_alpha() -> f64 {
    1.0
}

impl ChoroplethSpec {
    /// A spec with default options for `data`.
    pub fn new(data: Vec<Map<String, Value>>) -> Self {
        Self {
            data,
            column: default_column(),
            level: default_level(),
            cmap: default_gnbu(),
            colorbar_format: default_format(),
            colorbar_tick_visible: true,
            vmin: None,
            vmax: None,
            alpha: default_alpha(),
        }
    }
}

/// One caller row reduced to its join key and value.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    /// Canonical join key
    pub key: String,
    /// Key as the caller wrote it
    pub label: String,
    pub value: f64,
}

/// Validated choropleth parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ChoroplethSpec")]
pub struct ChoroplethParams {
    pub rows: Vec<DataRow>,
    pub column: String,
    pub level: Level,
    pub cmap: Colormap,
    pub format: TickFormat,
    pub ticks_visible: bool,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub alpha: f64,
}

impl TryFrom<ChoroplethSpec> for ChoroplethParams {
    type Error = PlotError;

    fn try_from(spec: ChoroplethSpec) -> PlotResult<Self> {
        let level: Level = spec.level.parse()?;
        let cmap = Colormap::lookup(&spec.cmap)?;
        let format = TickFormat::parse(&spec.colorbar_format)?;
        let alpha = check_alpha(spec.alpha)?;

        for (name, bound) in [("vmin", spec.vmin), ("vmax", spec.vmax)] {
            if bound.is_some_and(|v| !v.is_finite()) {
                return Err(PlotError::invalid_parameter(name, "must be finite"));
            }
        }
        if let (Some(lo), Some(hi)) = (spec.vmin, spec.vmax) {
            if lo > hi {
                return Err(PlotError::invalid_parameter(
                    "vmin",
                    format!("{} is greater than vmax {}", lo, hi),
                ));
            }
        }

        let rows = spec
            .data
            .iter()
            .enumerate()
            .map(|(i, row)| data_row(i, row, level, &spec.column))
            .collect::<PlotResult<Vec<_>>>()?;

        Ok(Self {
            rows,
            column: spec.column,
            level,
            cmap,
            format,
            ticks_visible: spec.colorbar_tick_visible,
            vmin: spec.vmin,
            vmax: spec.vmax,
            alpha,
        })
    }
}

impl ChoroplethParams {
    pub fn from_spec(spec: ChoroplethSpec) -> PlotResult<Self> {
        spec.try_into()
    }
}

/// Literal key field accepted at every level.
const KEY_FIELD: &str = "key";

fn data_row(index: usize, row: &Map<String, Value>, level: Level, column: &str) -> PlotResult<DataRow> {
    let field_text = |name: &str| row.get(name).and_then(key_text);

    let fields = level.key_fields();
    let parts: Option<Vec<String>> = fields.iter().map(|f| field_text(*f)).collect();
    let (key, label) = match parts {
        Some(parts) => (composite_key(&parts), parts.join(" ")),
        None => match field_text(KEY_FIELD) {
            Some(raw) => (canonical_joined_key(&raw), raw),
            None => {
                return Err(PlotError::invalid_parameter(
                    "data",
                    format!(
                        "row {} has no '{}' (or '{}') field",
                        index,
                        fields.join("' + '"),
                        KEY_FIELD
                    ),
                ))
            }
        },
    };

    let value = row.get(column).and_then(numeric).ok_or_else(|| {
        PlotError::invalid_parameter(
            "data",
            format!("row {} ('{}'): column '{}' is missing or not a finite number", index, label, column),
        )
    })?;

    Ok(DataRow { key, label, value })
}

fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Map<String, Value>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_from_json() {
        let params: ChoroplethParams =
            serde_json::from_value(json!({"data": [{"key": "A", "value": 100}]})).unwrap();
        assert_eq!(params.level, Level::County);
        assert_eq!(params.cmap.name(), "GnBu");
        assert_eq!(params.format, TickFormat::default());
        assert!(params.ticks_visible);
        assert_eq!(params.alpha, 1.0);
        assert_eq!(params.rows[0], DataRow { key: "a".into(), label: "A".into(), value: 100.0 });
    }

    #[test]
    fn test_county_and_town_keys() {
        let spec = ChoroplethSpec {
            level: "town".into(),
            column: "people".into(),
            ..ChoroplethSpec::new(rows(json!([
                {"county": "台中市", "town": " 北區", "people": "12"},
                {"key": "臺中市/南區", "people": 3.5},
                {"key": "台中市 / 西區", "people": 1}
            ])))
        };
        let params = ChoroplethParams::from_spec(spec).unwrap();
        assert_eq!(params.rows[0].key, "臺中市/北區");
        assert_eq!(params.rows[0].value, 12.0);
        assert_eq!(params.rows[1].key, "臺中市/南區");
        assert_eq!(params.rows[2].key, "臺中市/西區");
    }

    #[test]
    fn test_unknown_level_and_colormap() {
        let spec = ChoroplethSpec { level: "province".into(), ..ChoroplethSpec::new(vec![]) };
        assert!(matches!(ChoroplethParams::from_spec(spec), Err(PlotError::UnknownLevel(_))));

        let spec = ChoroplethSpec { cmap: "nope".into(), ..ChoroplethSpec::new(vec![]) };
        assert!(matches!(ChoroplethParams::from_spec(spec), Err(PlotError::UnknownColormap(_))));
    }

    #[test]
    fn test_bad_rows() {
        let missing_value = ChoroplethSpec::new(rows(json!([{"county": "A", "value": "n/a"}])));
        assert!(matches!(
            ChoroplethParams::from_spec(missing_value),
            Err(PlotError::InvalidParameter { .. })
        ));

        let missing_key = ChoroplethSpec::new(rows(json!([{"value": 1}])));
        let err = ChoroplethParams::from_spec(missing_key).unwrap_err();
        assert!(err.to_string().contains("'county'"));
    }

    #[test]
    fn test_scale_override_validation() {
        let spec = ChoroplethSpec { vmin: Some(5.0), vmax: Some(1.0), ..ChoroplethSpec::new(vec![]) };
        assert!(matches!(
            ChoroplethParams::from_spec(spec),
            Err(PlotError::InvalidParameter { ref param, .. }) if param == "vmin"
        ));

        let spec = ChoroplethSpec { alpha: 2.0, ..ChoroplethSpec::new(vec![]) };
        assert!(ChoroplethParams::from_spec(spec).is_err());
    }
}
