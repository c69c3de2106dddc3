//! Reading boundary geometries from GeoJSON and Shapefile sources.

use geo::MultiPolygon;
use geojson::GeoJson;
use geoplot_common::{Level, PlotError, PlotResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::feature::BoundaryFeature;

/// Geometry sources keyed by level.
pub type BoundarySources = BTreeMap<Level, BoundarySource>;

/// Where one level's geometry comes from and which attribute fields hold
/// the region names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySource {
    /// `.geojson` / `.json` FeatureCollection, or `.shp` shapefile
    pub path: PathBuf,
    /// Attribute holding the region name (e.g. `COUNTYNAME`)
    pub name_field: String,
    /// Attribute holding the enclosing region's name (e.g. `COUNTYNAME` for towns)
    #[serde(default)]
    pub parent_field: Option<String>,
}

impl BoundarySource {
    pub fn new(path: impl Into<PathBuf>, name_field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name_field: name_field.into(),
            parent_field: None,
        }
    }

    pub fn with_parent_field(mut self, field: impl Into<String>) -> Self {
        self.parent_field = Some(field.into());
        self
    }

    /// Read all polygonal features from this source.
    pub fn load(&self) -> PlotResult<Vec<BoundaryFeature>> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .ok_or_else(|| {
                PlotError::boundary_load(format!(
                    "geometry file has no extension: {}",
                    self.path.display()
                ))
            })?;

        match extension.as_str() {
            "json" | "geojson" => load_geojson(self),
            "shp" => load_shapefile(self),
            other => Err(PlotError::boundary_load(format!(
                "unsupported geometry format '{}': {}",
                other,
                self.path.display()
            ))),
        }
    }
}

fn open(path: &Path) -> PlotResult<File> {
    File::open(path).map_err(|e| {
        PlotError::boundary_load(format!("failed to open {}: {}", path.display(), e))
    })
}

fn load_geojson(source: &BoundarySource) -> PlotResult<Vec<BoundaryFeature>> {
    let reader = BufReader::new(open(&source.path)?);
    let geojson = GeoJson::from_reader(reader).map_err(|e| {
        PlotError::boundary_load(format!(
            "failed to parse GeoJSON {}: {}",
            source.path.display(),
            e
        ))
    })?;
    features_from_geojson(geojson, source)
}

/// Convert a parsed FeatureCollection into boundary features.
pub fn features_from_geojson(
    geojson: GeoJson,
    source: &BoundarySource,
) -> PlotResult<Vec<BoundaryFeature>> {
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(PlotError::boundary_load(format!(
                "{} must be a FeatureCollection",
                source.path.display()
            )))
        }
    };

    let mut features = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let props = feature.properties.as_ref();
        let name = match props.and_then(|p| p.get(&source.name_field)).and_then(property_text) {
            Some(name) => name,
            None => {
                tracing::debug!(field = %source.name_field, "skipping feature without name");
                continue;
            }
        };
        let parent = match &source.parent_field {
            Some(field) => Some(
                props
                    .and_then(|p| p.get(field))
                    .and_then(property_text)
                    .ok_or_else(|| {
                        PlotError::boundary_load(format!(
                            "feature '{}' is missing parent field '{}'",
                            name, field
                        ))
                    })?,
            ),
            None => None,
        };

        let geometry = match feature.geometry {
            Some(geom) => {
                let geom: geo::Geometry<f64> = geom.value.try_into().map_err(|e| {
                    PlotError::boundary_load(format!(
                        "failed to convert geometry of '{}': {:?}",
                        name, e
                    ))
                })?;
                match geom {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => {
                        tracing::debug!(name = %name, "skipping non-polygon feature");
                        continue;
                    }
                }
            }
            None => continue,
        };

        if let Some(feature) = BoundaryFeature::new(name, parent, geometry) {
            features.push(feature);
        }
    }

    Ok(features)
}

fn property_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn load_shapefile(source: &BoundarySource) -> PlotResult<Vec<BoundaryFeature>> {
    let mut reader = shapefile::Reader::from_path(&source.path).map_err(|e| {
        PlotError::boundary_load(format!(
            "failed to open shapefile {}: {}",
            source.path.display(),
            e
        ))
    })?;

    let mut features = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(|e| {
            PlotError::boundary_load(format!(
                "failed to read shapefile {}: {}",
                source.path.display(),
                e
            ))
        })?;

        let name = match shape_text(&record, &source.name_field)? {
            Some(name) => name,
            None => continue,
        };
        let parent = match &source.parent_field {
            Some(field) => Some(shape_text(&record, field)?.ok_or_else(|| {
                PlotError::boundary_load(format!(
                    "feature '{}' is missing parent field '{}'",
                    name, field
                ))
            })?),
            None => None,
        };

        let geometry: MultiPolygon<f64> = match shape {
            shapefile::Shape::Polygon(polygon) => polygon.try_into().map_err(|e| {
                PlotError::boundary_load(format!("failed to convert polygon: {:?}", e))
            })?,
            shapefile::Shape::PolygonM(polygon) => polygon.try_into().map_err(|e| {
                PlotError::boundary_load(format!("failed to convert polygonM: {:?}", e))
            })?,
            shapefile::Shape::PolygonZ(polygon) => polygon.try_into().map_err(|e| {
                PlotError::boundary_load(format!("failed to convert polygonZ: {:?}", e))
            })?,
            _ => continue,
        };

        if let Some(feature) = BoundaryFeature::new(name, parent, geometry) {
            features.push(feature);
        }
    }

    Ok(features)
}

fn shape_text(record: &shapefile::dbase::Record, field: &str) -> PlotResult<Option<String>> {
    use shapefile::dbase::FieldValue;

    match record.get(field) {
        Some(FieldValue::Character(Some(s))) if !s.trim().is_empty() => Ok(Some(s.clone())),
        Some(FieldValue::Character(_)) => Ok(None),
        Some(FieldValue::Numeric(Some(n))) => Ok(Some(n.to_string())),
        Some(FieldValue::Numeric(None)) => Ok(None),
        Some(_) => Err(PlotError::boundary_load(format!(
            "shapefile field '{}' must be text or numeric",
            field
        ))),
        None => Err(PlotError::boundary_load(format!(
            "field '{}' not found in shapefile",
            field
        ))),
    }
}

/// Load every configured level, in parallel. Each level succeeds or fails
/// on its own source.
pub fn load_sources(sources: &BoundarySources) -> Vec<(Level, PlotResult<Vec<BoundaryFeature>>)> {
    use rayon::prelude::*;

    sources
        .par_iter()
        .map(|(level, source)| {
            let result = source.load();
            if let Ok(features) = &result {
                tracing::info!(
                    level = %level,
                    path = %source.path.display(),
                    features = features.len(),
                    "loaded boundaries"
                );
            }
            (*level, result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TOWNS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "properties": {"COUNTYNAME": "臺中市", "TOWNNAME": "北區"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
            {"type": "Feature",
             "properties": {"COUNTYNAME": "臺中市", "TOWNNAME": "南區"},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[1,0],[2,0],[2,1],[1,1],[1,0]]]]}},
            {"type": "Feature",
             "properties": {"COUNTYNAME": "臺中市", "TOWNNAME": "路"},
             "geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}}
        ]
    }"#;

    #[test]
    fn test_features_from_geojson_with_parent() {
        let source = BoundarySource::new("towns.geojson", "TOWNNAME").with_parent_field("COUNTYNAME");
        let features = features_from_geojson(TWO_TOWNS.parse().unwrap(), &source).unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].key, "臺中市/北區");
        assert_eq!(features[1].parent.as_deref(), Some("臺中市"));
    }

    #[test]
    fn test_missing_parent_field_is_error() {
        let source = BoundarySource::new("towns.geojson", "TOWNNAME").with_parent_field("NOPE");
        let err = features_from_geojson(TWO_TOWNS.parse().unwrap(), &source).unwrap_err();
        assert!(matches!(err, PlotError::BoundaryLoad(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = BoundarySource::new("counties.kml", "NAME").load().unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }
}
