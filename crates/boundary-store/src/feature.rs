//! Boundary features and per-level feature sets.

use geo::{BoundingRect, LineString, MultiPolygon};
use geoplot_common::{BoundingBox, Level, PlotError, PlotResult};
use std::collections::{BTreeMap, HashMap};

use crate::key::composite_key;

/// One administrative region.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    /// Canonical join key, unique within the feature's level.
    pub key: String,
    /// Display name as found in the source.
    pub name: String,
    /// Name of the enclosing region at the parent level.
    pub parent: Option<String>,
    pub geometry: MultiPolygon<f64>,
    pub bbox: BoundingBox,
}

impl BoundaryFeature {
    /// Build a feature, deriving its key from `parent` + `name`.
    ///
    /// Returns `None` for empty geometry.
    pub fn new(
        name: impl Into<String>,
        parent: Option<String>,
        geometry: MultiPolygon<f64>,
    ) -> Option<Self> {
        let name = name.into();
        let rect = geometry.bounding_rect()?;
        let key = match &parent {
            Some(p) => composite_key(&[p.as_str(), name.as_str()]),
            None => composite_key(&[name.as_str()]),
        };
        Some(Self {
            key,
            name,
            parent,
            geometry,
            bbox: BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y),
        })
    }

    /// Every ring (exterior and interior) of every polygon.
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.geometry
            .0
            .iter()
            .flat_map(|poly| std::iter::once(poly.exterior()).chain(poly.interiors()))
    }
}

/// Feature sequences for each loaded level.
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    levels: BTreeMap<Level, Vec<BoundaryFeature>>,
    index: HashMap<Level, HashMap<String, usize>>,
}

impl BoundarySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the features for one level.
    ///
    /// Fails on duplicate keys within the level or when the level is
    /// already present.
    pub fn insert_level(&mut self, level: Level, features: Vec<BoundaryFeature>) -> PlotResult<()> {
        if self.levels.contains_key(&level) {
            return Err(PlotError::boundary_load(format!(
                "level '{}' loaded twice",
                level
            )));
        }

        let mut keys = HashMap::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            if keys.insert(feature.key.clone(), i).is_some() {
                return Err(PlotError::boundary_load(format!(
                    "duplicate {} key '{}'",
                    level, feature.key
                )));
            }
        }

        self.index.insert(level, keys);
        self.levels.insert(level, features);
        Ok(())
    }

    /// Builder-style variant of [`insert_level`](Self::insert_level).
    pub fn with_level(mut self, level: Level, features: Vec<BoundaryFeature>) -> PlotResult<Self> {
        self.insert_level(level, features)?;
        Ok(self)
    }

    pub fn features(&self, level: Level) -> Option<&[BoundaryFeature]> {
        self.levels.get(&level).map(Vec::as_slice)
    }

    /// Look up a feature by canonical key.
    pub fn find(&self, level: Level, key: &str) -> Option<&BoundaryFeature> {
        let idx = *self.index.get(&level)?.get(key)?;
        self.levels.get(&level)?.get(idx)
    }

    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.levels.keys().copied()
    }

    /// Total feature count across levels.
    pub fn len(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outline of all regions at a level: their rings plus overall extent.
#[derive(Debug, Clone, Copy)]
pub struct Outline<'a> {
    pub level: Level,
    pub features: &'a [BoundaryFeature],
    pub bounds: BoundingBox,
}

impl<'a> Outline<'a> {
    pub fn new(level: Level, features: &'a [BoundaryFeature]) -> Option<Self> {
        let bounds = features
            .iter()
            .map(|f| f.bbox)
            .reduce(|a, b| a.union(&b))?;
        Some(Self {
            level,
            features,
            bounds,
        })
    }

    pub fn rings(&self) -> impl Iterator<Item = &'a LineString<f64>> + 'a {
        self.features.iter().flat_map(|f| f.rings())
    }
}
