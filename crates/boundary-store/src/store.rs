//! Process-wide boundary cache.

use geoplot_common::{Level, PlotError, PlotResult};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Instant;

use crate::feature::{BoundaryFeature, BoundarySet, Outline};
use crate::loader::{load_sources, BoundarySources};

/// Levels that loaded, plus the failure of every level that did not.
#[derive(Debug, Default)]
struct Loaded {
    set: BoundarySet,
    failures: BTreeMap<Level, PlotError>,
}

/// Read-only boundary store shared by all render calls.
///
/// Sources are read at most once, on first use (or eagerly via
/// [`preload`](Self::preload)). Each level keeps its own outcome: a broken
/// town source fails town lookups with a cached `BoundaryLoad` error while
/// county lookups still succeed.
#[derive(Debug)]
pub struct BoundaryStore {
    sources: BoundarySources,
    cell: OnceLock<Loaded>,
}

impl BoundaryStore {
    /// Create a store that reads `sources` on first use.
    pub fn new(sources: BoundarySources) -> Self {
        Self {
            sources,
            cell: OnceLock::new(),
        }
    }

    /// Create a store around already-built features.
    pub fn from_set(set: BoundarySet) -> Self {
        Self {
            sources: BoundarySources::new(),
            cell: OnceLock::from(Loaded {
                set,
                failures: BTreeMap::new(),
            }),
        }
    }

    /// Load eagerly, e.g. at process start. Fails if any source failed.
    pub fn preload(&self) -> PlotResult<()> {
        self.load().map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Every configured level, or the first level failure.
    pub fn load(&self) -> PlotResult<&BoundarySet> {
        let loaded = self.loaded();
        match loaded.failures.values().next() {
            Some(e) => Err(e.clone()),
            None => Ok(&loaded.set),
        }
    }

    fn loaded(&self) -> &Loaded {
        self.cell.get_or_init(|| {
            let start = Instant::now();
            let mut loaded = Loaded::default();
            for (level, result) in load_sources(&self.sources) {
                if let Err(e) = result.and_then(|features| loaded.set.insert_level(level, features)) {
                    tracing::error!(level = %level, error = %e, "boundary level failed to load");
                    loaded.failures.insert(level, e);
                }
            }
            tracing::info!(
                features = loaded.set.len(),
                failed_levels = loaded.failures.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "boundary store initialized"
            );
            loaded
        })
    }

    /// Features at `level`, in source order.
    pub fn get(&self, level: Level) -> PlotResult<&[BoundaryFeature]> {
        let loaded = self.loaded();
        if let Some(e) = loaded.failures.get(&level) {
            return Err(e.clone());
        }
        loaded.set.features(level).ok_or_else(|| {
            PlotError::boundary_load(format!("no boundary source configured for level '{}'", level))
        })
    }

    /// Like [`get`](Self::get), parsing the level name first. An unknown
    /// name fails with `UnknownLevel` without touching any geometry.
    pub fn get_by_name(&self, level: &str) -> PlotResult<&[BoundaryFeature]> {
        let level: Level = level.parse()?;
        self.get(level)
    }

    /// Outline of every region at `level`.
    pub fn get_outline(&self, level: Level) -> PlotResult<Outline<'_>> {
        let features = self.get(level)?;
        Outline::new(level, features).ok_or_else(|| {
            PlotError::boundary_load(format!("no boundaries loaded for level '{}'", level))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::BoundarySource;

    #[test]
    fn test_missing_source_is_cached_failure() {
        let mut sources = BoundarySources::new();
        sources.insert(Level::County, BoundarySource::new("/nonexistent/county.geojson", "NAME"));
        let store = BoundaryStore::new(sources);

        assert!(!store.is_loaded());
        let first = store.get(Level::County).unwrap_err();
        assert!(matches!(first, PlotError::BoundaryLoad(_)));
        assert!(store.is_loaded());
        let second = store.load().unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_level_failures_are_independent() {
        let mut sources = BoundarySources::new();
        sources.insert(Level::Town, BoundarySource::new("/nonexistent/town.geojson", "NAME"));
        let store = BoundaryStore::new(sources);

        assert!(matches!(store.get(Level::Town), Err(PlotError::BoundaryLoad(_))));
        // county was never configured, which is a different error from the town failure
        let county = store.get(Level::County).unwrap_err();
        assert!(county.to_string().contains("no boundary source configured"));
    }

    #[test]
    fn test_unknown_level_before_load() {
        let store = BoundaryStore::new(BoundarySources::new());
        let err = store.get_by_name("province").unwrap_err();
        assert!(matches!(err, PlotError::UnknownLevel(_)));
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_unconfigured_level() {
        let store = BoundaryStore::from_set(BoundarySet::new());
        assert!(matches!(store.get(Level::Town), Err(PlotError::BoundaryLoad(_))));
    }
}
