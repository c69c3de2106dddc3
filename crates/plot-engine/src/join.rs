//! Matching caller rows to boundary features.

use boundary_store::BoundaryFeature;
use geoplot_common::{Level, PlotError, PlotResult};
use std::collections::{HashMap, HashSet};

use crate::params::DataRow;

/// One feature with its data value, `None` when no row matched.
#[derive(Debug, Clone, Copy)]
pub struct JoinedFeature<'a> {
    pub feature: &'a BoundaryFeature,
    pub value: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Join<'a> {
    /// One entry per feature, in feature order
    pub matched: Vec<JoinedFeature<'a>>,
    /// Row keys (as written by the caller) that matched no feature
    pub unmatched_keys: Vec<String>,
}

impl<'a> Join<'a> {
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.matched.iter().filter_map(|j| j.value)
    }

    pub fn matched_count(&self) -> usize {
        self.matched.iter().filter(|j| j.value.is_some()).count()
    }
}

/// Join `rows` onto `features` by canonical key.
///
/// A key given more than once keeps the value of its last row. Fails with
/// `EmptyJoin` when no feature receives a value.
pub fn join<'a>(rows: &[DataRow], level: Level, features: &'a [BoundaryFeature]) -> PlotResult<Join<'a>> {
    let mut values: HashMap<&str, f64> = HashMap::with_capacity(rows.len());
    for row in rows {
        values.insert(row.key.as_str(), row.value);
    }

    let matched: Vec<JoinedFeature<'a>> = features
        .iter()
        .map(|feature| JoinedFeature {
            feature,
            value: values.get(feature.key.as_str()).copied(),
        })
        .collect();

    let known: HashSet<&str> = features.iter().map(|f| f.key.as_str()).collect();
    let mut seen = HashSet::new();
    let unmatched_keys: Vec<String> = rows
        .iter()
        .filter(|row| !known.contains(row.key.as_str()))
        .filter(|row| seen.insert(row.key.as_str()))
        .map(|row| row.label.clone())
        .collect();

    let join = Join {
        matched,
        unmatched_keys,
    };

    if !join.unmatched_keys.is_empty() {
        tracing::warn!(
            level = %level,
            count = join.unmatched_keys.len(),
            keys = ?join.unmatched_keys,
            "data rows matched no region"
        );
    }

    let matched_count = join.matched_count();
    if matched_count == 0 {
        return Err(PlotError::EmptyJoin(level.to_string()));
    }

    tracing::debug!(
        level = %level,
        rows = rows.len(),
        regions = features.len(),
        matched = matched_count,
        "joined data"
    );
    Ok(join)
}
