//! Administrative boundary geometries.
//!
//! Boundaries are read once from static GeoJSON or Shapefile sources, one
//! source per [`Level`], and shared read-only by every render call.

pub mod feature;
pub mod key;
pub mod loader;
pub mod store;

pub use feature::{BoundaryFeature, BoundarySet, Outline};
pub use key::{canonical_joined_key, canonical_key, composite_key};
pub use loader::{BoundarySource, BoundarySources};
pub use store::BoundaryStore;

pub use geoplot_common::Level;
