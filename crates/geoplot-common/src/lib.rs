//! Common types and utilities shared across all geoplot crates.

pub mod bbox;
pub mod color;
pub mod error;
pub mod level;

pub use bbox::BoundingBox;
pub use color::Color;
pub use error::{ErrorKind, ErrorPayload, PlotError, PlotResult};
pub use level::Level;
