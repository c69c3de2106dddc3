//! Visual encodings: data values to colors, counts and marker sizes.
//!
//! Encoders are pure. They read joined data or validated parameters and
//! produce drawable descriptions without touching a canvas.

mod choropleth;
mod hist2d;
mod markers;

pub use choropleth::{encode_choropleth, ChoroplethEncoding, RegionFill};
pub use hist2d::{Hist2DGrid, HistCell};
pub use markers::{encode_markers, Marker};
