//! Raster rendering primitives for geoplot figures.
//!
//! - [`canvas`]: anti-aliased polygon, stroke and marker drawing
//! - [`colormap`]: named continuous color scales
//! - [`colorbar`]: vertical legend with "nice" ticks
//! - [`format`]: tick label patterns such as `{x:,.0f}`
//! - [`text`]: label rendering with a TrueType font
//! - [`png`]: indexed/RGBA PNG encoding

pub mod canvas;
pub mod colorbar;
pub mod colormap;
pub mod format;
pub mod png;
pub mod text;
pub mod ticks;

pub use canvas::{Canvas, PixelRect};
pub use colorbar::{Colorbar, ColorbarStyle};
pub use colormap::{Colormap, Normalize};
pub use format::TickFormat;
pub use text::{draw_labels, Label, LabelFont};
