//! Named colormaps for continuous value → color scales.
//!
//! Each colormap is a list of evenly spaced color stops. Sampling quantizes
//! the normalized value to [`LUT_SIZE`] levels before interpolating, so a
//! rendered scale never carries more than 256 distinct colors.

use geoplot_common::{Color, PlotError, PlotResult};

/// Number of discrete levels a colormap resolves to.
pub const LUT_SIZE: usize = 256;

/// Stops as 0xRRGGBB, low end first.
const REGISTRY: &[(&str, &[u32])] = &[
    // ColorBrewer sequential
    ("GnBu", &[0xf7fcf0, 0xe0f3db, 0xccebc5, 0xa8ddb5, 0x7bccc4, 0x4eb3d3, 0x2b8cbe, 0x0868ac, 0x084081]),
    ("Blues", &[0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b]),
    ("BuGn", &[0xf7fcfd, 0xe5f5f9, 0xccece6, 0x99d8c9, 0x66c2a4, 0x41ae76, 0x238b45, 0x006d2c, 0x00441b]),
    ("Greens", &[0xf7fcf5, 0xe5f5e0, 0xc7e9c0, 0xa1d99b, 0x74c476, 0x41ab5d, 0x238b45, 0x006d2c, 0x00441b]),
    ("Greys", &[0xffffff, 0xf0f0f0, 0xd9d9d9, 0xbdbdbd, 0x969696, 0x737373, 0x525252, 0x252525, 0x000000]),
    ("Oranges", &[0xfff5eb, 0xfee6ce, 0xfdd0a2, 0xfdae6b, 0xfd8d3c, 0xf16913, 0xd94801, 0xa63603, 0x7f2704]),
    ("OrRd", &[0xfff7ec, 0xfee8c8, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xef6548, 0xd7301f, 0xb30000, 0x7f0000]),
    ("PuBu", &[0xfff7fb, 0xece7f2, 0xd0d1e6, 0xa6bddb, 0x74a9cf, 0x3690c0, 0x0570b0, 0x045a8d, 0x023858]),
    ("Purples", &[0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f, 0x3f007d]),
    ("Reds", &[0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d]),
    ("YlGn", &[0xffffe5, 0xf7fcb9, 0xd9f0a3, 0xaddd8e, 0x78c679, 0x41ab5d, 0x238443, 0x006837, 0x004529]),
    ("YlGnBu", &[0xffffd9, 0xedf8b1, 0xc7e9b4, 0x7fcdbb, 0x41b6c4, 0x1d91c0, 0x225ea8, 0x253494, 0x081d58]),
    ("YlOrRd", &[0xffffcc, 0xffeda0, 0xfed976, 0xfeb24c, 0xfd8d3c, 0xfc4e2a, 0xe31a1c, 0xbd0026, 0x800026]),
    // Diverging
    ("RdYlBu", &[0xa50026, 0xd73027, 0xf46d43, 0xfdae61, 0xfee090, 0xffffbf, 0xe0f3f8, 0xabd9e9, 0x74add1, 0x4575b4, 0x313695]),
    ("Spectral", &[0x9e0142, 0xd53e4f, 0xf46d43, 0xfdae61, 0xfee08b, 0xffffbf, 0xe6f598, 0xabdda4, 0x66c2a5, 0x3288bd, 0x5e4fa2]),
    ("coolwarm", &[0x3b4cc0, 0x6282ea, 0x8db0fe, 0xb8d0f9, 0xdddcdc, 0xf5c4ad, 0xf49a7b, 0xe26952, 0xb40426]),
    // Perceptually uniform
    ("viridis", &[0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b, 0xfde725]),
    ("plasma", &[0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26, 0xf0f921]),
    ("inferno", &[0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d, 0xfcffa4]),
    ("magma", &[0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d, 0xfcfdbf]),
    ("cividis", &[0x00224e, 0x123570, 0x3b496c, 0x575d6d, 0x707173, 0x8a8678, 0xa59c74, 0xc3b369, 0xe1cc55, 0xfee838]),
];

/// Suffix selecting the reversed variant of a colormap.
const REVERSED_SUFFIX: &str = "_r";

/// A resolved colormap.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<Color>,
}

impl Colormap {
    /// Look up a colormap by name.
    ///
    /// Exact names win; otherwise the match is case-insensitive. A trailing
    /// `_r` selects the reversed colormap.
    pub fn lookup(name: &str) -> PlotResult<Colormap> {
        let (base, reversed) = match name.strip_suffix(REVERSED_SUFFIX) {
            Some(base) => (base, true),
            None => (name, false),
        };

        let entry = REGISTRY
            .iter()
            .find(|(n, _)| *n == base)
            .or_else(|| REGISTRY.iter().find(|(n, _)| n.eq_ignore_ascii_case(base)))
            .ok_or_else(|| PlotError::UnknownColormap(name.to_string()))?;

        let mut stops: Vec<Color> = entry.1.iter().map(|&hex| rgb_from_u32(hex)).collect();
        if reversed {
            stops.reverse();
        }

        Ok(Colormap {
            name: name.to_string(),
            stops,
        })
    }

    /// Names of every registered colormap (without `_r` variants).
    pub fn names() -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().map(|(n, _)| *n)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color for a normalized value in `0.0..=1.0` (clamped; NaN maps to the
    /// low end).
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let level = (t * (LUT_SIZE - 1) as f64).round() / (LUT_SIZE - 1) as f64;

        let segments = (self.stops.len() - 1) as f64;
        let pos = level * segments;
        let low = (pos.floor() as usize).min(self.stops.len() - 2);
        self.stops[low].lerp(self.stops[low + 1], pos - low as f64)
    }

    /// Color for a raw value on the scale `norm`.
    pub fn map(&self, value: f64, norm: &Normalize) -> Color {
        self.sample(norm.apply(value))
    }
}

fn rgb_from_u32(hex: u32) -> Color {
    Color::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Linear normalization of `[vmin, vmax]` onto `[0, 1]`.
///
/// A degenerate range (`vmin == vmax`) maps every value to 0.5 instead of
/// dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    /// Range spanning every finite value, or `None` if there is none.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .map(|(lo, hi)| Self::new(lo, hi))
    }

    /// True when the ends are equal up to rounding at their magnitude.
    pub fn is_degenerate(&self) -> bool {
        (self.vmax - self.vmin).abs() <= f64::EPSILON * self.vmin.abs().max(self.vmax.abs())
    }

    pub fn apply(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.5;
        }
        ((value - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_registry_entry_has_two_stops() {
        for (name, stops) in REGISTRY {
            assert!(stops.len() >= 2, "{} needs at least 2 stops", name);
        }
    }

    #[test]
    fn test_sample_endpoints() {
        let cmap = Colormap::lookup("GnBu").unwrap();
        assert_eq!(cmap.sample(0.0), Color::rgb(0xf7, 0xfc, 0xf0));
        assert_eq!(cmap.sample(1.0), Color::rgb(0x08, 0x40, 0x81));
        assert_eq!(cmap.sample(-3.0), cmap.sample(0.0));
        assert_eq!(cmap.sample(f64::NAN), cmap.sample(0.0));
    }

    #[test]
    fn test_reversed() {
        let fwd = Colormap::lookup("viridis").unwrap();
        let rev = Colormap::lookup("viridis_r").unwrap();
        assert_eq!(fwd.sample(0.0), rev.sample(1.0));
        assert_eq!(rev.name(), "viridis_r");
    }

    #[test]
    fn test_case_insensitive_fallback() {
        assert!(Colormap::lookup("gnbu").is_ok());
        assert!(matches!(
            Colormap::lookup("jet2000"),
            Err(PlotError::UnknownColormap(_))
        ));
    }

    #[test]
    fn test_normalize_degenerate() {
        let norm = Normalize::new(5.0, 5.0);
        assert!(norm.is_degenerate());
        assert_eq!(norm.apply(5.0), 0.5);
        assert_eq!(Normalize::new(100.0, 200.0).apply(150.0), 0.5);
    }

    #[test]
    fn test_normalize_from_values_skips_non_finite() {
        let norm = Normalize::from_values([3.0, f64::NAN, -1.0, 7.0]).unwrap();
        assert_eq!(norm, Normalize::new(-1.0, 7.0));
        assert!(Normalize::from_values([f64::NAN]).is_none());
    }
}
