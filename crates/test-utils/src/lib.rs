//! Test helpers shared by the geoplot crates.
//!
//! - [`fixtures`]: synthetic county/town GeoJSON
//! - [`generators`]: deterministic point clouds
//! - [`paths`]: temp dirs and on-disk fixtures
//! - [`png`]: decoding and pixel inspection
//!
//! ```ignore
//! use test_utils::{fixtures, temp_test_dir, write_fixture};
//!
//! let dir = temp_test_dir();
//! let path = write_fixture(&dir, "counties.geojson", &fixtures::two_counties());
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;
pub mod png;

pub use generators::*;
pub use paths::*;
pub use png::*;

/// Asserts two numbers are within `eps` of each other, comparing as `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $eps:expr) => {{
        let (l, r, eps) = ($left as f64, $right as f64, $eps as f64);
        assert!(
            (l - r).abs() <= eps,
            "{} = {} is not within {} of {} = {}",
            stringify!($left),
            l,
            eps,
            stringify!($right),
            r
        );
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_approx_eq_within_tolerance() {
        assert_approx_eq!(0.1 + 0.2, 0.3, 1e-12);
        assert_approx_eq!(23.7_f32, 23.7, 1e-5);
    }

    #[test]
    #[should_panic(expected = "is not within")]
    fn test_approx_eq_outside_tolerance() {
        assert_approx_eq!(120.96, 121.0, 0.01);
    }
}
