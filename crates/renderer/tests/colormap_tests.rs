//! Tests for colormap lookup, sampling and colorbar tick labels.

use geoplot_common::{Color, PlotError};
use renderer::colormap::LUT_SIZE;
use renderer::ticks::nice_ticks;
use renderer::{Colorbar, Colormap, Normalize, TickFormat};
use std::collections::HashSet;
use test_utils::assert_approx_eq;

#[test]
fn test_all_registered_colormaps_resolve_with_reverse() {
    for name in Colormap::names() {
        let cmap = Colormap::lookup(name).unwrap();
        let rev = Colormap::lookup(&format!("{}_r", name)).unwrap();
        assert_eq!(cmap.sample(0.0), rev.sample(1.0), "{}", name);
        assert_eq!(cmap.sample(1.0), rev.sample(0.0), "{}", name);
    }
}

#[test]
fn test_unknown_colormap() {
    let err = Colormap::lookup("NotAColormap").unwrap_err();
    assert!(matches!(err, PlotError::UnknownColormap(ref n) if n == "NotAColormap"));
}

#[test]
fn test_sampling_is_quantized() {
    let cmap = Colormap::lookup("viridis").unwrap();
    let colors: HashSet<Color> = (0..10_000).map(|i| cmap.sample(i as f64 / 9_999.0)).collect();
    assert!(colors.len() <= LUT_SIZE);
    assert!(colors.len() > 100);
}

#[test]
fn test_higher_values_are_darker_in_gnbu() {
    let cmap = Colormap::lookup("GnBu").unwrap();
    let norm = Normalize::new(100.0, 200.0);
    let low = cmap.map(100.0, &norm);
    let high = cmap.map(200.0, &norm);
    let lum = |c: Color| c.r as u32 + c.g as u32 + c.b as u32;
    assert!(lum(high) < lum(low));
}

#[test]
fn test_normalize_over_finite_values() {
    let norm = Normalize::from_values([3.0, f64::NAN, -1.0, 7.0, f64::INFINITY]).unwrap();
    assert_eq!((norm.vmin, norm.vmax), (-1.0, 7.0));
    assert_approx_eq!(norm.apply(1.0), 0.25, 1e-12);
    assert_approx_eq!(norm.apply(100.0), 1.0, 1e-12);
    assert!(Normalize::from_values([f64::NAN]).is_none());
}

#[test]
fn test_small_distinct_values_are_not_degenerate() {
    let norm = Normalize::from_values([1e-17, 5e-17]).unwrap();
    assert!(!norm.is_degenerate());
    assert_approx_eq!(norm.apply(3e-17), 0.5, 1e-9);
    assert!(Normalize::new(0.0, 0.0).is_degenerate());
    assert!(Normalize::new(0.1 + 0.2, 0.3).is_degenerate());
}

#[test]
fn test_degenerate_scale_uses_midpoint() {
    let cmap = Colormap::lookup("GnBu").unwrap();
    let norm = Normalize::new(42.0, 42.0);
    assert_eq!(cmap.map(42.0, &norm), cmap.sample(0.5));
}

#[test]
fn test_colorbar_tick_labels_with_format() {
    let bar = Colorbar::new(
        Colormap::lookup("GnBu").unwrap(),
        Normalize::new(0.0, 5000.0),
        TickFormat::parse("{x:,.0f} 人").unwrap(),
    );
    let labels: Vec<String> = bar.tick_values().iter().map(|&v| bar.format.format(v)).collect();
    assert_eq!(labels.first().map(String::as_str), Some("0 人"));
    assert_eq!(labels.last().map(String::as_str), Some("5,000 人"));
    assert!(labels.len() <= 7);
}

#[test]
fn test_tick_count_bounded() {
    for (lo, hi) in [(0.0, 1.0), (-3.5, 12.0), (1e6, 3.3e6), (0.001, 0.0042)] {
        let ticks = nice_ticks(lo, hi, 6);
        assert!(!ticks.is_empty() && ticks.len() <= 7, "{:?} -> {:?}", (lo, hi), ticks);
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
    }
}
