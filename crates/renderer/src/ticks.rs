//! "Nice number" tick placement for colorbars.

/// Default maximum number of tick intervals on a colorbar.
pub const DEFAULT_MAX_BINS: usize = 6;

/// Step multipliers tried for each power of ten, smallest first.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Tick positions within `[vmin, vmax]`, using at most `max_bins` intervals
/// at a step of 1, 2, 2.5 or 5 times a power of ten.
///
/// A degenerate or non-finite range yields the single value `vmin` (or no
/// ticks if `vmin` is not finite).
pub fn nice_ticks(vmin: f64, vmax: f64, max_bins: usize) -> Vec<f64> {
    if !vmin.is_finite() || !vmax.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = if vmin <= vmax { (vmin, vmax) } else { (vmax, vmin) };
    if hi - lo <= f64::EPSILON * hi.abs().max(1.0) {
        return vec![lo];
    }

    let max_bins = max_bins.max(1);
    let raw_step = (hi - lo) / max_bins as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());

    for multiplier in NICE_STEPS.iter().chain([20.0].iter()) {
        let step = multiplier * magnitude;
        let eps = step * 1e-9;
        let first = ((lo - eps) / step).ceil() as i64;
        let last = ((hi + eps) / step).floor() as i64;
        let span_bins = (((hi - eps) / step).ceil() - ((lo + eps) / step).floor()) as usize;
        if span_bins <= max_bins && last >= first {
            return (first..=last).map(|k| clean(k as f64 * step, step)).collect();
        }
    }

    vec![lo, hi]
}

/// Round away float noise (e.g. `0.30000000000000004`) relative to `step`.
fn clean(value: f64, step: f64) -> f64 {
    let digits = (-step.log10().floor()).max(0.0) as i32 + 2;
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
