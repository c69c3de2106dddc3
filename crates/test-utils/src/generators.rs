//! Deterministic point-cloud generators.
//!
//! These generators create predictable, verifiable coordinate patterns
//! without pulling a random number generator into every test.

/// Creates `n` copies of the same point.
///
/// # Example
///
/// ```
/// use test_utils::repeated_point;
///
/// let (x, y) = repeated_point((120.96, 23.7), 3);
/// assert_eq!(x, vec![120.96; 3]);
/// assert_eq!(y.len(), 3);
/// ```
pub fn repeated_point(point: (f64, f64), n: usize) -> (Vec<f64>, Vec<f64>) {
    (vec![point.0; n], vec![point.1; n])
}

/// Creates a regular `nx` by `ny` lattice of points spanning the given extent
/// (inclusive of both edges).
pub fn lattice(
    extent: (f64, f64, f64, f64),
    nx: usize,
    ny: usize,
) -> (Vec<f64>, Vec<f64>) {
    let (min_x, min_y, max_x, max_y) = extent;
    let step = |min: f64, max: f64, n: usize, i: usize| {
        if n <= 1 {
            (min + max) / 2.0
        } else {
            min + (max - min) * i as f64 / (n - 1) as f64
        }
    };

    let mut xs = Vec::with_capacity(nx * ny);
    let mut ys = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            xs.push(step(min_x, max_x, nx, i));
            ys.push(step(min_y, max_y, ny, j));
        }
    }
    (xs, ys)
}

/// Creates `n` pseudo-random points scattered around `center` within
/// `radius` degrees, using a fixed-seed linear congruential generator so the
/// output is identical on every run.
pub fn scattered_points(center: (f64, f64), radius: f64, n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        // Top 53 bits as a uniform value in [0, 1)
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for _ in 0..n {
        xs.push(center.0 + (next() * 2.0 - 1.0) * radius);
        ys.push(center.1 + (next() * 2.0 - 1.0) * radius);
    }
    (xs, ys)
}
