//! Geometry on the unit sphere.

use std::f64::consts::{PI, TAU};

use super::Vec3;

/// Golden ratio φ.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Points along the great-circle arc from `a` towards `b`.
///
/// The result starts at `a` and stops one step short of `b`, so consecutive
/// edges of a loop can be concatenated without duplicating vertices. The
/// number of samples is `ceil(angle(a, b) / resolution)`.
///
/// Coincident endpoints (or a non-positive resolution) yield just `[a]`.
pub fn subdivide(a: Vec3, b: Vec3, resolution: f64) -> Vec<Vec3> {
    let theta = a.angle_to(b);
    let sin_theta = theta.sin();
    if theta < 1e-9 || sin_theta.abs() < 1e-12 || resolution.is_nan() || resolution <= 0.0 {
        return vec![a];
    }

    let steps = (theta / resolution).ceil().max(1.0) as usize;
    let mut out = Vec::with_capacity(steps);
    for k in 0..steps {
        let t = k as f64 / steps as f64;
        let ca = (theta * (1.0 - t)).sin() / sin_theta;
        let cb = (theta * t).sin() / sin_theta;
        out.push(a * ca + b * cb);
    }
    out
}

/// Deterministic near-uniform sample of `count` unit vectors.
///
/// Golden-ratio sunflower layout: latitude from `(i + 0.5) / count`,
/// longitude from a golden-angle sequence. The longitude sequence is shifted
/// by half a step when the shell index `k(count)` is odd, which keeps the
/// innermost polar turns from bunching up.
pub fn fibonacci_sphere(count: usize) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }

    let n = count as f64;
    let bias = if shell_index(n) % 2 == 1 { 0.5 } else { 0.0 };

    (0..count)
        .map(|i| {
            let i = i as f64;
            let tx = (i + 0.5) / n;
            let ty = ((i + bias) / PHI).fract();
            let z = 1.0 - 2.0 * tx;
            let r = (1.0 - z * z).max(0.0).sqrt();
            let lon = TAU * ty;
            Vec3::new(r * lon.cos(), r * lon.sin(), z)
        })
        .collect()
}

/// Fibonacci shell index `k(n) = floor(log_{φ²}(n π √5))`.
fn shell_index(n: f64) -> u64 {
    let k = ((n * PI * 5f64.sqrt()).ln() / (PHI * PHI).ln()).floor();
    if k.is_finite() && k > 0.0 { k as u64 } else { 0 }
}
