//! Signed geodesic distance from a point on the unit sphere to the isoline
//! network.
//!
//! Sign convention: loops run counter-clockwise when viewed from outside the
//! sphere, so the region on the left of every edge is "inside" and gets a
//! negative distance. Magnitudes are angles in radians.
//!
//! For each directed edge `e0 -> e1` with great-circle normal `n`:
//! - if `x` lies in the arc's perpendicular shadow (bounded by `n × e0` and
//!   `e1 × n`), the candidate is the signed distance to the great circle,
//!   `acos(n·x) - π/2`;
//! - otherwise the closer endpoint is the nearest feature and the sign comes
//!   from the two edges meeting there: convex corners need `x` left of both,
//!   reflex corners left of either.

use std::f64::consts::FRAC_PI_2;

use foundation::math::Vec3;

use crate::isoline::{Isoline, IsolineSet};

/// Winning candidate of a distance query.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DistanceHit {
    /// Isoline that produced the nearest feature.
    pub row: usize,
    /// Signed angular distance (negative inside).
    pub distance: f64,
}

/// Signed angular distance from `x` to the nearest arc of `set`.
///
/// Returns `+∞` when the set has no edges.
pub fn distance(set: &IsolineSet, x: Vec3) -> f64 {
    nearest_isoline(set, x).map_or(f64::INFINITY, |hit| hit.distance)
}

/// Whether `x` is inside the region bounded by the isolines.
pub fn contains(set: &IsolineSet, x: Vec3) -> bool {
    distance(set, x) < 0.0
}

/// The isoline closest to `x`, with the signed distance to it.
pub fn nearest_isoline(set: &IsolineSet, x: Vec3) -> Option<DistanceHit> {
    let mut best: Option<DistanceHit> = None;

    for (row, isoline) in set.isolines.iter().enumerate() {
        if isoline.len() < 2 {
            continue;
        }
        for i in 0..isoline.len() {
            let Some(candidate) = edge_candidate(isoline, i as isize, x) else {
                continue;
            };
            let better = best.is_none_or(|b| candidate.abs() < b.distance.abs());
            if better {
                best = Some(DistanceHit {
                    row,
                    distance: candidate,
                });
            }
        }
    }

    best
}

/// Candidate distance for edge `i` (from `points[i-1]` to `points[i]`).
///
/// Zero-length edges have no great circle and produce no candidate.
fn edge_candidate(isoline: &Isoline, i: isize, x: Vec3) -> Option<f64> {
    let e0 = isoline.point_wrapped(i - 1);
    let e1 = isoline.point_wrapped(i);
    let n = e0.cross(e1).try_normalize()?;

    let a = n.cross(e0);
    let b = e1.cross(n);
    if x.dot(a) >= 0.0 && x.dot(b) >= 0.0 {
        return Some(n.dot(x).clamp(-1.0, 1.0).acos() - FRAC_PI_2);
    }

    if x.dot(e0) >= x.dot(e1) {
        let prev = isoline.point_wrapped(i - 2);
        Some(corner_candidate(x, prev, e0, n))
    } else {
        let next = isoline.point_wrapped(i + 1);
        let out = e1.cross(next).normalize();
        Some(corner_candidate(x, e0, e1, out))
    }
}

/// Signed distance to the corner `v`, reached from `prev`, leaving along the
/// great circle with normal `out`.
fn corner_candidate(x: Vec3, prev: Vec3, v: Vec3, out: Vec3) -> f64 {
    let m = prev.cross(v).normalize();
    let magnitude = v.dot(x).clamp(-1.0, 1.0).acos();

    let reflex = prev.dot(out) < 0.0;
    let inside = if reflex {
        x.dot(out) > 0.0 || x.dot(m) > 0.0
    } else {
        x.dot(out) > 0.0 && x.dot(m) > 0.0
    };

    if inside { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::{contains, distance, nearest_isoline};
    use crate::isoline::{Isoline, IsolineSet};
    use foundation::math::{Vec3, fibonacci_sphere};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn single(points: Vec<Vec3>) -> IsolineSet {
        IsolineSet::new("", vec![Isoline::new(0, "g", "loop", points)])
    }

    fn equator() -> IsolineSet {
        single(vec![Vec3::X, Vec3::Y, -Vec3::X, -Vec3::Y])
    }

    fn triangle() -> IsolineSet {
        single(vec![Vec3::X, Vec3::Y, Vec3::Z])
    }

    fn lat_lon(lat: f64, lon: f64) -> Vec3 {
        Vec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }

    /// Gnomonic lift of tangent-plane coordinates around the north pole.
    fn lift(u: f64, v: f64) -> Vec3 {
        Vec3::new(u, v, 1.0).normalize()
    }

    #[test]
    fn empty_set_is_infinitely_far() {
        assert_eq!(distance(&IsolineSet::default(), Vec3::X), f64::INFINITY);
        assert!(nearest_isoline(&IsolineSet::default(), Vec3::X).is_none());
    }

    #[test]
    fn great_circle_loop_signs() {
        let set = equator();
        assert_close(distance(&set, Vec3::Z), -FRAC_PI_2, 1e-12);
        assert_close(distance(&set, -Vec3::Z), FRAC_PI_2, 1e-12);
        assert_close(distance(&set, lat_lon(FRAC_PI_6, 0.8)), -FRAC_PI_6, 1e-12);
        assert_close(distance(&set, lat_lon(-FRAC_PI_6, 2.0)), FRAC_PI_6, 1e-12);
        assert_close(distance(&set, Vec3::new(1.0, 1.0, 0.0).normalize()), 0.0, 1e-12);
    }

    #[test]
    fn reversed_loop_flips_sign() {
        let set = single(vec![-Vec3::Y, -Vec3::X, Vec3::Y, Vec3::X]);
        assert_close(distance(&set, Vec3::Z), FRAC_PI_2, 1e-12);
        assert_close(distance(&set, -Vec3::Z), -FRAC_PI_2, 1e-12);
    }

    #[test]
    fn triangle_centroid_is_inside() {
        let set = triangle();
        let c = Vec3::new(0.5, 0.5, 0.5).normalize();
        let d = distance(&set, c);
        assert!(d < 0.0);
        // asin(1/√3): angle from the centroid to each side's great circle.
        assert_close(d, -(1.0f64 / 3.0).sqrt().asin(), 1e-12);
        assert!(contains(&set, c));
    }

    #[test]
    fn triangle_far_side_is_outside() {
        let set = triangle();
        let far = distance(&set, -Vec3::X);
        assert_close(far, FRAC_PI_2, 1e-12);

        let samples = [
            Vec3::new(0.5, 0.5, 0.5).normalize(),
            Vec3::new(1.0, 1.0, 0.1).normalize(),
            Vec3::new(1.0, 1.0, -0.3).normalize(),
            Vec3::new(1.0, -0.2, -0.2).normalize(),
            Vec3::new(0.2, 0.9, 0.4).normalize(),
        ];
        for s in samples {
            assert!(distance(&set, s) < far, "{s:?}");
        }
    }

    #[test]
    fn points_on_edges_and_corners_are_zero() {
        let set = triangle();
        assert_close(distance(&set, Vec3::new(1.0, 1.0, 0.0).normalize()), 0.0, 1e-12);
        assert_close(distance(&set, Vec3::Y).abs(), 0.0, 1e-12);
    }

    #[test]
    fn convex_corner_outside() {
        let set = triangle();
        let x = Vec3::new(1.0, -0.2, -0.2).normalize();
        let d = distance(&set, x);
        assert!(d > 0.0);
        assert_close(d, x.angle_to(Vec3::X), 1e-12);
    }

    #[test]
    fn reflex_corner_inside() {
        // Dart with a notch at the pole (tangent-plane coordinates, CCW).
        let set = single(vec![lift(0.0, 0.6), lift(-0.3, -0.3), lift(0.0, 0.0), lift(0.3, -0.3)]);
        let inside = lift(0.0, 0.05);
        let d = distance(&set, inside);
        assert!(d < 0.0, "{d}");
        assert_close(d.abs(), inside.angle_to(Vec3::Z), 1e-12);

        let below = lift(0.0, -0.1);
        assert!(distance(&set, below) > 0.0);
    }

    #[test]
    fn nearest_isoline_reports_row() {
        let set = IsolineSet::new(
            "",
            vec![
                Isoline::new(0, "g", "equator", vec![Vec3::X, Vec3::Y, -Vec3::X, -Vec3::Y]),
                Isoline::new(
                    1,
                    "g",
                    "cap",
                    vec![lat_lon(1.2, 0.0), lat_lon(1.2, 2.1), lat_lon(1.2, 4.2)],
                ),
            ],
        );
        let hit = nearest_isoline(&set, lat_lon(1.3, 1.0)).expect("hit");
        assert_eq!(hit.row, 1);
        let hit = nearest_isoline(&set, lat_lon(0.1, 1.0)).expect("hit");
        assert_eq!(hit.row, 0);
    }

    #[test]
    fn degenerate_edges_are_skipped() {
        let set = single(vec![Vec3::X, Vec3::X, Vec3::Y, -Vec3::X, -Vec3::Y]);
        assert_close(distance(&set, Vec3::Z), -FRAC_PI_2, 1e-12);
    }

    #[test]
    fn field_is_finite_everywhere() {
        let set = triangle();
        for p in fibonacci_sphere(500) {
            let d = distance(&set, p);
            assert!(d.is_finite());
            assert!(d.abs() <= std::f64::consts::PI);
        }
    }
}
