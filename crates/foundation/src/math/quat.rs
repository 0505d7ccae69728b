//! Unit quaternions for camera orientation.
//!
//! Convention: `w` is the scalar part, `(x, y, z)` the bivector part. Every
//! product is renormalized so long chains of drag updates do not drift off
//! the unit sphere.

use super::Vec3;

/// Dot product above which slerp falls back to normalized lerp (about 1.8°).
const SLERP_LINEAR_THRESHOLD: f64 = 0.9995;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Build from a scalar and a bivector part. The result is not normalized.
    pub const fn new(w: f64, v: Vec3) -> Self {
        Self {
            w,
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    pub fn vector(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Rotation of `angle` radians about `axis`. A zero axis yields identity.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let Some(axis) = axis.try_normalize() else {
            return Self::IDENTITY;
        };
        let half = angle * 0.5;
        Self::new(half.cos(), axis * half.sin())
    }

    /// Shortest rotation taking unit vector `s` onto unit vector `t`.
    ///
    /// Uses the half-angle form with `sqrt(2 (1 + s·t))` as normalizer. For
    /// antiparallel input that scalar vanishes; the rotation is then a half
    /// turn about an axis perpendicular to `s`.
    pub fn from_to(s: Vec3, t: Vec3) -> Self {
        let d = s.dot(t);
        let c2 = 2.0 * (1.0 + d);
        if c2 < 1e-12 {
            let mut axis = Vec3::X.cross(s);
            if axis.length_squared() < 1e-12 {
                axis = Vec3::Y.cross(s);
            }
            return Self::new(0.0, axis.normalize());
        }
        let c = c2.sqrt();
        Self::new(0.5 * c, s.cross(t) * (1.0 / c)).normalize()
    }

    pub fn dot(self, other: Self) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Self {
        let n = self.length();
        if n > 1e-10 && n.is_finite() {
            let inv = 1.0 / n;
            Self {
                w: self.w * inv,
                x: self.x * inv,
                y: self.y * inv,
                z: self.z * inv,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Inverse of a unit quaternion (its conjugate).
    pub fn inverse(self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Apply the rotation to a point: `q p q⁻¹`.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = self.vector();
        let t = qv.cross(v) * 2.0;
        v + t * self.w + qv.cross(t)
    }

    /// Rotation angle in radians, in `[0, 2π]`.
    pub fn angle(self) -> f64 {
        2.0 * self.w.clamp(-1.0, 1.0).acos()
    }

    /// Spherical linear interpolation along the shorter arc.
    pub fn slerp(self, other: Self, t: f64) -> Self {
        let mut b = other;
        let mut dot = self.dot(other);
        if dot < 0.0 {
            b = Self {
                w: -b.w,
                x: -b.x,
                y: -b.y,
                z: -b.z,
            };
            dot = -dot;
        }

        if dot > SLERP_LINEAR_THRESHOLD {
            return Self {
                w: self.w + t * (b.w - self.w),
                x: self.x + t * (b.x - self.x),
                y: self.y + t * (b.y - self.y),
                z: self.z + t * (b.z - self.z),
            }
            .normalize();
        }

        let theta_0 = dot.clamp(-1.0, 1.0).acos();
        let sin_theta_0 = theta_0.sin();
        let s0 = (theta_0 * (1.0 - t)).sin() / sin_theta_0;
        let s1 = (theta_0 * t).sin() / sin_theta_0;

        Self {
            w: s0 * self.w + s1 * b.w,
            x: s0 * self.x + s1 * b.x,
            y: s0 * self.y + s1 * b.y,
            z: s0 * self.z + s1 * b.z,
        }
        .normalize()
    }
}

/// Composition `a ∘ b`: apply `b` first, then `a`.
impl std::ops::Mul for Quat {
    type Output = Self;

    fn mul(self, b: Self) -> Self::Output {
        let a = self;
        Self {
            w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            x: a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            y: a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            z: a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        }
        .normalize()
    }
}
