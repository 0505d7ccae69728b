use super::{Quat, Vec3, Vec4};

/// Row-major 4x4 matrix acting on column vectors (`m * v`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub rows: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { rows }
    }

    /// World-to-camera transform for a camera at `eye` with the given
    /// orientation (camera looks down its local `-Z`, `+Y` up).
    pub fn view(eye: Vec3, orientation: Quat) -> Self {
        let right = orientation.rotate(Vec3::X);
        let up = orientation.rotate(Vec3::Y);
        let back = orientation.rotate(Vec3::Z);
        Self::from_rows([
            [right.x, right.y, right.z, -right.dot(eye)],
            [up.x, up.y, up.z, -up.dot(eye)],
            [back.x, back.y, back.z, -back.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Off-center right-handed perspective with a `[0, 1]` depth range.
    ///
    /// `scale` maps `x / -z` and `y / -z` to NDC units; `center` is the NDC
    /// position of the optical axis.
    pub fn perspective_off_center(scale: [f64; 2], center: [f64; 2], near: f64, far: f64) -> Self {
        let m22 = far / (near - far);
        let m23 = (near * far) / (near - far);
        Self::from_rows([
            [scale[0], 0.0, -center[0], 0.0],
            [0.0, scale[1], -center[1], 0.0],
            [0.0, 0.0, m22, m23],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        let r = &self.rows;
        Vec4::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z + r[0][3] * v.w,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z + r[1][3] * v.w,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z + r[2][3] * v.w,
            r[3][0] * v.x + r[3][1] * v.y + r[3][2] * v.z + r[3][3] * v.w,
        )
    }

    pub fn transform_point(&self, p: Vec3) -> Vec4 {
        self.mul_vec4(p.extend(1.0))
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        let mut c = [[0.0; 4]; 4];
        for (row, out_row) in c.iter_mut().enumerate() {
            for (col, out) in out_row.iter_mut().enumerate() {
                *out = (0..4)
                    .map(|k| self.rows[row][k] * other.rows[k][col])
                    .sum();
            }
        }
        Self::from_rows(c)
    }
}
