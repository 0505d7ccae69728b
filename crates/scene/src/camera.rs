//! Camera rig and the matrices derived from it.
//!
//! The camera orbits `center` at a fixed eye distance; zoom is a change of
//! focal length, not of distance. Screen space is pixels with the origin at
//! the bottom-left of the viewport.

use foundation::math::{Mat4, Quat, Vec2, Vec3};
use runtime::frame::{FrameRect, Viewport};
use runtime::transition::Interpolate;

/// Focal lengths below this are clamped (millimetres).
pub const MIN_FOCAL_LENGTH: f64 = 20.0;

/// Film height the focal length refers to (35mm full frame, millimetres).
pub const FILM_HEIGHT_MM: f64 = 24.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraRig {
    /// Orbit target in world space.
    pub center: Vec3,
    pub orientation: Quat,
    /// Millimetres on a 24mm-high film; never below [`MIN_FOCAL_LENGTH`].
    pub focal_length: f64,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, 35.0)
    }
}

impl CameraRig {
    pub fn new(center: Vec3, orientation: Quat, focal_length: f64) -> Self {
        Self {
            center,
            orientation: orientation.normalize(),
            focal_length: focal_length.max(MIN_FOCAL_LENGTH),
        }
    }

    /// Camera position for a camera `eye_distance` behind the center.
    pub fn eye_position(&self, eye_distance: f64) -> Vec3 {
        self.center + self.orientation.rotate(Vec3::Z * eye_distance)
    }

    /// View direction (unit), from the eye towards the center.
    pub fn forward(&self) -> Vec3 {
        self.orientation.rotate(-Vec3::Z)
    }
}

impl Interpolate for CameraRig {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        Self {
            center: self.center.lerp(other.center, t),
            orientation: self.orientation.slerp(other.orientation, t),
            focal_length: self.focal_length + (other.focal_length - self.focal_length) * t,
        }
    }
}

/// Fixed optical parameters shared by every rig of a view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lens {
    pub eye_distance: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            eye_distance: 4.0,
            near: 0.05,
            far: 100.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Maps normalized device coordinates to world-space rays through the
/// projection it was captured from. Cheap to copy, so it can be snapshotted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rayfilm {
    eye: Vec3,
    orientation: Quat,
    scale: [f64; 2],
    axis_ndc: [f64; 2],
}

impl Rayfilm {
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let local = Vec3::new(
            (ndc.x - self.axis_ndc[0]) / self.scale[0],
            (ndc.y - self.axis_ndc[1]) / self.scale[1],
            -1.0,
        );
        Ray::new(self.eye, self.orientation.rotate(local).normalize())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    /// Camera position in world space.
    pub eye: Vec3,
    pub rayfilm: Rayfilm,
    pub viewport: Viewport,
    pub frame_rect: FrameRect,
}

impl CameraMatrices {
    /// Derive matrices for `rig` drawn into `frame_rect` of `viewport`.
    ///
    /// The optical axis passes through the frame center and the frame height
    /// corresponds to the full film height.
    pub fn new(rig: &CameraRig, lens: Lens, viewport: Viewport, frame_rect: FrameRect) -> Self {
        let eye = rig.eye_position(lens.eye_distance);
        let focal_px = rig.focal_length.max(MIN_FOCAL_LENGTH) / FILM_HEIGHT_MM * frame_rect.height;
        let scale = [
            2.0 * focal_px / viewport.width,
            2.0 * focal_px / viewport.height,
        ];
        let axis = frame_rect.center();
        let axis_ndc = [
            2.0 * axis.x / viewport.width - 1.0,
            2.0 * axis.y / viewport.height - 1.0,
        ];

        let view = Mat4::view(eye, rig.orientation);
        let projection = Mat4::perspective_off_center(scale, axis_ndc, lens.near, lens.far);

        Self {
            view,
            projection,
            view_projection: projection * view,
            eye,
            rayfilm: Rayfilm {
                eye,
                orientation: rig.orientation,
                scale,
                axis_ndc,
            },
            viewport,
            frame_rect,
        }
    }

    pub fn to_ndc(&self, px: Vec2) -> Vec2 {
        Vec2::new(
            2.0 * px.x / self.viewport.width - 1.0,
            2.0 * px.y / self.viewport.height - 1.0,
        )
    }

    /// World ray through a pixel.
    pub fn ray_through(&self, px: Vec2) -> Ray {
        self.rayfilm.ray(self.to_ndc(px))
    }

    /// Pixel position of a world point, or `None` when it is behind the
    /// camera or outside the viewport.
    pub fn project(&self, p: Vec3) -> Option<Vec2> {
        let clip = self.view_projection.transform_point(p);
        if clip.w <= 1e-9 {
            return None;
        }
        let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
        if !(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0) {
            return None;
        }
        Some(Vec2::new(
            0.5 * (ndc.x + 1.0) * self.viewport.width,
            0.5 * (ndc.y + 1.0) * self.viewport.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraMatrices, CameraRig, Lens, MIN_FOCAL_LENGTH};
    use foundation::math::{Quat, Vec3};
    use runtime::frame::{FrameRect, Viewport};
    use runtime::transition::Interpolate;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn matrices(rig: &CameraRig, frame_rect: FrameRect) -> CameraMatrices {
        CameraMatrices::new(rig, Lens::default(), Viewport::new(800.0, 600.0), frame_rect)
    }

    #[test]
    fn focal_length_is_clamped() {
        let rig = CameraRig::new(Vec3::ZERO, Quat::IDENTITY, 5.0);
        assert_eq!(rig.focal_length, MIN_FOCAL_LENGTH);
    }

    #[test]
    fn default_eye_looks_at_center() {
        let rig = CameraRig::default();
        assert_eq!(rig.eye_position(4.0), Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(rig.forward(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn center_projects_to_frame_center() {
        let rig = CameraRig::new(
            Vec3::new(0.1, -0.2, 0.3),
            Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.9),
            50.0,
        );
        let frame = FrameRect::new(200.0, 0.0, 600.0, 600.0);
        let m = matrices(&rig, frame);
        let px = m.project(rig.center).expect("visible");
        assert_close(px.x, 500.0, 1e-9);
        assert_close(px.y, 300.0, 1e-9);
    }

    #[test]
    fn ray_through_projected_pixel_hits_point() {
        let rig = CameraRig::new(Vec3::ZERO, Quat::from_axis_angle(Vec3::Y, 0.4), 35.0);
        let vp = Viewport::new(800.0, 600.0);
        let m = matrices(&rig, FrameRect::full(vp));
        let p = Vec3::new(0.3, 0.5, 0.8).normalize();
        let px = m.project(p).expect("visible");
        let ray = m.ray_through(px);
        let to_p = (p - ray.origin).normalize();
        assert!(to_p.cross(ray.dir).length() < 1e-9);
        assert!(to_p.dot(ray.dir) > 0.0);
    }

    #[test]
    fn points_behind_camera_do_not_project() {
        let rig = CameraRig::default();
        let vp = Viewport::new(800.0, 600.0);
        let m = matrices(&rig, FrameRect::full(vp));
        assert_eq!(m.project(Vec3::new(0.0, 0.0, 10.0)), None);
        assert_eq!(m.project(Vec3::new(100.0, 0.0, 0.0)), None);
    }

    #[test]
    fn longer_focal_length_magnifies() {
        let vp = Viewport::new(800.0, 600.0);
        let p = Vec3::new(0.5, 0.0, 0.0);
        let wide = matrices(&CameraRig::new(Vec3::ZERO, Quat::IDENTITY, 20.0), FrameRect::full(vp));
        let tele = matrices(&CameraRig::new(Vec3::ZERO, Quat::IDENTITY, 40.0), FrameRect::full(vp));
        let dw = wide.project(p).expect("visible").x - 400.0;
        let dt = tele.project(p).expect("visible").x - 400.0;
        assert_close(dt, 2.0 * dw, 1e-9);
    }

    #[test]
    fn rig_interpolation_blends_all_parts() {
        let a = CameraRig::new(Vec3::ZERO, Quat::IDENTITY, 20.0);
        let b = CameraRig::new(Vec3::new(2.0, 0.0, 0.0), Quat::from_axis_angle(Vec3::Z, 1.0), 40.0);
        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.center, Vec3::new(1.0, 0.0, 0.0));
        assert_close(mid.focal_length, 30.0, 1e-12);
        assert_close(mid.orientation.angle(), 0.5, 1e-9);
        assert_eq!(a.interpolate(&b, 1.0).center, b.center);
    }
}
