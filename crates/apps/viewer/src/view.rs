use foundation::math::{Quat, Vec2, Vec3};
use layers::isolines::{IsolineMesh, tessellate};
use runtime::frame::{Frame, FrameRect, Viewport};
use runtime::input::InputEvent;
use runtime::transition::Easing;
use scene::IsolineSet;
use scene::camera::{CameraMatrices, CameraRig, Lens};
use scene::distance::{self, DistanceHit};
use scene::picking::IsolineHitTester;
use scene::selection::NodeSelection;
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::group::{Group, GroupContext, NodePicker};
use crate::trackball::{CameraTransition, CursorHint, Trackball};

/// Isolines live on the unit sphere around the origin.
const SPHERE_CENTER: Vec3 = Vec3::ZERO;

/// Camera, isolines and interaction state of one 3D view.
///
/// Per frame, [`View::update`] advances the camera animation, rebuilds the
/// matrices when the rig or layout changed, and only then reprojects the
/// isoline nodes for hit testing.
#[derive(Debug)]
pub struct View {
    config: ViewerConfig,
    camera: CameraTransition,
    lens: Lens,
    matrices: CameraMatrices,
    hit_tester: IsolineHitTester,
    selection: NodeSelection,
    isolines: IsolineSet,
    mesh: IsolineMesh,
    /// Dispatch order for presses: first group claiming the point wins.
    groups: Vec<Group>,
    /// Group that took the last press; receives drags and the release.
    focus: Option<usize>,
}

impl View {
    pub fn new(
        config: ViewerConfig,
        isolines: IsolineSet,
        viewport: Viewport,
        frame_rect: FrameRect,
    ) -> Self {
        let rig = CameraRig::new(Vec3::ZERO, Quat::IDENTITY, config.focal_length);
        let lens = Lens {
            eye_distance: config.eye_distance,
            ..Lens::default()
        };
        let matrices = CameraMatrices::new(&rig, lens, viewport, frame_rect);
        let mut hit_tester = IsolineHitTester::new(config.pick_radius_px);
        hit_tester.reproject(&isolines, &matrices, SPHERE_CENTER);
        let mesh = tessellate(&isolines, config.tessellation_resolution);
        let groups = vec![
            Group::Isolines(NodePicker::new()),
            Group::Trackball(Trackball::new(config.trackball(), rig)),
        ];

        Self {
            camera: CameraTransition::new(rig, Easing::QuadInOut),
            lens,
            matrices,
            hit_tester,
            selection: NodeSelection::new(),
            isolines,
            mesh,
            groups,
            focus: None,
            config,
        }
    }

    /// Advance one frame. Returns whether the camera matrices changed.
    pub fn update(&mut self, frame: &Frame) -> bool {
        let moved = self.camera.process(frame.dt_s);
        let relaid = frame.viewport != self.matrices.viewport
            || frame.frame_rect != self.matrices.frame_rect;

        if moved || relaid {
            self.matrices = CameraMatrices::new(
                self.camera.current(),
                self.lens,
                frame.viewport,
                frame.frame_rect,
            );
            self.hit_tester
                .reproject(&self.isolines, &self.matrices, SPHERE_CENTER);
        }

        let mut ctx = GroupContext {
            camera: &mut self.camera,
            matrices: &self.matrices,
            hit_tester: &mut self.hit_tester,
            selection: &mut self.selection,
        };
        for group in &mut self.groups {
            group.update(&mut ctx, frame);
        }

        moved || relaid
    }

    /// Route an input event to the groups. Returns whether one consumed it.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        let mut ctx = GroupContext {
            camera: &mut self.camera,
            matrices: &self.matrices,
            hit_tester: &mut self.hit_tester,
            selection: &mut self.selection,
        };

        match event {
            InputEvent::Press(p) => {
                self.focus = None;
                for (i, group) in self.groups.iter_mut().enumerate() {
                    if group.contains(&mut ctx, p) && group.handle(&mut ctx, event) {
                        self.focus = Some(i);
                        return true;
                    }
                }
                // A press on empty space still clears the node selection.
                ctx.selection.select(None);
                false
            }
            InputEvent::Drag(_) => match self.focus {
                Some(i) => self.groups[i].handle(&mut ctx, event),
                None => false,
            },
            InputEvent::Release | InputEvent::Defocus => {
                // The trackball always hears the end of a gesture, even when a
                // later press moved focus elsewhere mid-orbit.
                let focus = self.focus.take();
                let mut consumed = false;
                for (i, group) in self.groups.iter_mut().enumerate() {
                    if focus == Some(i) || group.as_trackball().is_some() {
                        consumed |= group.handle(&mut ctx, event);
                    }
                }
                if matches!(event, InputEvent::Defocus) {
                    ctx.selection.preselect(None);
                }
                consumed
            }
            _ => {
                let mut consumed = false;
                for group in &mut self.groups {
                    consumed |= group.handle(&mut ctx, event);
                }
                consumed
            }
        }
    }

    /// Replace the isoline set, rebuilding everything derived from it.
    pub fn reload(&mut self, isolines: IsolineSet) {
        info!(
            isolines = isolines.isolines.len(),
            nodes = isolines.node_count(),
            background = %isolines.background,
            "reloading isolines"
        );
        self.isolines = isolines;
        self.mesh = tessellate(&self.isolines, self.config.tessellation_resolution);
        self.selection.retain_valid(&self.isolines);
        self.hit_tester
            .reproject(&self.isolines, &self.matrices, SPHERE_CENTER);
        debug!(segments = self.mesh.segment_count(), "isoline mesh rebuilt");
    }

    /// Point on the isoline sphere under pixel `px`, if the ray hits it.
    pub fn surface_point(&self, px: Vec2) -> Option<Vec3> {
        let ray = self.matrices.ray_through(px);
        let c = SPHERE_CENTER - ray.origin;
        let l = c.dot(ray.dir);
        let d2 = c.dot(c) - l * l;
        if d2 > 1.0 {
            return None;
        }
        let t = l - (1.0 - d2).max(0.0).sqrt();
        if t < 0.0 {
            return None;
        }
        Some((ray.at(t) - SPHERE_CENTER).normalize())
    }

    /// Signed distance field sample under pixel `px`.
    pub fn probe(&self, px: Vec2) -> Option<DistanceHit> {
        let x = self.surface_point(px)?;
        distance::nearest_isoline(&self.isolines, x)
    }

    pub fn cursor_hint(&self) -> CursorHint {
        if let Some(i) = self.focus {
            return self.groups[i].cursor_hint(&self.selection);
        }
        self.groups
            .iter()
            .map(|g| g.cursor_hint(&self.selection))
            .find(|hint| *hint != CursorHint::Default)
            .unwrap_or_default()
    }

    pub fn rig(&self) -> &CameraRig {
        self.camera.current()
    }

    pub fn is_animating(&self) -> bool {
        self.camera.is_active()
    }

    pub fn matrices(&self) -> &CameraMatrices {
        &self.matrices
    }

    pub fn selection(&self) -> &NodeSelection {
        &self.selection
    }

    pub fn isolines(&self) -> &IsolineSet {
        &self.isolines
    }

    pub fn mesh(&self) -> &IsolineMesh {
        &self.mesh
    }

    pub fn hit_tester(&self) -> &IsolineHitTester {
        &self.hit_tester
    }

    pub fn trackball(&self) -> Option<&Trackball> {
        self.groups.iter().find_map(Group::as_trackball)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}
