//! Quaternion trackball over a [`CameraRig`].
//!
//! Dragging rotates the rig about its center as if the pointer were glued to
//! a sphere around that center. Discrete commands (jump, zoom, roll, reset)
//! are animated through the camera [`Transition`] and are ignored while a
//! drag is in progress, so a scripted move never fights direct manipulation.

use foundation::math::{Quat, Vec2, Vec3};
use runtime::input::{InputEvent, Key, ScrollDirection};
use runtime::transition::Transition;
use scene::camera::{CameraMatrices, CameraRig, Ray, Rayfilm};
use tracing::debug;

pub type CameraTransition = Transition<CameraRig>;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackballSettings {
    /// Duration of discrete moves, seconds.
    pub transition_s: f64,
    /// Duration of each drag update, seconds.
    pub drag_s: f64,
    pub zoom_step: f64,
    pub zoom_floor: f64,
    /// Roll per key press, radians.
    pub roll_angle: f64,
    pub local_jump_scale: f64,
}

impl Default for TrackballSettings {
    fn default() -> Self {
        Self {
            transition_s: 0.35,
            drag_s: 0.05,
            zoom_step: 10.0,
            zoom_floor: scene::camera::MIN_FOCAL_LENGTH,
            roll_angle: 60f64.to_radians(),
            local_jump_scale: 0.1,
        }
    }
}

/// Snapshot taken when a drag starts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orbit {
    pub original_orientation: Quat,
    pub sphere_radius: f64,
    /// Unit direction from the rig center to the grabbed point.
    pub anchor: Vec3,
    pub rayfilm: Rayfilm,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum TrackballAction {
    #[default]
    None,
    Orbiting(Orbit),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Zoom {
    In,
    Out,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Roll {
    CounterClockwise,
    Clockwise,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over something clickable.
    Pointer,
    Grab,
    Grabbing,
}

/// Discrete command bound to a key.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum KeyCommand {
    JumpLocal(Vec3),
    Zoom(Zoom),
    Roll(Roll),
    Reset,
}

/// Default key bindings.
pub fn key_command(key: Key) -> Option<KeyCommand> {
    let cmd = match key {
        Key::Char(c) => match c.to_ascii_lowercase() {
            'w' => KeyCommand::JumpLocal(Vec3::Y),
            's' => KeyCommand::JumpLocal(-Vec3::Y),
            'a' => KeyCommand::JumpLocal(-Vec3::X),
            'd' => KeyCommand::JumpLocal(Vec3::X),
            'r' => KeyCommand::JumpLocal(-Vec3::Z),
            'f' => KeyCommand::JumpLocal(Vec3::Z),
            'q' => KeyCommand::Roll(Roll::CounterClockwise),
            'e' => KeyCommand::Roll(Roll::Clockwise),
            '+' | '=' => KeyCommand::Zoom(Zoom::In),
            '-' | '_' => KeyCommand::Zoom(Zoom::Out),
            _ => return None,
        },
        Key::PageUp => KeyCommand::Zoom(Zoom::In),
        Key::PageDown => KeyCommand::Zoom(Zoom::Out),
        Key::Home => KeyCommand::Reset,
        Key::Escape => return None,
    };
    Some(cmd)
}

#[derive(Debug, Clone)]
pub struct Trackball {
    action: TrackballAction,
    settings: TrackballSettings,
    /// Rig restored by [`KeyCommand::Reset`].
    home: CameraRig,
}

impl Trackball {
    pub fn new(settings: TrackballSettings, home: CameraRig) -> Self {
        Self {
            action: TrackballAction::None,
            settings,
            home,
        }
    }

    pub fn action(&self) -> &TrackballAction {
        &self.action
    }

    pub fn settings(&self) -> &TrackballSettings {
        &self.settings
    }

    pub fn is_orbiting(&self) -> bool {
        matches!(self.action, TrackballAction::Orbiting(_))
    }

    pub fn cursor_hint(&self) -> CursorHint {
        if self.is_orbiting() {
            CursorHint::Grabbing
        } else {
            CursorHint::Grab
        }
    }

    /// Route one input event. Returns whether it was consumed.
    pub fn handle(
        &mut self,
        event: InputEvent,
        camera: &mut CameraTransition,
        matrices: &CameraMatrices,
    ) -> bool {
        match event {
            InputEvent::Press(p) => {
                self.press(camera, matrices, p);
                true
            }
            InputEvent::Drag(p) => self.drag(camera, matrices, p),
            InputEvent::Release | InputEvent::Defocus => self.release(),
            InputEvent::Scroll(ScrollDirection::Up) => self.zoom(camera, Zoom::In),
            InputEvent::Scroll(ScrollDirection::Down) => self.zoom(camera, Zoom::Out),
            InputEvent::Key(key) => match key_command(key) {
                Some(cmd) => self.command(camera, cmd),
                None => false,
            },
            InputEvent::Hover(_) | InputEvent::Dehover => false,
        }
    }

    /// Start orbiting from pixel `point`.
    ///
    /// Any running animation is frozen first. The grab sphere is centered on
    /// the rig center and is at least as large as the ray's closest approach,
    /// so the press ray always touches it.
    pub fn press(&mut self, camera: &mut CameraTransition, matrices: &CameraMatrices, point: Vec2) {
        camera.stop();
        let rig = *camera.current();
        let rayfilm = matrices.rayfilm;
        let ray = rayfilm.ray(matrices.to_ndc(point));

        let sphere_radius = grab_radius(&ray, rig.center);
        let hit = intersect_near(&ray, rig.center, sphere_radius);
        let anchor = (hit - rig.center).normalize();

        debug!(sphere_radius, ?anchor, "trackball: orbit started");
        self.action = TrackballAction::Orbiting(Orbit {
            original_orientation: rig.orientation,
            sphere_radius,
            anchor,
            rayfilm,
        });
    }

    /// Continue orbiting towards pixel `point`. Returns `false` when idle.
    ///
    /// Rays come from the rayfilm captured at press time, so the result does
    /// not depend on how far the animation has progressed.
    pub fn drag(
        &mut self,
        camera: &mut CameraTransition,
        matrices: &CameraMatrices,
        point: Vec2,
    ) -> bool {
        let TrackballAction::Orbiting(orbit) = self.action else {
            return false;
        };
        let center = camera.target().center;
        let ray = orbit.rayfilm.ray(matrices.to_ndc(point));
        let hit = intersect_near(&ray, center, orbit.sphere_radius);
        let Some(dir) = (hit - center).try_normalize() else {
            return true;
        };

        let rotation = Quat::from_to(orbit.anchor, dir);
        let orientation = rotation.inverse() * orbit.original_orientation;
        camera.charge(self.settings.drag_s, |rig| CameraRig { orientation, ..rig });
        true
    }

    /// Leave orbiting. Returns whether an orbit was in progress.
    pub fn release(&mut self) -> bool {
        let was_orbiting = self.is_orbiting();
        if was_orbiting {
            debug!("trackball: orbit ended");
        }
        self.action = TrackballAction::None;
        was_orbiting
    }

    /// Animate a discrete move. Dropped while orbiting.
    pub fn charge(
        &self,
        camera: &mut CameraTransition,
        mutation: impl FnOnce(CameraRig) -> CameraRig,
    ) -> bool {
        if self.is_orbiting() {
            debug!("trackball: command ignored while orbiting");
            return false;
        }
        camera.charge(self.settings.transition_s, mutation);
        true
    }

    pub fn jump(&self, camera: &mut CameraTransition, center: Vec3) -> bool {
        self.charge(camera, |rig| CameraRig { center, ..rig })
    }

    pub fn jump_relative(&self, camera: &mut CameraTransition, delta: Vec3) -> bool {
        self.charge(camera, |rig| CameraRig {
            center: rig.center + delta,
            ..rig
        })
    }

    /// Move the center by `delta` expressed in the camera frame.
    pub fn jump_local(&self, camera: &mut CameraTransition, delta: Vec3) -> bool {
        let scale = self.settings.local_jump_scale;
        self.charge(camera, |rig| CameraRig {
            center: rig.center + rig.orientation.rotate(delta) * scale,
            ..rig
        })
    }

    pub fn zoom(&self, camera: &mut CameraTransition, zoom: Zoom) -> bool {
        let step = self.settings.zoom_step;
        let floor = self.settings.zoom_floor;
        self.charge(camera, |rig| {
            let focal_length = match zoom {
                Zoom::In => rig.focal_length + step,
                Zoom::Out => (rig.focal_length - step).max(floor),
            };
            CameraRig { focal_length, ..rig }
        })
    }

    /// Rotate about the view axis.
    pub fn roll(&self, camera: &mut CameraTransition, roll: Roll) -> bool {
        let angle = match roll {
            Roll::CounterClockwise => self.settings.roll_angle,
            Roll::Clockwise => -self.settings.roll_angle,
        };
        let spin = Quat::from_axis_angle(Vec3::Z, angle);
        self.charge(camera, |rig| CameraRig {
            orientation: rig.orientation * spin,
            ..rig
        })
    }

    pub fn reset(&self, camera: &mut CameraTransition) -> bool {
        let home = self.home;
        self.charge(camera, |_| home)
    }

    pub fn command(&self, camera: &mut CameraTransition, cmd: KeyCommand) -> bool {
        match cmd {
            KeyCommand::JumpLocal(delta) => self.jump_local(camera, delta),
            KeyCommand::Zoom(zoom) => self.zoom(camera, zoom),
            KeyCommand::Roll(roll) => self.roll(camera, roll),
            KeyCommand::Reset => self.reset(camera),
        }
    }
}

/// `max(1, distance from center to the ray's line)`.
fn grab_radius(ray: &Ray, center: Vec3) -> f64 {
    let c = center - ray.origin;
    let l = c.dot(ray.dir);
    (c.dot(c) - l * l).max(0.0).sqrt().max(1.0)
}

/// Near intersection of `ray` with the sphere, or the point of closest
/// approach when the ray misses.
fn intersect_near(ray: &Ray, center: Vec3, radius: f64) -> Vec3 {
    let c = center - ray.origin;
    let l = c.dot(ray.dir);
    let d2 = (c.dot(c) - l * l).max(0.0);
    let half_chord = (radius * radius - d2).max(0.0).sqrt();
    ray.at(l - half_chord)
}
