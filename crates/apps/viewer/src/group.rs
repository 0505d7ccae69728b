//! Interactive groups of a view.
//!
//! The set of groups is closed, so they are an enum rather than trait
//! objects. Every group answers the same four questions: does it claim a
//! point, how does it react to an event, what does it do each frame, and
//! which cursor it wants.

use foundation::math::Vec2;
use runtime::frame::Frame;
use runtime::input::InputEvent;
use scene::camera::CameraMatrices;
use scene::picking::IsolineHitTester;
use scene::selection::NodeSelection;

use crate::trackball::{CameraTransition, CursorHint, Trackball};

/// View state a group may read or drive while handling input.
pub struct GroupContext<'a> {
    pub camera: &'a mut CameraTransition,
    pub matrices: &'a CameraMatrices,
    pub hit_tester: &'a mut IsolineHitTester,
    pub selection: &'a mut NodeSelection,
}

/// Hover and click selection of isoline nodes.
#[derive(Debug, Clone, Default)]
pub struct NodePicker {
    /// Last hover position, re-tested when the camera moves under a still
    /// pointer.
    hover: Option<Vec2>,
}

impl NodePicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self, ctx: &mut GroupContext<'_>, event: InputEvent) -> bool {
        match event {
            InputEvent::Hover(p) => {
                self.hover = Some(p);
                let node = ctx.hit_tester.find_nearest(p);
                ctx.selection.preselect(node);
                node.is_some()
            }
            InputEvent::Press(p) => {
                let node = ctx.hit_tester.find_nearest(p);
                ctx.selection.select(node);
                node.is_some()
            }
            InputEvent::Dehover => {
                self.hover = None;
                ctx.selection.preselect(None);
                false
            }
            _ => false,
        }
    }

    fn update(&mut self, ctx: &mut GroupContext<'_>) {
        if let Some(p) = self.hover {
            let node = ctx.hit_tester.find_nearest(p);
            ctx.selection.preselect(node);
        }
    }
}

#[derive(Debug, Clone)]
pub enum Group {
    Isolines(NodePicker),
    Trackball(Trackball),
}

impl Group {
    /// Whether a press at `point` belongs to this group.
    pub fn contains(&self, ctx: &mut GroupContext<'_>, point: Vec2) -> bool {
        match self {
            Group::Isolines(_) => ctx.hit_tester.find_nearest(point).is_some(),
            Group::Trackball(_) => ctx.matrices.frame_rect.contains(point),
        }
    }

    /// Returns whether the event was consumed.
    pub fn handle(&mut self, ctx: &mut GroupContext<'_>, event: InputEvent) -> bool {
        match self {
            Group::Isolines(picker) => picker.handle(ctx, event),
            Group::Trackball(trackball) => trackball.handle(event, ctx.camera, ctx.matrices),
        }
    }

    /// Per-frame hook; runs after the matrices and projections are current.
    pub fn update(&mut self, ctx: &mut GroupContext<'_>, _frame: &Frame) {
        match self {
            Group::Isolines(picker) => picker.update(ctx),
            Group::Trackball(_) => {}
        }
    }

    pub fn cursor_hint(&self, selection: &NodeSelection) -> CursorHint {
        match self {
            Group::Isolines(_) if selection.preselected().is_some() => CursorHint::Pointer,
            Group::Isolines(_) => CursorHint::Default,
            Group::Trackball(trackball) => trackball.cursor_hint(),
        }
    }

    pub fn as_trackball(&self) -> Option<&Trackball> {
        match self {
            Group::Trackball(trackball) => Some(trackball),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Group, GroupContext, NodePicker};
    use crate::trackball::{CameraTransition, CursorHint, Trackball, TrackballSettings};
    use foundation::math::{Vec2, Vec3};
    use runtime::frame::{Frame, FrameRect, Viewport};
    use runtime::input::InputEvent;
    use runtime::transition::Easing;
    use scene::camera::{CameraMatrices, CameraRig, Lens};
    use scene::picking::IsolineHitTester;
    use scene::selection::NodeSelection;
    use scene::{Isoline, IsolineSet, NodeIndex};

    struct Fixture {
        camera: CameraTransition,
        matrices: CameraMatrices,
        hit_tester: IsolineHitTester,
        selection: NodeSelection,
    }

    impl Fixture {
        fn new() -> Self {
            let vp = Viewport::new(800.0, 600.0);
            let rig = CameraRig::default();
            let matrices = CameraMatrices::new(&rig, Lens::default(), vp, FrameRect::full(vp));
            let arc = Isoline::new(0, "g", "a", vec![Vec3::Z, Vec3::X]);
            let set = IsolineSet::new("", vec![arc]);
            let mut hit_tester = IsolineHitTester::default();
            hit_tester.reproject(&set, &matrices, Vec3::ZERO);
            Self {
                camera: CameraTransition::new(CameraRig::default(), Easing::default()),
                matrices,
                hit_tester,
                selection: NodeSelection::new(),
            }
        }

        fn ctx(&mut self) -> GroupContext<'_> {
            GroupContext {
                camera: &mut self.camera,
                matrices: &self.matrices,
                hit_tester: &mut self.hit_tester,
                selection: &mut self.selection,
            }
        }
    }

    const NODE_PX: Vec2 = Vec2::new(400.0, 300.0);

    fn trackball_group() -> Group {
        Group::Trackball(Trackball::new(TrackballSettings::default(), CameraRig::default()))
    }

    #[test]
    fn picker_claims_only_points_near_nodes() {
        let mut fx = Fixture::new();
        let picker = Group::Isolines(NodePicker::new());
        assert!(picker.contains(&mut fx.ctx(), NODE_PX));
        assert!(!picker.contains(&mut fx.ctx(), Vec2::new(10.0, 10.0)));

        let trackball = trackball_group();
        assert!(trackball.contains(&mut fx.ctx(), Vec2::new(10.0, 10.0)));
        assert!(!trackball.contains(&mut fx.ctx(), Vec2::new(900.0, 10.0)));
    }

    #[test]
    fn hover_and_press_drive_selection() {
        let mut fx = Fixture::new();
        let mut picker = Group::Isolines(NodePicker::new());

        assert!(picker.handle(&mut fx.ctx(), InputEvent::Hover(NODE_PX)));
        assert_eq!(fx.selection.preselected(), Some(NodeIndex::new(0, 0)));
        assert_eq!(picker.cursor_hint(&fx.selection), CursorHint::Pointer);

        assert!(picker.handle(&mut fx.ctx(), InputEvent::Press(NODE_PX)));
        assert_eq!(fx.selection.selected(), Some(NodeIndex::new(0, 0)));

        assert!(!picker.handle(&mut fx.ctx(), InputEvent::Press(Vec2::new(10.0, 10.0))));
        assert_eq!(fx.selection.selected(), None);

        picker.handle(&mut fx.ctx(), InputEvent::Dehover);
        assert_eq!(fx.selection.preselected(), None);
        assert_eq!(picker.cursor_hint(&fx.selection), CursorHint::Default);
    }

    #[test]
    fn update_refreshes_hover_after_reprojection() {
        let mut fx = Fixture::new();
        let mut picker = Group::Isolines(NodePicker::new());
        picker.handle(&mut fx.ctx(), InputEvent::Hover(NODE_PX));

        fx.hit_tester.reproject(&IsolineSet::default(), &fx.matrices, Vec3::ZERO);
        let vp = Viewport::new(800.0, 600.0);
        picker.update(&mut fx.ctx(), &Frame::first(vp, FrameRect::full(vp)));
        assert_eq!(fx.selection.preselected(), None);
    }

    #[test]
    fn trackball_group_forwards_events() {
        let mut fx = Fixture::new();
        let mut group = trackball_group();
        assert_eq!(group.cursor_hint(&fx.selection), CursorHint::Grab);
        assert!(group.handle(&mut fx.ctx(), InputEvent::Press(NODE_PX)));
        assert_eq!(group.cursor_hint(&fx.selection), CursorHint::Grabbing);
        assert!(group.as_trackball().is_some_and(|t| t.is_orbiting()));
    }
}
