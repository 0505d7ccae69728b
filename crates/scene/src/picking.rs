use foundation::math::{Vec2, Vec3};

use crate::camera::CameraMatrices;
use crate::isoline::{IsolineSet, NodeIndex};

/// Default pick radius in pixels.
pub const DEFAULT_PICK_RADIUS_PX: f64 = 7.0;

#[derive(Debug, Copy, Clone, PartialEq)]
struct Memo {
    point: Vec2,
    result: Option<NodeIndex>,
}

/// Screen-space hit testing for isoline nodes.
///
/// Ordering contract:
/// - `reproject` must run after the camera matrices for the frame are final.
/// - `find_nearest` answers from the last projection; among nodes within the
///   pick radius, the first in row-major order wins.
///
/// The single-entry memo only matches the exact same query point and is
/// dropped whenever the projection is recomputed.
#[derive(Debug, Clone)]
pub struct IsolineHitTester {
    projected: Vec<Vec<Option<Vec2>>>,
    memo: Option<Memo>,
    radius_px: f64,
}

impl Default for IsolineHitTester {
    fn default() -> Self {
        Self::new(DEFAULT_PICK_RADIUS_PX)
    }
}

impl IsolineHitTester {
    pub fn new(radius_px: f64) -> Self {
        Self {
            projected: Vec::new(),
            memo: None,
            radius_px: radius_px.max(0.0),
        }
    }

    pub fn radius_px(&self) -> f64 {
        self.radius_px
    }

    fn invalidate(&mut self) {
        self.memo = None;
    }

    /// Recompute the screen position of every node.
    ///
    /// Nodes on the far side of the sphere (seen from `matrices.eye`) and
    /// nodes outside the viewport are stored as `None`.
    pub fn reproject(&mut self, set: &IsolineSet, matrices: &CameraMatrices, sphere_center: Vec3) {
        self.invalidate();
        self.projected.clear();
        self.projected.extend(set.isolines.iter().map(|iso| {
            iso.points
                .iter()
                .map(|node| {
                    if is_front_facing(matrices.eye, *node, sphere_center) {
                        matrices.project(*node)
                    } else {
                        None
                    }
                })
                .collect()
        }));
    }

    pub fn projected(&self, index: NodeIndex) -> Option<Vec2> {
        *self.projected.get(index.row)?.get(index.column)?
    }

    pub fn visible_count(&self) -> usize {
        self.projected.iter().flatten().filter(|p| p.is_some()).count()
    }

    /// The node under `point` (pixels), if any lies within the pick radius.
    pub fn find_nearest(&mut self, point: Vec2) -> Option<NodeIndex> {
        if let Some(memo) = self.memo {
            if memo.point == point {
                return memo.result;
            }
        }

        let result = self.scan(point);
        self.memo = Some(Memo { point, result });
        result
    }

    /// The memoized query, if any.
    pub fn memoized(&self) -> Option<(Vec2, Option<NodeIndex>)> {
        self.memo.map(|m| (m.point, m.result))
    }

    fn scan(&self, point: Vec2) -> Option<NodeIndex> {
        let r2 = self.radius_px * self.radius_px;
        for (row, nodes) in self.projected.iter().enumerate() {
            for (column, p) in nodes.iter().enumerate() {
                let Some(p) = p else {
                    continue;
                };
                if (*p - point).length_squared() < r2 {
                    return Some(NodeIndex::new(row, column));
                }
            }
        }
        None
    }
}

fn is_front_facing(eye: Vec3, node: Vec3, sphere_center: Vec3) -> bool {
    (eye - node).dot(node - sphere_center) >= 0.0
}
