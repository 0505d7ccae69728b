use crate::isoline::{IsolineSet, NodeIndex};

/// Selected (clicked) and preselected (hovered) isoline nodes, consumed by
/// the overlay indicator renderer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct NodeSelection {
    selected: Option<NodeIndex>,
    preselected: Option<NodeIndex>,
}

impl NodeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<NodeIndex> {
        self.selected
    }

    pub fn preselected(&self) -> Option<NodeIndex> {
        self.preselected
    }

    /// Returns `true` if the selection changed.
    pub fn select(&mut self, node: Option<NodeIndex>) -> bool {
        let changed = self.selected != node;
        self.selected = node;
        changed
    }

    /// Returns `true` if the preselection changed.
    pub fn preselect(&mut self, node: Option<NodeIndex>) -> bool {
        let changed = self.preselected != node;
        self.preselected = node;
        changed
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.preselected = None;
    }

    /// Drop indices that no longer address a node of `set` (after a reload).
    pub fn retain_valid(&mut self, set: &IsolineSet) {
        if self.selected.is_some_and(|i| set.node(i).is_none()) {
            self.selected = None;
        }
        if self.preselected.is_some_and(|i| set.node(i).is_none()) {
            self.preselected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NodeSelection;
    use crate::isoline::{Isoline, IsolineSet, NodeIndex};
    use foundation::math::Vec3;

    #[test]
    fn select_reports_changes() {
        let mut s = NodeSelection::new();
        assert!(s.select(Some(NodeIndex::new(0, 1))));
        assert!(!s.select(Some(NodeIndex::new(0, 1))));
        assert!(s.preselect(Some(NodeIndex::new(2, 0))));
        assert_eq!(s.selected(), Some(NodeIndex::new(0, 1)));
        assert_eq!(s.preselected(), Some(NodeIndex::new(2, 0)));
        s.clear();
        assert_eq!(s, NodeSelection::default());
    }

    #[test]
    fn retain_valid_drops_stale_indices() {
        let set = IsolineSet::new("", vec![Isoline::new(0, "g", "a", vec![Vec3::X, Vec3::Y])]);
        let mut s = NodeSelection::new();
        s.select(Some(NodeIndex::new(0, 1)));
        s.preselect(Some(NodeIndex::new(3, 0)));
        s.retain_valid(&set);
        assert_eq!(s.selected(), Some(NodeIndex::new(0, 1)));
        assert_eq!(s.preselected(), None);
    }
}
