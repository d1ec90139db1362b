//! Selected voxel coordinate set.

use glam::IVec3;
use std::collections::HashSet;

/// The set of currently selected voxel coordinates.
///
/// Painting selects the painted cell and erasing deselects it; whole-grid
/// transforms clear the set so no stale coordinate survives a mutation that
/// moved voxels out from under it.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    cells: HashSet<IVec3>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coordinate to the selection.
    pub fn insert(&mut self, pos: IVec3) -> bool {
        self.cells.insert(pos)
    }

    /// Remove a coordinate from the selection.
    pub fn remove(&mut self, pos: IVec3) -> bool {
        self.cells.remove(&pos)
    }

    /// Toggle a coordinate in or out of the selection.
    pub fn toggle(&mut self, pos: IVec3) {
        if !self.cells.insert(pos) {
            self.cells.remove(&pos);
        }
    }

    /// Whether a coordinate is selected.
    pub fn contains(&self, pos: IVec3) -> bool {
        self.cells.contains(&pos)
    }

    /// Iterate the selected coordinates in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.cells.iter().copied()
    }

    /// Number of selected coordinates.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut selection = Selection::new();
        assert!(selection.insert(IVec3::new(1, 2, 3)));
        assert!(selection.contains(IVec3::new(1, 2, 3)));
        assert!(!selection.insert(IVec3::new(1, 2, 3)));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        let pos = IVec3::new(0, 0, 0);
        selection.toggle(pos);
        assert!(selection.contains(pos));
        selection.toggle(pos);
        assert!(!selection.contains(pos));
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::new();
        selection.insert(IVec3::new(1, 0, 0));
        selection.insert(IVec3::new(2, 0, 0));
        selection.clear();
        assert!(selection.is_empty());
    }
}
