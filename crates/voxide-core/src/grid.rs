//! Dense cubic voxel grid with generation and whole-grid transforms.

use glam::IVec3;
use rand::Rng;

/// Number of voxels scattered by a single random-fill request.
pub const RANDOM_FILL_COUNT: usize = 48;

/// A `size x size x size` grid of material cells, y up.
///
/// Each cell is either empty or holds a material index into the palette.
/// Cells are addressed by integer coordinates in `0..size` on every axis;
/// reads outside the grid answer as empty and writes outside are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    size: u32,
    cells: Vec<Option<u8>>,
}

impl VoxelGrid {
    /// Create an empty grid with the given edge length.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            cells: vec![None; (size * size * size) as usize],
        }
    }

    /// Edge length of the grid.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether a coordinate lies inside the grid.
    pub fn in_bounds(&self, pos: IVec3) -> bool {
        let s = self.size as i32;
        pos.x >= 0 && pos.x < s && pos.y >= 0 && pos.y < s && pos.z >= 0 && pos.z < s
    }

    fn index(&self, pos: IVec3) -> usize {
        let s = self.size as i64;
        (pos.x as i64 + pos.y as i64 * s + pos.z as i64 * s * s) as usize
    }

    fn coord(&self, index: usize) -> IVec3 {
        let s = self.size as usize;
        IVec3::new(
            (index % s) as i32,
            ((index / s) % s) as i32,
            (index / (s * s)) as i32,
        )
    }

    /// Material at a coordinate, `None` for empty or out-of-bounds cells.
    pub fn get(&self, pos: IVec3) -> Option<u8> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells[self.index(pos)]
    }

    /// Whether the cell at a coordinate is solid.
    pub fn is_solid(&self, pos: IVec3) -> bool {
        self.get(pos).is_some()
    }

    /// Set the material at a coordinate. Returns false if out of bounds.
    pub fn set(&mut self, pos: IVec3, material: u8) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let index = self.index(pos);
        self.cells[index] = Some(material);
        true
    }

    /// Clear the cell at a coordinate, returning the removed material.
    pub fn clear_cell(&mut self, pos: IVec3) -> Option<u8> {
        if !self.in_bounds(pos) {
            return None;
        }
        let index = self.index(pos);
        self.cells[index].take()
    }

    /// Number of solid cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Whether the grid holds no voxels at all.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Iterate all solid cells as `(coordinate, material)` pairs.
    pub fn iter_solid(&self) -> impl Iterator<Item = (IVec3, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|m| (self.coord(i), m)))
    }

    /// Scatter `count` voxels of one material at uniformly random coordinates.
    ///
    /// Collisions overwrite, so the number of cells that become solid can be
    /// lower than `count`.
    pub fn scatter_random<R: Rng>(&mut self, rng: &mut R, count: usize, material: u8) {
        let s = self.size as i32;
        for _ in 0..count {
            let pos = IVec3::new(
                rng.random_range(0..s),
                rng.random_range(0..s),
                rng.random_range(0..s),
            );
            self.set(pos, material);
        }
    }

    /// Fill an axis-aligned cube of side `size / 2` centered in the grid.
    pub fn fill_cube(&mut self, material: u8) {
        let side = (self.size / 2).max(1) as i32;
        let start = (self.size as i32 - side) / 2;
        for z in start..start + side {
            for y in start..start + side {
                for x in start..start + side {
                    self.set(IVec3::new(x, y, z), material);
                }
            }
        }
    }

    /// Fill a ball of radius `size / 2 - 1` centered in the grid.
    pub fn fill_sphere(&mut self, material: u8) {
        let radius = (self.size / 2).saturating_sub(1).max(1) as f32;
        let center = (self.size as f32 - 1.0) / 2.0;
        let s = self.size as i32;
        for z in 0..s {
            for y in 0..s {
                for x in 0..s {
                    let dx = x as f32 - center;
                    let dy = y as f32 - center;
                    let dz = z as f32 - center;
                    if dx * dx + dy * dy + dz * dz <= radius * radius {
                        self.set(IVec3::new(x, y, z), material);
                    }
                }
            }
        }
    }

    /// Mirror the grid across the YZ plane (x -> size-1-x).
    pub fn flip_horizontal(&mut self) {
        self.remap(|pos, size| IVec3::new(size - 1 - pos.x, pos.y, pos.z));
    }

    /// Mirror the grid across the XZ plane (y -> size-1-y).
    pub fn flip_vertical(&mut self) {
        self.remap(|pos, size| IVec3::new(pos.x, size - 1 - pos.y, pos.z));
    }

    fn remap(&mut self, f: impl Fn(IVec3, i32) -> IVec3) {
        let size = self.size as i32;
        let mut cells = vec![None; self.cells.len()];
        for (pos, material) in self.iter_solid() {
            let target = f(pos, size);
            let index = self.index(target);
            cells[index] = Some(material);
        }
        self.cells = cells;
    }

    /// Drop every voxel above `floor` straight down until it rests on the
    /// floor plane or on another solid cell. Cells at or below the floor
    /// height are untouched; vertical order within a column is preserved.
    pub fn melt(&mut self, floor: u32) {
        let s = self.size as i32;
        let floor = floor.min(self.size) as i32;
        for z in 0..s {
            for x in 0..s {
                let mut falling = Vec::new();
                for y in (floor + 1)..s {
                    let pos = IVec3::new(x, y, z);
                    if let Some(material) = self.clear_cell(pos) {
                        falling.push(material);
                    }
                }
                let mut y = floor;
                for material in falling {
                    while y < s && self.is_solid(IVec3::new(x, y, z)) {
                        y += 1;
                    }
                    if y < s {
                        self.set(IVec3::new(x, y, z), material);
                        y += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_set_get_clear() {
        let mut grid = VoxelGrid::new(10);
        let pos = IVec3::new(3, 4, 5);

        assert!(grid.set(pos, 2));
        assert_eq!(grid.get(pos), Some(2));
        assert_eq!(grid.solid_count(), 1);

        assert_eq!(grid.clear_cell(pos), Some(2));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_out_of_bounds_is_empty() {
        let mut grid = VoxelGrid::new(10);
        assert!(!grid.set(IVec3::new(10, 0, 0), 1));
        assert!(!grid.set(IVec3::new(0, -1, 0), 1));
        assert_eq!(grid.get(IVec3::new(-1, 0, 0)), None);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_fill_cube_count() {
        let mut grid = VoxelGrid::new(10);
        grid.fill_cube(0);
        // Side 5 cube centered at 2..7 on each axis.
        assert_eq!(grid.solid_count(), 125);
        assert!(grid.is_solid(IVec3::new(2, 2, 2)));
        assert!(grid.is_solid(IVec3::new(6, 6, 6)));
        assert!(!grid.is_solid(IVec3::new(7, 7, 7)));
    }

    #[test]
    fn test_fill_sphere_is_mirror_symmetric() {
        let mut sphere = VoxelGrid::new(10);
        sphere.fill_sphere(3);
        assert!(!sphere.is_empty());

        let mut flipped = sphere.clone();
        flipped.flip_horizontal();
        assert_eq!(sphere, flipped);

        let mut flipped = sphere.clone();
        flipped.flip_vertical();
        assert_eq!(sphere, flipped);
    }

    #[test]
    fn test_flip_horizontal_moves_voxel() {
        let mut grid = VoxelGrid::new(10);
        grid.set(IVec3::new(0, 1, 2), 4);
        grid.flip_horizontal();
        assert_eq!(grid.get(IVec3::new(9, 1, 2)), Some(4));
        assert_eq!(grid.solid_count(), 1);
    }

    #[test]
    fn test_flip_vertical_moves_voxel() {
        let mut grid = VoxelGrid::new(10);
        grid.set(IVec3::new(1, 0, 2), 4);
        grid.flip_vertical();
        assert_eq!(grid.get(IVec3::new(1, 9, 2)), Some(4));
    }

    #[test]
    fn test_melt_stacks_from_floor() {
        let mut grid = VoxelGrid::new(10);
        grid.set(IVec3::new(2, 5, 2), 1);
        grid.set(IVec3::new(2, 8, 2), 2);

        grid.melt(0);

        assert_eq!(grid.get(IVec3::new(2, 0, 2)), Some(1));
        assert_eq!(grid.get(IVec3::new(2, 1, 2)), Some(2));
        assert_eq!(grid.solid_count(), 2);
    }

    #[test]
    fn test_melt_rests_on_existing_ground() {
        let mut grid = VoxelGrid::new(10);
        grid.set(IVec3::new(4, 0, 4), 7);
        grid.set(IVec3::new(4, 6, 4), 1);

        grid.melt(0);

        assert_eq!(grid.get(IVec3::new(4, 0, 4)), Some(7));
        assert_eq!(grid.get(IVec3::new(4, 1, 4)), Some(1));
    }

    #[test]
    fn test_melt_ignores_cells_below_floor() {
        let mut grid = VoxelGrid::new(10);
        grid.set(IVec3::new(1, 2, 1), 5);
        grid.set(IVec3::new(1, 9, 1), 6);

        grid.melt(3);

        // The buried voxel stays put, the high one lands on the floor plane.
        assert_eq!(grid.get(IVec3::new(1, 2, 1)), Some(5));
        assert_eq!(grid.get(IVec3::new(1, 3, 1)), Some(6));
    }

    #[test]
    fn test_melt_at_grid_top_is_noop() {
        let mut grid = VoxelGrid::new(10);
        grid.set(IVec3::new(0, 9, 0), 1);
        grid.melt(10);
        assert_eq!(grid.get(IVec3::new(0, 9, 0)), Some(1));
    }

    #[test]
    fn test_scatter_random_stays_in_bounds() {
        let mut grid = VoxelGrid::new(10);
        let mut rng = StdRng::seed_from_u64(7);
        grid.scatter_random(&mut rng, RANDOM_FILL_COUNT, 3);

        assert!(grid.solid_count() > 0);
        assert!(grid.solid_count() <= RANDOM_FILL_COUNT);
        for (pos, material) in grid.iter_solid() {
            assert!(grid.in_bounds(pos));
            assert_eq!(material, 3);
        }
    }
}
