//! Surface extraction: visible voxel faces and render-ready geometry.

use crate::grid::VoxelGrid;
use crate::palette::MATERIAL_COUNT;
use glam::{IVec3, Vec3};

/// The six axis-aligned face directions of a voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceDir {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

/// All face directions, in the order their normals are indexed.
pub const FACE_DIRS: [FaceDir; 6] = [
    FaceDir::PosX,
    FaceDir::NegX,
    FaceDir::PosY,
    FaceDir::NegY,
    FaceDir::PosZ,
    FaceDir::NegZ,
];

impl FaceDir {
    /// Outward unit normal of the face.
    pub fn normal(self) -> IVec3 {
        match self {
            FaceDir::PosX => IVec3::X,
            FaceDir::NegX => IVec3::NEG_X,
            FaceDir::PosY => IVec3::Y,
            FaceDir::NegY => IVec3::NEG_Y,
            FaceDir::PosZ => IVec3::Z,
            FaceDir::NegZ => IVec3::NEG_Z,
        }
    }

    /// The four corners of this face of the unit cube at `cell`, wound
    /// counter-clockwise when viewed from outside.
    pub fn corners(self, cell: IVec3) -> [Vec3; 4] {
        let offsets: [[f32; 3]; 4] = match self {
            FaceDir::PosX => [[1., 0., 0.], [1., 1., 0.], [1., 1., 1.], [1., 0., 1.]],
            FaceDir::NegX => [[0., 0., 0.], [0., 0., 1.], [0., 1., 1.], [0., 1., 0.]],
            FaceDir::PosY => [[0., 1., 0.], [0., 1., 1.], [1., 1., 1.], [1., 1., 0.]],
            FaceDir::NegY => [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 1.]],
            FaceDir::PosZ => [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]],
            FaceDir::NegZ => [[0., 0., 0.], [0., 1., 0.], [1., 1., 0.], [1., 0., 0.]],
        };
        let base = cell.as_vec3();
        offsets.map(|o| base + Vec3::from(o))
    }
}

/// One voxel face with no solid neighbor in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleFace {
    pub cell: IVec3,
    pub dir: FaceDir,
    pub material: u8,
}

/// Every face of every solid cell whose neighbor is empty or out of bounds.
pub fn visible_faces(grid: &VoxelGrid) -> Vec<VisibleFace> {
    let mut faces = Vec::new();
    for (cell, material) in grid.iter_solid() {
        for dir in FACE_DIRS {
            if !grid.is_solid(cell + dir.normal()) {
                faces.push(VisibleFace {
                    cell,
                    dir,
                    material,
                });
            }
        }
    }
    faces
}

/// A mesh vertex: position, outward normal, and palette-atlas UV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangle mesh of the grid surface, ready for vertex/index buffer upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// UV corners of a quad within one atlas cell, matching the corner order of
/// [`FaceDir::corners`].
const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Extract the triangle mesh for the grid's visible surface.
///
/// Each face becomes four vertices and two triangles. UVs address the
/// face material's cell in the palette atlas (cells laid out horizontally).
pub fn build_mesh(grid: &VoxelGrid) -> SurfaceMesh {
    let faces = visible_faces(grid);
    let mut mesh = SurfaceMesh {
        vertices: Vec::with_capacity(faces.len() * 4),
        indices: Vec::with_capacity(faces.len() * 6),
    };

    for face in faces {
        let base = mesh.vertices.len() as u32;
        let normal = face.dir.normal().as_vec3().to_array();
        let cell_u = face.material as f32 / MATERIAL_COUNT as f32;
        let cell_width = 1.0 / MATERIAL_COUNT as f32;

        for (corner, uv) in face.dir.corners(face.cell).into_iter().zip(QUAD_UVS) {
            mesh.vertices.push(MeshVertex {
                position: corner.to_array(),
                normal,
                uv: [cell_u + uv[0] * cell_width, uv[1]],
            });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_voxel_has_six_faces() {
        let mut grid = VoxelGrid::new(10);
        grid.set(IVec3::new(4, 4, 4), 0);

        let faces = visible_faces(&grid);
        assert_eq!(faces.len(), 6);

        let mesh = build_mesh(&grid);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_adjacent_voxels_cull_shared_faces() {
        let mut grid = VoxelGrid::new(10);
        grid.set(IVec3::new(4, 4, 4), 0);
        grid.set(IVec3::new(5, 4, 4), 0);

        // Two cubes share one interior wall: 12 faces minus 2 hidden.
        assert_eq!(visible_faces(&grid).len(), 10);
    }

    #[test]
    fn test_solid_block_exposes_only_shell() {
        let mut grid = VoxelGrid::new(2);
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    grid.set(IVec3::new(x, y, z), 0);
                }
            }
        }
        // 6 sides of 2x2 faces each.
        assert_eq!(visible_faces(&grid).len(), 24);
    }

    #[test]
    fn test_winding_matches_normal() {
        let mut grid = VoxelGrid::new(4);
        grid.set(IVec3::new(1, 1, 1), 0);
        let mesh = build_mesh(&grid);

        for tri in mesh.indices.chunks(3) {
            let a = Vec3::from(mesh.vertices[tri[0] as usize].position);
            let b = Vec3::from(mesh.vertices[tri[1] as usize].position);
            let c = Vec3::from(mesh.vertices[tri[2] as usize].position);
            let face_normal = (b - a).cross(c - a);
            let stored = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!(
                face_normal.dot(stored) > 0.0,
                "triangle winds against its normal"
            );
        }
    }

    #[test]
    fn test_uvs_stay_in_material_cell() {
        let mut grid = VoxelGrid::new(4);
        grid.set(IVec3::new(0, 0, 0), 3);
        let mesh = build_mesh(&grid);

        for vertex in &mesh.vertices {
            assert!(vertex.uv[0] >= 3.0 / 8.0 && vertex.uv[0] <= 4.0 / 8.0);
            assert!(vertex.uv[1] >= 0.0 && vertex.uv[1] <= 1.0);
        }
    }

    #[test]
    fn test_empty_grid_builds_empty_mesh() {
        let grid = VoxelGrid::new(10);
        assert!(build_mesh(&grid).is_empty());
    }
}
