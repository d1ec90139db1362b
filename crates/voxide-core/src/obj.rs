//! Wavefront OBJ/MTL export of the voxel surface.

use crate::grid::VoxelGrid;
use crate::mesher::{FACE_DIRS, FaceDir, visible_faces};
use crate::palette::{MATERIAL_COUNT, Palette};
use glam::IVec3;
use std::collections::HashMap;
use std::fmt::Write;

/// Write the grid surface as OBJ text.
///
/// Vertices are deduplicated on the voxel corner lattice and faces are
/// grouped per material under `usemtl mat<N>` so the companion MTL applies.
/// With `triangulate` set, every quad is split into two triangles; otherwise
/// faces are written as 4-gons. Indices are 1-based, `v//vn` form.
pub fn write_obj(grid: &VoxelGrid, name: &str, triangulate: bool) -> String {
    let faces = visible_faces(grid);

    // Corner positions are integer lattice points, so exact keys dedup them.
    let mut corner_indices: HashMap<(i32, i32, i32), u32> = HashMap::new();
    let mut corners: Vec<(i32, i32, i32)> = Vec::new();
    let mut face_corner_ids: Vec<[u32; 4]> = Vec::with_capacity(faces.len());

    for face in &faces {
        let ids = face.dir.corners(face.cell).map(|corner| {
            let key = (
                corner.x.round() as i32,
                corner.y.round() as i32,
                corner.z.round() as i32,
            );
            *corner_indices.entry(key).or_insert_with(|| {
                corners.push(key);
                corners.len() as u32 - 1
            })
        });
        face_corner_ids.push(ids);
    }

    let mut out = String::new();
    let _ = writeln!(out, "mtllib {}", mtl_file_name(name));
    let _ = writeln!(out, "o {name}");
    for (x, y, z) in &corners {
        let _ = writeln!(out, "v {x} {y} {z}");
    }
    for dir in FACE_DIRS {
        let n = dir.normal();
        let _ = writeln!(out, "vn {} {} {}", n.x, n.y, n.z);
    }

    for material in 0..MATERIAL_COUNT as u8 {
        let in_group: Vec<usize> = faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.material == material)
            .map(|(i, _)| i)
            .collect();
        if in_group.is_empty() {
            continue;
        }
        let _ = writeln!(out, "usemtl mat{material}");
        for face_index in in_group {
            let vn = normal_index(faces[face_index].dir);
            let [a, b, c, d] = face_corner_ids[face_index].map(|i| i + 1);
            if triangulate {
                let _ = writeln!(out, "f {a}//{vn} {b}//{vn} {c}//{vn}");
                let _ = writeln!(out, "f {a}//{vn} {c}//{vn} {d}//{vn}");
            } else {
                let _ = writeln!(out, "f {a}//{vn} {b}//{vn} {c}//{vn} {d}//{vn}");
            }
        }
    }
    out
}

/// Write the companion MTL with one material per palette slot.
///
/// Glow materials carry an emissive `Ke` term equal to their fill color.
pub fn write_mtl(palette: &Palette) -> String {
    let mut out = String::new();
    for material in 0..MATERIAL_COUNT {
        let color = palette.colors[material];
        let (r, g, b) = (
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
        );
        let _ = writeln!(out, "newmtl mat{material}");
        let _ = writeln!(out, "Kd {r:.4} {g:.4} {b:.4}");
        if palette.glows[material] {
            let _ = writeln!(out, "Ke {r:.4} {g:.4} {b:.4}");
        }
        let _ = writeln!(out);
    }
    out
}

fn normal_index(dir: FaceDir) -> usize {
    1 + FACE_DIRS
        .iter()
        .position(|&d| d == dir)
        .unwrap_or_default()
}

/// Suggested file name for the exported OBJ.
pub fn obj_file_name(name: &str) -> String {
    format!("{name}.obj")
}

/// Suggested file name for the companion MTL.
pub fn mtl_file_name(name: &str) -> String {
    format!("{name}.mtl")
}
