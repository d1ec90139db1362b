//! Grid raycasting for cursor placement.

use crate::grid::VoxelGrid;
use glam::{IVec3, Vec3};

const EPSILON: f32 = 1e-5;

/// A ray in world space. Grid cells span unit cubes, cell `(x, y, z)`
/// covering `[x, x+1) x [y, y+1) x [z, z+1)`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    /// Normalized direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A solid cell hit by a ray, with the outward normal of the entered face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaycastHit {
    /// The solid cell the ray entered.
    pub cell: IVec3,
    /// Outward unit normal of the face the ray came through.
    pub normal: IVec3,
    /// The empty neighbor in front of the entered face.
    pub adjacent: IVec3,
}

/// Walk a ray through the grid front to back and return the first solid cell.
///
/// Uses Amanatides-Woo voxel traversal after clipping the ray to the grid
/// bounds. Returns `None` when the ray misses every solid cell or starts
/// inside one (no face was entered, so there is nowhere to place a voxel).
pub fn cast(grid: &VoxelGrid, ray: &Ray) -> Option<RaycastHit> {
    if ray.direction == Vec3::ZERO {
        return None;
    }
    let size = grid.size() as f32;
    let (t_entry, entry_normal) = clip_to_bounds(ray, size)?;

    let start = ray.at(t_entry.max(0.0) + EPSILON);
    let mut cell = start.floor().as_ivec3();
    if !grid.in_bounds(cell) {
        return None;
    }

    let mut normal = if t_entry > 0.0 { entry_normal } else { None };

    let step = IVec3::new(
        if ray.direction.x >= 0.0 { 1 } else { -1 },
        if ray.direction.y >= 0.0 { 1 } else { -1 },
        if ray.direction.z >= 0.0 { 1 } else { -1 },
    );
    let mut t_max = Vec3::new(
        axis_boundary_t(ray.origin.x, ray.direction.x, cell.x, step.x),
        axis_boundary_t(ray.origin.y, ray.direction.y, cell.y, step.y),
        axis_boundary_t(ray.origin.z, ray.direction.z, cell.z, step.z),
    );
    let t_delta = Vec3::new(
        safe_inverse(ray.direction.x),
        safe_inverse(ray.direction.y),
        safe_inverse(ray.direction.z),
    );

    while grid.in_bounds(cell) {
        if grid.is_solid(cell) {
            let normal = normal?;
            return Some(RaycastHit {
                cell,
                normal,
                adjacent: cell + normal,
            });
        }
        if t_max.x <= t_max.y && t_max.x <= t_max.z {
            cell.x += step.x;
            t_max.x += t_delta.x;
            normal = Some(IVec3::new(-step.x, 0, 0));
        } else if t_max.y <= t_max.z {
            cell.y += step.y;
            t_max.y += t_delta.y;
            normal = Some(IVec3::new(0, -step.y, 0));
        } else {
            cell.z += step.z;
            t_max.z += t_delta.z;
            normal = Some(IVec3::new(0, 0, -step.z));
        }
    }
    None
}

/// Cell where the ray crosses the ground plane (y = 0) inside the grid
/// footprint, used for placement when no voxel is hit.
pub fn ground_cell(ray: &Ray, size: u32) -> Option<IVec3> {
    if ray.direction.y.abs() < EPSILON {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t <= 0.0 {
        return None;
    }
    let point = ray.at(t);
    let cell = IVec3::new(point.x.floor() as i32, 0, point.z.floor() as i32);
    let s = size as i32;
    (cell.x >= 0 && cell.x < s && cell.z >= 0 && cell.z < s).then_some(cell)
}

/// Clip the ray against the grid's bounding box, returning the entry
/// parameter and the outward normal of the entered face (`None` normal when
/// the origin is already inside the box).
fn clip_to_bounds(ray: &Ray, size: f32) -> Option<(f32, Option<IVec3>)> {
    let mut t_entry = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut entry_axis = None;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        if dir.abs() < EPSILON {
            if origin < 0.0 || origin > size {
                return None;
            }
            continue;
        }
        let mut t0 = (0.0 - origin) / dir;
        let mut t1 = (size - origin) / dir;
        let mut near_side = -1i32;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            near_side = 1;
        }
        if t0 > t_entry {
            t_entry = t0;
            let mut normal = IVec3::ZERO;
            normal[axis] = near_side;
            entry_axis = Some(normal);
        }
        t_exit = t_exit.min(t1);
    }

    if t_entry > t_exit || t_exit < 0.0 {
        return None;
    }
    let normal = (t_entry > 0.0).then_some(entry_axis).flatten();
    Some((t_entry, normal))
}

fn axis_boundary_t(origin: f32, dir: f32, cell: i32, step: i32) -> f32 {
    if dir.abs() < EPSILON {
        return f32::INFINITY;
    }
    let boundary = if step > 0 { cell + 1 } else { cell } as f32;
    (boundary - origin) / dir
}

fn safe_inverse(dir: f32) -> f32 {
    if dir.abs() < EPSILON {
        f32::INFINITY
    } else {
        1.0 / dir.abs()
    }
}
