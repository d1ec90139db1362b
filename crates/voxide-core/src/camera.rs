//! Perspective orbit camera and its rotation controller.

use crate::raycast::Ray;
use glam::{Mat4, Vec2, Vec3};

/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 90.0;
/// Near clip plane distance.
pub const NEAR_PLANE: f32 = 0.1;
/// Far clip plane distance.
pub const FAR_PLANE: f32 = 1000.0;
/// Initial orbit distance from the target.
pub const DEFAULT_DISTANCE: f32 = 8.0;
/// Closest the camera may zoom toward the target.
pub const MIN_DISTANCE: f32 = 4.0;
/// Farthest the camera may zoom away from the target.
pub const MAX_DISTANCE: f32 = 32.0;

/// Radians of orbit per pixel of pointer drag.
const DRAG_SENSITIVITY: f32 = 0.008;
/// Keep the pitch this far short of the poles.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;

/// Perspective camera orbiting a target point.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Viewport aspect ratio (width over height).
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Orbit angle around the y axis, radians.
    pub yaw: f32,
    /// Elevation angle above the horizon, radians.
    pub pitch: f32,
    /// Distance from the target.
    pub distance: f32,
}

impl Camera {
    /// Create a camera with the editor defaults for the given aspect ratio.
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y: FOV_Y_DEGREES,
            aspect,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            target: Vec3::ZERO,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: 0.5,
            distance: DEFAULT_DISTANCE,
        }
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.distance
    }

    /// World-to-view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// View-to-clip transform (0..1 depth, wgpu convention).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined world-to-clip transform.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a viewport pixel.
    pub fn screen_ray(&self, pixel: Vec2, viewport: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * pixel.x / viewport.x - 1.0,
            1.0 - 2.0 * pixel.y / viewport.y,
        );
        let inverse = self.view_projection().inverse();
        let far_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let origin = self.eye();
        Ray::new(origin, far_point - origin)
    }
}

/// Applies accumulated pointer input to a [`Camera`] once per frame.
///
/// Drag deltas only orbit while `rotating` is set (the canvas handler flips
/// it for the duration of a drag); scroll always zooms, scaled by
/// `zoom_speed` and clamped to the configured distance range.
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Whether drag input currently orbits the camera.
    pub rotating: bool,
    /// Scroll-to-distance scale factor.
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_drag: Vec2,
    pending_scroll: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            rotating: false,
            zoom_speed: 1.0,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            pending_drag: Vec2::ZERO,
            pending_scroll: 0.0,
        }
    }
}

impl OrbitController {
    /// Create a controller with the editor defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a pointer drag delta in pixels. Ignored unless rotating.
    pub fn apply_drag(&mut self, delta: Vec2) {
        if self.rotating {
            self.pending_drag += delta;
        }
    }

    /// Accumulate a scroll delta in lines (positive zooms in).
    pub fn apply_scroll(&mut self, delta: f32) {
        self.pending_scroll += delta;
    }

    /// Advance the camera by the input gathered since the last frame.
    pub fn update(&mut self, camera: &mut Camera) {
        if self.pending_drag != Vec2::ZERO {
            camera.yaw -= self.pending_drag.x * DRAG_SENSITIVITY;
            camera.pitch = (camera.pitch + self.pending_drag.y * DRAG_SENSITIVITY)
                .clamp(-PITCH_LIMIT, PITCH_LIMIT);
            self.pending_drag = Vec2::ZERO;
        }
        if self.pending_scroll != 0.0 {
            camera.distance = (camera.distance - self.pending_scroll * self.zoom_speed)
                .clamp(self.min_distance, self.max_distance);
            self.pending_scroll = 0.0;
        }
    }
}
