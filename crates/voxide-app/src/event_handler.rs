//! Canvas pointer routing: orbit, paint, erase, zoom.

use voxide_core::camera::OrbitController;
use voxide_core::input::{InputState, MouseButton};
use voxide_core::manager::MeshManager;

/// Routes the frame's accumulated canvas input to the camera controller and
/// the mesh manager.
///
/// A left press only starts orbiting once the pointer travels past the click
/// threshold, and a press that orbited never paints on release. Right clicks
/// erase the hovered voxel; scroll always zooms.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Process the input gathered since the previous frame. Call once per
    /// frame, before the orbit controller advances the camera.
    pub fn process(
        &mut self,
        input: &InputState,
        orbit: &mut OrbitController,
        manager: &mut MeshManager,
    ) {
        orbit.rotating = input.is_pressed(MouseButton::Left) && input.drag_exceeded_threshold();
        if orbit.rotating {
            orbit.apply_drag(input.pointer_delta());
        }
        if input.scroll_delta != 0.0 {
            orbit.apply_scroll(input.scroll_delta);
        }

        if input.just_released(MouseButton::Left)
            && !input.drag_exceeded_threshold()
            && manager.paint_at_cursor()
        {
            log::debug!("painted voxel, count now {}", manager.voxel_count());
        }
        if input.just_released(MouseButton::Right) && manager.erase_hovered() {
            log::debug!("erased voxel, count now {}", manager.voxel_count());
        }
    }
}
