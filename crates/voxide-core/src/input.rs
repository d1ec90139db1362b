//! Pointer input state tracked across frames.

use glam::Vec2;
use std::collections::HashSet;

/// Pixels of travel after which a press counts as a drag, not a click.
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse handling.
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    Down { position: Vec2, button: MouseButton },
    Up { position: Vec2, button: MouseButton },
    Move { position: Vec2 },
    Scroll { delta: f32 },
}

/// Tracks the current pointer state across frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in canvas pixels.
    pub pointer_position: Vec2,
    /// Pointer position at the start of the frame, for delta calculations.
    previous_position: Vec2,
    /// Currently pressed mouse buttons.
    pressed: HashSet<MouseButton>,
    /// Buttons that went down this frame.
    just_pressed: HashSet<MouseButton>,
    /// Buttons that went up this frame.
    just_released: HashSet<MouseButton>,
    /// Accumulated scroll lines since last frame.
    pub scroll_delta: f32,
    /// Where the left button went down, while it is held.
    pub drag_origin: Option<Vec2>,
    /// Farthest distance the pointer moved from the drag origin.
    max_drag_travel: f32,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.scroll_delta = 0.0;
        self.previous_position = self.pointer_position;
    }

    /// Process a pointer event.
    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                if self.pressed.insert(button) {
                    self.just_pressed.insert(button);
                }
                if button == MouseButton::Left {
                    self.drag_origin = Some(position);
                    self.max_drag_travel = 0.0;
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                if self.pressed.remove(&button) {
                    self.just_released.insert(button);
                }
                if button == MouseButton::Left {
                    self.drag_origin = None;
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
                if let Some(origin) = self.drag_origin {
                    self.max_drag_travel = self.max_drag_travel.max((position - origin).length());
                }
            }
            PointerEvent::Scroll { delta } => {
                self.scroll_delta += delta;
            }
        }
    }

    /// Whether a button is currently held.
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    /// Whether a button went down this frame.
    pub fn just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed.contains(&button)
    }

    /// Whether a button went up this frame.
    pub fn just_released(&self, button: MouseButton) -> bool {
        self.just_released.contains(&button)
    }

    /// Pointer movement since the previous frame.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_position
    }

    /// Whether the held left button has traveled past the drag threshold.
    ///
    /// Once true it stays true for the duration of the press, so a press
    /// that orbited the camera never also paints on release.
    pub fn drag_exceeded_threshold(&self) -> bool {
        self.max_drag_travel > DRAG_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_release() {
        let mut input = InputState::new();

        input.handle_event(PointerEvent::Down {
            position: Vec2::new(10.0, 10.0),
            button: MouseButton::Left,
        });
        assert!(input.is_pressed(MouseButton::Left));
        assert!(input.just_pressed(MouseButton::Left));

        input.handle_event(PointerEvent::Up {
            position: Vec2::new(10.0, 10.0),
            button: MouseButton::Left,
        });
        assert!(!input.is_pressed(MouseButton::Left));
        assert!(input.just_released(MouseButton::Left));
    }

    #[test]
    fn test_begin_frame_clears_transients() {
        let mut input = InputState::new();
        input.handle_event(PointerEvent::Down {
            position: Vec2::ZERO,
            button: MouseButton::Right,
        });
        input.handle_event(PointerEvent::Scroll { delta: 2.0 });

        input.begin_frame();

        assert!(!input.just_pressed(MouseButton::Right));
        assert!(input.is_pressed(MouseButton::Right));
        assert!(input.scroll_delta.abs() < f32::EPSILON);
    }

    #[test]
    fn test_pointer_delta() {
        let mut input = InputState::new();
        input.handle_event(PointerEvent::Move {
            position: Vec2::new(5.0, 5.0),
        });
        input.begin_frame();
        input.handle_event(PointerEvent::Move {
            position: Vec2::new(8.0, 9.0),
        });

        let delta = input.pointer_delta();
        assert!((delta.x - 3.0).abs() < f32::EPSILON);
        assert!((delta.y - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_click_stays_under_drag_threshold() {
        let mut input = InputState::new();
        input.handle_event(PointerEvent::Down {
            position: Vec2::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        input.handle_event(PointerEvent::Move {
            position: Vec2::new(101.0, 101.0),
        });
        assert!(!input.drag_exceeded_threshold());
    }

    #[test]
    fn test_drag_threshold_latches() {
        let mut input = InputState::new();
        input.handle_event(PointerEvent::Down {
            position: Vec2::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        input.handle_event(PointerEvent::Move {
            position: Vec2::new(140.0, 100.0),
        });
        assert!(input.drag_exceeded_threshold());

        // Returning near the origin must not turn the drag back into a click.
        input.handle_event(PointerEvent::Move {
            position: Vec2::new(100.0, 100.0),
        });
        assert!(input.drag_exceeded_threshold());
    }

    #[test]
    fn test_scroll_accumulates_within_frame() {
        let mut input = InputState::new();
        input.handle_event(PointerEvent::Scroll { delta: 1.0 });
        input.handle_event(PointerEvent::Scroll { delta: 0.5 });
        assert!((input.scroll_delta - 1.5).abs() < f32::EPSILON);
    }
}
