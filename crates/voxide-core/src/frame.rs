//! Frame scheduling with an explicit stop hook.

/// Gates the per-frame update/draw cycle.
///
/// The redraw loop asks [`FrameScheduler::begin_frame`] before doing any
/// work; production schedulers run until [`FrameScheduler::stop`] is called
/// at teardown, while tests inject a frame budget to bound the loop.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    running: bool,
    budget: Option<u64>,
    frames_completed: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    /// Create an unbounded scheduler.
    pub fn new() -> Self {
        Self {
            running: true,
            budget: None,
            frames_completed: 0,
        }
    }

    /// Create a scheduler that stops after `frames` frames.
    pub fn with_budget(frames: u64) -> Self {
        Self {
            running: true,
            budget: Some(frames),
            frames_completed: 0,
        }
    }

    /// Begin the next frame. Returns false once stopped or out of budget,
    /// in which case the caller must not update or render.
    pub fn begin_frame(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if let Some(budget) = self.budget
            && self.frames_completed >= budget
        {
            self.running = false;
            return false;
        }
        self.frames_completed += 1;
        true
    }

    /// Stop the loop; subsequent frames are refused.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the loop may still run frames.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of frames begun so far.
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_bounds_the_loop() {
        let mut scheduler = FrameScheduler::with_budget(5);
        let mut frames = 0;
        while scheduler.begin_frame() {
            frames += 1;
            assert!(frames <= 5, "ran past the budget");
        }
        assert_eq!(frames, 5);
        assert_eq!(scheduler.frames_completed(), 5);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_stop_ends_unbounded_loop() {
        let mut scheduler = FrameScheduler::new();
        assert!(scheduler.begin_frame());
        assert!(scheduler.begin_frame());

        scheduler.stop();
        assert!(!scheduler.begin_frame());
        assert_eq!(scheduler.frames_completed(), 2);
    }

    #[test]
    fn test_update_precedes_render_every_frame() {
        // Drive a recorded update/draw cycle the way the shell does and
        // check the strict per-frame ordering.
        let mut scheduler = FrameScheduler::with_budget(4);
        let mut calls = Vec::new();
        while scheduler.begin_frame() {
            calls.push("update");
            calls.push("render");
        }
        assert_eq!(
            calls,
            vec![
                "update", "render", "update", "render", "update", "render", "update", "render"
            ]
        );
    }
}
