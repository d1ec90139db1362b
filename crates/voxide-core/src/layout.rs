//! Window layout arithmetic for the canvas/menu split.

/// Minimum window width the layout is computed against.
pub const MIN_WINDOW_WIDTH: f32 = 1280.0;
/// Minimum window height the layout is computed against.
pub const MIN_WINDOW_HEIGHT: f32 = 720.0;
/// Fixed width of the menu panel on the right edge of the window.
pub const MENU_WIDTH: f32 = 300.0;

/// Computed dimensions for the canvas region and the menu panel.
///
/// The canvas occupies the left side of the window and the menu panel the
/// fixed-width column directly to its right. All values are in logical
/// pixels and never fall below the minimum window size, regardless of how
/// small the reported viewport is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Canvas width: viewport width minus the menu column.
    pub canvas_width: u32,
    /// Canvas height: full viewport height.
    pub canvas_height: u32,
    /// Menu panel width, always [`MENU_WIDTH`].
    pub menu_width: u32,
    /// Menu panel height: full viewport height.
    pub menu_height: u32,
}

impl Layout {
    /// Compute the layout for a viewport of the given logical size.
    ///
    /// Pure function: same inputs always produce the same layout, so resize
    /// handling can call this redundantly (including once at startup).
    pub fn compute(viewport_width: f32, viewport_height: f32) -> Self {
        let canvas_width = (viewport_width - MENU_WIDTH).max(MIN_WINDOW_WIDTH - MENU_WIDTH);
        let canvas_height = viewport_height.max(MIN_WINDOW_HEIGHT);
        Self {
            canvas_width: canvas_width.round() as u32,
            canvas_height: canvas_height.round() as u32,
            menu_width: MENU_WIDTH as u32,
            menu_height: canvas_height.round() as u32,
        }
    }

    /// Canvas aspect ratio (width over height) for the projection matrix.
    pub fn canvas_aspect(&self) -> f32 {
        self.canvas_width as f32 / self.canvas_height.max(1) as f32
    }
}

/// Render-surface facts recorded at startup and on resize.
///
/// Derived from the current [`Layout`] and the device capabilities; owned by
/// the application shell and handed to the renderer by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasInfo {
    /// Canvas width in logical pixels.
    pub width: u32,
    /// Canvas height in logical pixels.
    pub height: u32,
    /// Maximum anisotropic filtering level supported by the device.
    pub max_anisotropy: u16,
}

impl CanvasInfo {
    /// Build the info record from a computed layout.
    pub fn from_layout(layout: &Layout, max_anisotropy: u16) -> Self {
        Self {
            width: layout.canvas_width,
            height: layout.canvas_height,
            max_anisotropy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_viewport_uses_full_size() {
        let layout = Layout::compute(1920.0, 1080.0);
        assert_eq!(layout.canvas_width, 1620);
        assert_eq!(layout.canvas_height, 1080);
        assert_eq!(layout.menu_width, 300);
        assert_eq!(layout.menu_height, 1080);
    }

    #[test]
    fn test_small_viewport_clamps_to_minimum() {
        let layout = Layout::compute(800.0, 500.0);
        assert_eq!(layout.canvas_width, 980); // 1280 - 300
        assert_eq!(layout.canvas_height, 720);
        assert_eq!(layout.menu_height, 720);
    }

    #[test]
    fn test_menu_width_is_constant() {
        for (w, h) in [(100.0, 100.0), (1280.0, 720.0), (3840.0, 2160.0)] {
            assert_eq!(Layout::compute(w, h).menu_width, 300);
        }
    }

    #[test]
    fn test_floors_hold_for_all_viewports() {
        for w in [0.0f32, 640.0, 1279.0, 1280.0, 1281.0, 2560.0] {
            for h in [0.0f32, 480.0, 719.0, 720.0, 721.0, 1440.0] {
                let layout = Layout::compute(w, h);
                assert!(layout.canvas_width >= 980);
                assert!(layout.canvas_height >= 720);
            }
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let first = Layout::compute(1600.0, 900.0);
        let second = Layout::compute(1600.0, 900.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_canvas_info_from_layout() {
        let layout = Layout::compute(1920.0, 1080.0);
        let info = CanvasInfo::from_layout(&layout, 16);
        assert_eq!(info.width, 1620);
        assert_eq!(info.height, 1080);
        assert_eq!(info.max_anisotropy, 16);
    }
}
