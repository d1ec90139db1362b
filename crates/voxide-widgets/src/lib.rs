//! Reusable egui widget components for the Voxide editor.
//!
//! - **Color picker**: material swatch grid with inline fill/edge/glow editing
//! - **Menu**: menu items, separators
//! - **Layout**: section labels, spacing helpers

pub mod color_picker;
pub mod layout;
pub mod menu;

pub use color_picker::{ColorPicker, PickerEvent};
pub use layout::section_label;
pub use menu::{menu_item, menu_item_enabled, menu_separator};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Medium widget size (color swatches)
    pub const MEDIUM: f32 = 28.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
}
