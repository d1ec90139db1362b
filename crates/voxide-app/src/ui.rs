//! Menu panel UI using egui.

use egui::{Color32, Context};
use voxide_core::layout::MENU_WIDTH;
use voxide_core::palette::{Color, MATERIAL_COUNT, Palette};
use voxide_widgets::{
    ColorPicker, PickerEvent, menu_item, menu_item_enabled, menu_separator, section_label,
};

/// What the menu asked the shell to do this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// The name field lost focus; validate and commit its text.
    CommitName(String),
    /// A different material swatch was picked.
    SelectMaterial(usize),
    /// A material's colors or glow flag were edited.
    EditMaterial {
        index: usize,
        fill: Color,
        edge: Color,
        glow: bool,
    },
    AddRandom,
    AddCube,
    AddSphere,
    FlipHorizontal,
    FlipVertical,
    /// The floor-height field lost focus; parse, clamp, and store its text.
    CommitMeltFloor(String),
    Melt,
    Import,
    Save,
    ExportObj,
    Undo,
    Redo,
}

/// Menu panel state that persists across frames.
#[derive(Debug, Clone)]
pub struct UiState {
    pub voxel_count: usize,
    pub cursor_readout: String,
    pub name_input: String,
    pub melt_floor_input: String,
    pub picker: ColorPicker,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl UiState {
    /// Seed the panel from the document's current state.
    pub fn new(palette: &Palette, name: &str, melt_floor_height: u32) -> Self {
        let (fills, edges, glows) = picker_arrays(palette);
        Self {
            voxel_count: 0,
            cursor_readout: String::new(),
            name_input: name.to_string(),
            melt_floor_input: melt_floor_height.to_string(),
            picker: ColorPicker::new(fills, edges, glows),
            can_undo: false,
            can_redo: false,
        }
    }

    /// Refresh the picker after the palette changed underneath the UI
    /// (import, undo, redo).
    pub fn sync_palette(&mut self, palette: &Palette) {
        let (fills, edges, glows) = picker_arrays(palette);
        self.picker.set_palette(fills, edges, glows);
    }

    /// Refresh the text fields after the document changed underneath the UI.
    /// Import replaces the name and floor height, and undo/redo can revert
    /// them without any event firing, so the shell calls this on all three.
    pub fn sync_document(&mut self, name: &str, melt_floor_height: u32) {
        self.name_input = name.to_string();
        self.melt_floor_input = melt_floor_height.to_string();
    }
}

fn picker_arrays(
    palette: &Palette,
) -> (
    [Color32; MATERIAL_COUNT],
    [Color32; MATERIAL_COUNT],
    [bool; MATERIAL_COUNT],
) {
    (
        palette.colors.map(to_color32),
        palette.edge_colors.map(to_color32),
        palette.glows,
    )
}

fn to_color32(color: Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

fn from_color32(color: Color32) -> Color {
    Color::rgb(color.r(), color.g(), color.b())
}

/// Render the fixed-width menu panel on the right edge of the window.
///
/// Returns at most one action per frame; the shell applies it after the
/// frame's UI pass.
pub fn render_menu(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::SidePanel::right("menu_panel")
        .exact_width(MENU_WIDTH)
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("Voxide");
            ui.add_space(4.0);

            section_label(ui, "MESH");
            ui.label(format!("Voxels: {}", ui_state.voxel_count));
            ui.label(&ui_state.cursor_readout);
            ui.horizontal(|ui| {
                ui.label("Name");
                let response = ui.text_edit_singleline(&mut ui_state.name_input);
                if response.lost_focus() {
                    action = Some(UiAction::CommitName(ui_state.name_input.clone()));
                }
            });
            menu_separator(ui);

            section_label(ui, "MATERIALS");
            if let Some(event) = ui_state.picker.show(ui) {
                action = Some(match event {
                    PickerEvent::Selected(index) => UiAction::SelectMaterial(index),
                    PickerEvent::Edited {
                        index,
                        fill,
                        edge,
                        glow,
                    } => UiAction::EditMaterial {
                        index,
                        fill: from_color32(fill),
                        edge: from_color32(edge),
                        glow,
                    },
                });
            }
            menu_separator(ui);

            section_label(ui, "GENERATE");
            ui.horizontal(|ui| {
                if ui.button("Random").clicked() {
                    action = Some(UiAction::AddRandom);
                }
                if ui.button("Cube").clicked() {
                    action = Some(UiAction::AddCube);
                }
                if ui.button("Sphere").clicked() {
                    action = Some(UiAction::AddSphere);
                }
            });
            menu_separator(ui);

            section_label(ui, "TRANSFORM");
            ui.horizontal(|ui| {
                if ui.button("Flip H").clicked() {
                    action = Some(UiAction::FlipHorizontal);
                }
                if ui.button("Flip V").clicked() {
                    action = Some(UiAction::FlipVertical);
                }
            });
            ui.horizontal(|ui| {
                ui.label("Floor");
                let response = egui::TextEdit::singleline(&mut ui_state.melt_floor_input)
                    .desired_width(40.0)
                    .show(ui)
                    .response;
                if response.lost_focus() {
                    action = Some(UiAction::CommitMeltFloor(
                        ui_state.melt_floor_input.clone(),
                    ));
                }
                if ui.button("Melt").clicked() {
                    action = Some(UiAction::Melt);
                }
            });
            menu_separator(ui);

            section_label(ui, "FILE");
            if menu_item(ui, "Import...", "Ctrl+O") {
                action = Some(UiAction::Import);
            }
            if menu_item(ui, "Save JSON", "Ctrl+S") {
                action = Some(UiAction::Save);
            }
            if menu_item(ui, "Export OBJ", "Ctrl+E") {
                action = Some(UiAction::ExportObj);
            }
            menu_separator(ui);

            if menu_item_enabled(ui, "Undo", "Ctrl+Z", ui_state.can_undo) {
                action = Some(UiAction::Undo);
            }
            if menu_item_enabled(ui, "Redo", "Ctrl+Shift+Z", ui_state.can_redo) {
                action = Some(UiAction::Redo);
            }
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_state_seeds_from_document() {
        let palette = Palette::default();
        let state = UiState::new(&palette, "voxelmesh", 3);
        assert_eq!(state.name_input, "voxelmesh");
        assert_eq!(state.melt_floor_input, "3");
        assert_eq!(state.picker.fills[0], to_color32(palette.colors[0]));
    }

    #[test]
    fn test_sync_document_refreshes_fields() {
        let mut state = UiState::new(&Palette::default(), "voxelmesh", 0);
        state.name_input = "renamed".to_string();
        state.melt_floor_input = "7".to_string();

        state.sync_document("voxelmesh", 0);

        assert_eq!(state.name_input, "voxelmesh");
        assert_eq!(state.melt_floor_input, "0");
    }

    #[test]
    fn test_color_conversion_roundtrip() {
        let color = Color::rgb(12, 200, 99);
        assert_eq!(from_color32(to_color32(color)), color);
    }
}
