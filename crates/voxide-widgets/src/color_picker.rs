//! Material color picker: a swatch grid with inline fill/edge/glow editing.

use egui::{
    Color32, CornerRadius, CursorIcon, Rect, Sense, Stroke, StrokeKind, Ui, vec2,
};

use crate::{sizing, theme};

/// Number of material swatches in the grid.
pub const SWATCH_COUNT: usize = 8;

/// What the user did to the picker this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    /// A different material swatch was selected.
    Selected(usize),
    /// A material's colors or glow flag were edited in place.
    Edited {
        index: usize,
        fill: Color32,
        edge: Color32,
        glow: bool,
    },
}

/// Swatch grid state: one fill color, edge color, and glow flag per material.
///
/// The picker owns display copies of the palette; the caller applies
/// [`PickerEvent`]s to the authoritative palette and refreshes the picker
/// when the palette changes underneath it (e.g. after an import or undo).
#[derive(Debug, Clone)]
pub struct ColorPicker {
    pub fills: [Color32; SWATCH_COUNT],
    pub edges: [Color32; SWATCH_COUNT],
    pub glows: [bool; SWATCH_COUNT],
    pub selected: usize,
    editing: Option<usize>,
}

impl ColorPicker {
    /// Create a picker showing the given material colors.
    pub fn new(
        fills: [Color32; SWATCH_COUNT],
        edges: [Color32; SWATCH_COUNT],
        glows: [bool; SWATCH_COUNT],
    ) -> Self {
        Self {
            fills,
            edges,
            glows,
            selected: 0,
            editing: None,
        }
    }

    /// Replace the displayed colors, keeping the selection.
    pub fn set_palette(
        &mut self,
        fills: [Color32; SWATCH_COUNT],
        edges: [Color32; SWATCH_COUNT],
        glows: [bool; SWATCH_COUNT],
    ) {
        self.fills = fills;
        self.edges = edges;
        self.glows = glows;
    }

    /// Show the swatch grid and, when open, the edit controls for the
    /// selected material. Clicking a swatch selects it; clicking the
    /// selected swatch again toggles the editor.
    pub fn show(&mut self, ui: &mut Ui) -> Option<PickerEvent> {
        let mut event = None;

        ui.horizontal_wrapped(|ui| {
            for index in 0..SWATCH_COUNT {
                let response = swatch(
                    ui,
                    self.fills[index],
                    self.edges[index],
                    self.glows[index],
                    index == self.selected,
                );
                if response.clicked() {
                    if index == self.selected {
                        self.editing = match self.editing {
                            Some(_) => None,
                            None => Some(index),
                        };
                    } else {
                        self.selected = index;
                        self.editing = None;
                        event = Some(PickerEvent::Selected(index));
                    }
                }
            }
        });

        if let Some(index) = self.editing {
            let mut fill = self.fills[index];
            let mut edge = self.edges[index];
            let mut glow = self.glows[index];
            let mut changed = false;

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Fill");
                changed |= ui.color_edit_button_srgba(&mut fill).changed();
                ui.label("Edge");
                changed |= ui.color_edit_button_srgba(&mut edge).changed();
            });
            changed |= ui.checkbox(&mut glow, "Glow").changed();

            if changed {
                self.fills[index] = fill;
                self.edges[index] = edge;
                self.glows[index] = glow;
                event = Some(PickerEvent::Edited {
                    index,
                    fill,
                    edge,
                    glow,
                });
            }
        }

        event
    }
}

/// Draw one material swatch: fill square, edge-color border, and a small
/// dot marking glow materials. Returns the click response.
fn swatch(ui: &mut Ui, fill: Color32, edge: Color32, glow: bool, selected: bool) -> egui::Response {
    let size = vec2(sizing::MEDIUM, sizing::MEDIUM);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), fill);
        painter.rect_stroke(
            rect.shrink(1.0),
            CornerRadius::same(sizing::CORNER_RADIUS),
            Stroke::new(2.0, edge),
            StrokeKind::Inside,
        );

        if selected {
            painter.rect_stroke(
                Rect::from_center_size(rect.center(), size + vec2(4.0, 4.0)),
                CornerRadius::same(sizing::CORNER_RADIUS),
                Stroke::new(2.0, theme::ACCENT),
                StrokeKind::Outside,
            );
        }

        if glow {
            painter.circle_filled(
                rect.right_top() + vec2(-4.0, 4.0),
                2.5,
                Color32::from_rgb(255, 235, 59),
            );
        }
    }

    response.on_hover_cursor(CursorIcon::PointingHand)
}
