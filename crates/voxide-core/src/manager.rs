//! The mesh manager: owns the voxel document and every mutation on it.

use crate::document::{DocumentError, VoxelDocument};
use crate::events::{EventQueue, MeshEvent};
use crate::grid::RANDOM_FILL_COUNT;
use crate::history::{Action, ActionLog};
use crate::mesher::{self, SurfaceMesh};
use crate::obj;
use crate::palette::{Color, MATERIAL_COUNT, Palette};
use crate::raycast::{self, Ray, RaycastHit};
use crate::selection::Selection;
use glam::{IVec3, Vec3};
use log::{debug, info};

/// Format the cursor coordinate readout shown under the canvas.
pub fn cursor_readout(cursor: Option<IVec3>) -> String {
    match cursor {
        Some(pos) => format!("X: {}, Y: {}, Z: {}", pos.x, pos.y, pos.z),
        None => "X: ---, Y: ---, Z: ---".to_string(),
    }
}

/// Owns the document, selection, action log, and the extracted surface.
///
/// All mutations funnel through here so each one records exactly one
/// reversible entry in the action log and emits its notifications in order.
/// The shell reads the cursor and drains events once per frame.
#[derive(Debug)]
pub struct MeshManager {
    doc: VoxelDocument,
    selection: Selection,
    history: ActionLog<VoxelDocument>,
    events: EventQueue,
    /// Placement cell under the pointer, if any.
    cursor: Option<IVec3>,
    /// Solid cell under the pointer, if any.
    hovered: Option<RaycastHit>,
    mesh: SurfaceMesh,
    mesh_dirty: bool,
    palette_revision: u64,
}

impl Default for MeshManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshManager {
    /// Create a manager over a fresh document.
    pub fn new() -> Self {
        Self {
            doc: VoxelDocument::new(),
            selection: Selection::new(),
            history: ActionLog::new(),
            events: EventQueue::new(),
            cursor: None,
            hovered: None,
            mesh: SurfaceMesh::default(),
            mesh_dirty: true,
            palette_revision: 0,
        }
    }

    /// One-time setup after construction.
    pub fn init(&mut self) {
        info!(
            "mesh manager ready, grid size {}",
            self.doc.grid.size()
        );
    }

    /// Per-frame update: refresh the cursor from the pointer ray.
    ///
    /// The cursor is the empty cell in front of the first solid cell the
    /// ray hits, falling back to the ground-plane cell when nothing is hit.
    pub fn update(&mut self, pointer_ray: Option<&Ray>) {
        self.cursor = None;
        self.hovered = None;
        let Some(ray) = pointer_ray else {
            return;
        };
        if let Some(hit) = raycast::cast(&self.doc.grid, ray) {
            self.hovered = Some(hit);
            if self.doc.grid.in_bounds(hit.adjacent) {
                self.cursor = Some(hit.adjacent);
            }
        } else if let Some(cell) = raycast::ground_cell(ray, self.doc.grid.size()) {
            self.cursor = Some(cell);
        }
    }

    /// Number of solid voxels.
    pub fn voxel_count(&self) -> usize {
        self.doc.grid.solid_count()
    }

    /// Grid edge length.
    pub fn size(&self) -> u32 {
        self.doc.grid.size()
    }

    /// World-space center of the grid, the camera's orbit target.
    pub fn center(&self) -> Vec3 {
        Vec3::splat(self.doc.grid.size() as f32 / 2.0)
    }

    /// Current placement cell, if the pointer indicates one.
    pub fn cursor_position(&self) -> Option<IVec3> {
        self.cursor
    }

    /// Solid cell under the pointer, if any.
    pub fn hovered_voxel(&self) -> Option<IVec3> {
        self.hovered.map(|hit| hit.cell)
    }

    /// Mesh name.
    pub fn name(&self) -> &str {
        &self.doc.name
    }

    /// Commit a validated mesh name.
    pub fn set_name(&mut self, name: String) {
        self.doc.name = name;
    }

    /// Stored melt floor height.
    pub fn melt_floor_height(&self) -> u32 {
        self.doc.melt_floor_height
    }

    /// Parse, default, and clamp a floor-height field edit, then store it.
    ///
    /// Unparseable input falls back to 0 and the result is clamped to
    /// `[0, size]`. Returns the committed value for writing back.
    pub fn commit_melt_floor_input(&mut self, text: &str) -> u32 {
        let parsed = text.trim().parse::<i64>().unwrap_or(0);
        let clamped = parsed.clamp(0, self.size() as i64) as u32;
        self.doc.melt_floor_height = clamped;
        clamped
    }

    /// Active material index.
    pub fn selected_material(&self) -> usize {
        self.doc.selected_material
    }

    /// Set the active material index.
    pub fn set_selected_material(&mut self, index: usize) {
        self.doc.selected_material = index.min(MATERIAL_COUNT - 1);
    }

    /// The material palette.
    pub fn palette(&self) -> &Palette {
        &self.doc.palette
    }

    /// Replace one material's colors and glow flag.
    pub fn set_material_colors(&mut self, index: usize, fill: Color, edge: Color, glow: bool) {
        if index >= MATERIAL_COUNT {
            return;
        }
        self.history.record(Action::PaletteEdit, self.doc.clone());
        self.doc.palette.colors[index] = fill;
        self.doc.palette.edge_colors[index] = edge;
        self.doc.palette.glows[index] = glow;
    }

    /// Request regeneration of the palette texture.
    pub fn update_texture(&mut self) {
        self.palette_revision += 1;
    }

    /// Revision counter of the palette texture; bumps on regeneration.
    pub fn palette_revision(&self) -> u64 {
        self.palette_revision
    }

    /// Selected voxel coordinates.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Labels of the pending undoable actions, oldest first.
    pub fn action_labels(&self) -> Vec<&'static str> {
        self.history.labels()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drain pending notifications in emission order.
    pub fn drain_events(&mut self) -> Vec<MeshEvent> {
        self.events.drain().collect()
    }

    /// The extracted surface, if it changed since the last call.
    pub fn take_remeshed(&mut self) -> Option<&SurfaceMesh> {
        if self.mesh_dirty {
            self.mesh = mesher::build_mesh(&self.doc.grid);
            self.mesh_dirty = false;
            Some(&self.mesh)
        } else {
            None
        }
    }

    /// Paint the cursor cell with the active material.
    pub fn paint_at_cursor(&mut self) -> bool {
        let Some(cell) = self.cursor else {
            return false;
        };
        if self.doc.grid.is_solid(cell) {
            return false;
        }
        let before = self.voxel_count();
        self.history.record(Action::Paint, self.doc.clone());
        self.doc.grid.set(cell, self.doc.selected_material as u8);
        self.selection.insert(cell);
        self.mesh_dirty = true;
        self.emit_count_change(before);
        debug!("painted voxel at {cell}");
        true
    }

    /// Erase the solid cell under the pointer.
    pub fn erase_hovered(&mut self) -> bool {
        let Some(cell) = self.hovered.map(|hit| hit.cell) else {
            return false;
        };
        let before = self.voxel_count();
        self.history.record(Action::Erase, self.doc.clone());
        self.doc.grid.clear_cell(cell);
        self.selection.remove(cell);
        self.mesh_dirty = true;
        self.emit_count_change(before);
        debug!("erased voxel at {cell}");
        true
    }

    /// Scatter random voxels of the active material.
    pub fn add_random_voxels(&mut self) {
        let material = self.doc.selected_material as u8;
        self.whole_grid_action(Action::AddRandom, |doc| {
            let mut rng = rand::rng();
            doc.grid.scatter_random(&mut rng, RANDOM_FILL_COUNT, material);
        });
    }

    /// Fill the centered cube with the active material.
    pub fn add_cube(&mut self) {
        let material = self.doc.selected_material as u8;
        self.whole_grid_action(Action::AddCube, |doc| doc.grid.fill_cube(material));
    }

    /// Fill the centered sphere with the active material.
    pub fn add_sphere(&mut self) {
        let material = self.doc.selected_material as u8;
        self.whole_grid_action(Action::AddSphere, |doc| doc.grid.fill_sphere(material));
    }

    /// Mirror the grid across the YZ plane.
    pub fn flip_horizontal(&mut self) {
        self.whole_grid_action(Action::FlipHorizontal, |doc| doc.grid.flip_horizontal());
    }

    /// Mirror the grid across the XZ plane.
    pub fn flip_vertical(&mut self) {
        self.whole_grid_action(Action::FlipVertical, |doc| doc.grid.flip_vertical());
    }

    /// Drop voxels down onto the stored floor height.
    pub fn melt(&mut self) {
        let floor = self.doc.melt_floor_height;
        self.whole_grid_action(Action::Melt, |doc| doc.grid.melt(floor));
    }

    /// Replace the document from imported JSON text.
    ///
    /// Nothing changes on a parse or validation error. On success the
    /// import is recorded as one reversible action and `ImportCompleted`
    /// is emitted after the count notification.
    pub fn import_text(&mut self, text: &str) -> Result<(), DocumentError> {
        let imported = VoxelDocument::from_json(text)?;
        let before = self.voxel_count();
        self.history.record(Action::Import, self.doc.clone());
        self.doc = imported;
        self.selection.clear();
        self.mesh_dirty = true;
        self.palette_revision += 1;
        self.emit_count_change(before);
        self.events.push(MeshEvent::ImportCompleted);
        info!(
            "imported mesh {:?} with {} voxels",
            self.doc.name,
            self.voxel_count()
        );
        Ok(())
    }

    /// Serialize the document for saving.
    pub fn export_json(&self) -> Result<String, DocumentError> {
        self.doc.to_json()
    }

    /// Export the surface as OBJ text plus its companion MTL.
    pub fn export_obj(&self, triangulate: bool) -> (String, String) {
        (
            obj::write_obj(&self.doc.grid, &self.doc.name, triangulate),
            obj::write_mtl(&self.doc.palette),
        )
    }

    /// Undo the most recent action. Returns the undone action kind.
    pub fn undo(&mut self) -> Option<Action> {
        let before = self.voxel_count();
        let (action, snapshot) = self.history.undo(self.doc.clone())?;
        self.restore(snapshot, before);
        debug!("undid {}", action.label());
        Some(action)
    }

    /// Redo the most recently undone action.
    pub fn redo(&mut self) -> Option<Action> {
        let before = self.voxel_count();
        let (action, snapshot) = self.history.redo(self.doc.clone())?;
        self.restore(snapshot, before);
        debug!("redid {}", action.label());
        Some(action)
    }

    fn restore(&mut self, snapshot: VoxelDocument, before: usize) {
        self.doc = snapshot;
        self.selection.clear();
        self.mesh_dirty = true;
        self.palette_revision += 1;
        self.emit_count_change(before);
    }

    fn whole_grid_action(&mut self, action: Action, mutate: impl FnOnce(&mut VoxelDocument)) {
        let before = self.voxel_count();
        self.history.record(action, self.doc.clone());
        mutate(&mut self.doc);
        self.selection.clear();
        self.mesh_dirty = true;
        self.emit_count_change(before);
        debug!("{}: {} voxels", action.label(), self.voxel_count());
    }

    fn emit_count_change(&mut self, before: usize) {
        let after = self.voxel_count();
        if after != before {
            self.events.push(MeshEvent::VoxelCountChanged(after));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A ray poking straight down at the column above cell (2, _, 2).
    fn downward_ray() -> Ray {
        Ray::new(Vec3::new(2.5, 20.0, 2.5), Vec3::NEG_Y)
    }

    #[test]
    fn test_cursor_readout_formats() {
        assert_eq!(
            cursor_readout(Some(IVec3::new(1, 2, 3))),
            "X: 1, Y: 2, Z: 3"
        );
        assert_eq!(cursor_readout(None), "X: ---, Y: ---, Z: ---");
    }

    #[test]
    fn test_melt_floor_commit_clamps() {
        let mut manager = MeshManager::new();
        assert_eq!(manager.commit_melt_floor_input("-5"), 0);
        assert_eq!(manager.commit_melt_floor_input("999"), 10);
        assert_eq!(manager.commit_melt_floor_input("abc"), 0);
        assert_eq!(manager.commit_melt_floor_input("7"), 7);
        assert_eq!(manager.melt_floor_height(), 7);
    }

    #[test]
    fn test_add_cube_emits_one_count_event() {
        let mut manager = MeshManager::new();
        manager.add_cube();

        assert_eq!(manager.voxel_count(), 125);
        assert_eq!(
            manager.drain_events(),
            vec![MeshEvent::VoxelCountChanged(125)]
        );
        assert!(manager.drain_events().is_empty());
    }

    #[test]
    fn test_ground_cursor_paint() {
        let mut manager = MeshManager::new();
        manager.update(Some(&downward_ray()));

        assert_eq!(manager.cursor_position(), Some(IVec3::new(2, 0, 2)));
        assert!(manager.paint_at_cursor());
        assert_eq!(manager.voxel_count(), 1);
        assert!(manager.selection().contains(IVec3::new(2, 0, 2)));
    }

    #[test]
    fn test_cursor_stacks_on_hit_voxel() {
        let mut manager = MeshManager::new();
        manager.update(Some(&downward_ray()));
        manager.paint_at_cursor();

        manager.update(Some(&downward_ray()));
        assert_eq!(manager.hovered_voxel(), Some(IVec3::new(2, 0, 2)));
        assert_eq!(manager.cursor_position(), Some(IVec3::new(2, 1, 2)));
    }

    #[test]
    fn test_erase_hovered_removes_voxel() {
        let mut manager = MeshManager::new();
        manager.update(Some(&downward_ray()));
        manager.paint_at_cursor();
        manager.drain_events();

        manager.update(Some(&downward_ray()));
        assert!(manager.erase_hovered());
        assert_eq!(manager.voxel_count(), 0);
        assert!(manager.selection().is_empty());
        assert_eq!(manager.drain_events(), vec![MeshEvent::VoxelCountChanged(0)]);
    }

    #[test]
    fn test_no_cursor_without_ray() {
        let mut manager = MeshManager::new();
        manager.update(None);
        assert_eq!(manager.cursor_position(), None);
        assert!(!manager.paint_at_cursor());
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut manager = MeshManager::new();
        manager.add_cube();
        manager.drain_events();

        assert_eq!(manager.undo(), Some(Action::AddCube));
        assert_eq!(manager.voxel_count(), 0);
        assert!(manager.can_redo());
        assert_eq!(manager.drain_events(), vec![MeshEvent::VoxelCountChanged(0)]);

        assert_eq!(manager.redo(), Some(Action::AddCube));
        assert_eq!(manager.voxel_count(), 125);
    }

    #[test]
    fn test_flip_clears_selection() {
        let mut manager = MeshManager::new();
        manager.update(Some(&downward_ray()));
        manager.paint_at_cursor();
        assert_eq!(manager.selection().len(), 1);

        manager.flip_horizontal();
        assert!(manager.selection().is_empty());
    }

    #[test]
    fn test_melt_uses_stored_floor_height() {
        let mut manager = MeshManager::new();
        manager.update(Some(&Ray::new(Vec3::new(4.5, 20.0, 4.5), Vec3::NEG_Y)));
        manager.paint_at_cursor();

        // Push the painted voxel up by flipping vertically, then melt to 2.
        manager.flip_vertical();
        manager.commit_melt_floor_input("2");
        manager.melt();

        assert!(manager.voxel_count() == 1);
        let (pos, _) = {
            let mut doc_voxels = manager.doc.grid.iter_solid();
            doc_voxels.next().expect("one voxel")
        };
        assert_eq!(pos, IVec3::new(4, 2, 4));
    }

    #[test]
    fn test_import_events_follow_mutation() {
        let mut manager = MeshManager::new();
        let mut source = MeshManager::new();
        source.add_sphere();
        source.set_name("imported_mesh".to_string());
        let json = source.export_json().expect("export");

        manager.import_text(&json).expect("import");

        let events = manager.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], MeshEvent::VoxelCountChanged(manager.voxel_count()));
        assert_eq!(events[1], MeshEvent::ImportCompleted);
        assert_eq!(manager.name(), "imported_mesh");
        assert!(manager.voxel_count() > 0);
    }

    #[test]
    fn test_failed_import_leaves_state_untouched() {
        let mut manager = MeshManager::new();
        manager.add_cube();
        manager.drain_events();
        let name_before = manager.name().to_string();

        assert!(manager.import_text("{ not json").is_err());

        assert_eq!(manager.voxel_count(), 125);
        assert_eq!(manager.name(), name_before);
        assert!(manager.drain_events().is_empty());
    }

    #[test]
    fn test_import_is_undoable() {
        let mut manager = MeshManager::new();
        manager.add_cube();
        let mut source = MeshManager::new();
        source.add_sphere();
        let json = source.export_json().expect("export");

        manager.import_text(&json).expect("import");
        assert_eq!(manager.undo(), Some(Action::Import));
        assert_eq!(manager.voxel_count(), 125);
    }

    #[test]
    fn test_undo_of_import_reverts_name_without_event() {
        let mut manager = MeshManager::new();
        let mut source = MeshManager::new();
        source.add_sphere();
        source.set_name("imported_mesh".to_string());
        let json = source.export_json().expect("export");

        manager.import_text(&json).expect("import");
        manager.drain_events();
        manager.undo();

        // The name reverts silently: ImportCompleted announces an import,
        // not an undo, so callers must re-read the document fields.
        assert_eq!(manager.name(), "voxelmesh");
        assert!(!manager.drain_events().contains(&MeshEvent::ImportCompleted));
    }

    #[test]
    fn test_take_remeshed_only_after_changes() {
        let mut manager = MeshManager::new();
        assert!(manager.take_remeshed().is_some());
        assert!(manager.take_remeshed().is_none());

        manager.add_cube();
        let mesh = manager.take_remeshed().expect("remeshed after edit");
        assert!(!mesh.is_empty());
        assert!(manager.take_remeshed().is_none());
    }

    #[test]
    fn test_update_texture_bumps_revision() {
        let mut manager = MeshManager::new();
        let before = manager.palette_revision();
        manager.update_texture();
        assert_eq!(manager.palette_revision(), before + 1);
    }

    #[test]
    fn test_random_voxels_record_history() {
        let mut manager = MeshManager::new();
        manager.add_random_voxels();
        assert!(manager.voxel_count() > 0);
        assert!(manager.can_undo());
        assert_eq!(manager.action_labels(), vec!["add random voxels"]);
    }
}
