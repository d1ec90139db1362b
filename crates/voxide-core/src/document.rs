//! Voxel document: the serializable editing state and its JSON codec.

use crate::grid::VoxelGrid;
use crate::palette::{Color, MATERIAL_COUNT, Palette};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default grid edge length for a fresh document.
pub const DEFAULT_GRID_SIZE: u32 = 10;
/// Default mesh name for a fresh document.
pub const DEFAULT_NAME: &str = "voxelmesh";
/// Version tag written into exported documents.
pub const FORMAT_VERSION: u32 = 1;

/// Errors produced by the document codec.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("grid size {0} is out of range")]
    InvalidSize(u32),
    #[error("palette must hold {MATERIAL_COUNT} entries per array")]
    InvalidPalette,
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    #[error("voxel [{0}, {1}, {2}] is outside the grid")]
    VoxelOutOfBounds(i32, i32, i32),
    #[error("material index {0} is out of range")]
    MaterialOutOfRange(i32),
}

/// Why a mesh name was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("name must be at least 1 character long")]
    Empty,
    #[error("only a-z, A-Z, 0-9 and _ are allowed as characters")]
    InvalidCharacters,
}

/// Validate a mesh name: non-empty, ASCII letters, digits and underscore.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(NameError::InvalidCharacters);
    }
    Ok(())
}

/// Largest grid edge length the codec accepts.
const MAX_GRID_SIZE: u32 = 64;

/// On-disk shape of a document.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentData {
    version: u32,
    name: String,
    size: u32,
    colors: Vec<String>,
    edge_colors: Vec<String>,
    glows: Vec<bool>,
    melt_floor_height: u32,
    selected_material: usize,
    /// Sparse voxel list as `[x, y, z, material]` entries.
    voxels: Vec<[i32; 4]>,
}

/// The complete editable state of one voxel mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelDocument {
    /// Mesh name, always valid under [`validate_name`].
    pub name: String,
    /// The voxel grid itself.
    pub grid: VoxelGrid,
    /// Material palette.
    pub palette: Palette,
    /// Stored floor height for the melt operation, in `0..=size`.
    pub melt_floor_height: u32,
    /// Active material index, in `0..MATERIAL_COUNT`.
    pub selected_material: usize,
}

impl Default for VoxelDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelDocument {
    /// Create an empty document with default name, palette and grid size.
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            grid: VoxelGrid::new(DEFAULT_GRID_SIZE),
            palette: Palette::default(),
            melt_floor_height: 0,
            selected_material: 0,
        }
    }

    /// Serialize the document to pretty JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        let data = DocumentData {
            version: FORMAT_VERSION,
            name: self.name.clone(),
            size: self.grid.size(),
            colors: self.palette.colors.iter().map(|c| c.to_hex()).collect(),
            edge_colors: self.palette.edge_colors.iter().map(|c| c.to_hex()).collect(),
            glows: self.palette.glows.to_vec(),
            melt_floor_height: self.melt_floor_height,
            selected_material: self.selected_material,
            voxels: self
                .grid
                .iter_solid()
                .map(|(pos, material)| [pos.x, pos.y, pos.z, material as i32])
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Deserialize a document from JSON, validating every field.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let data: DocumentData = serde_json::from_str(json)?;
        if data.version != FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion(data.version));
        }
        if data.size == 0 || data.size > MAX_GRID_SIZE {
            return Err(DocumentError::InvalidSize(data.size));
        }
        if data.colors.len() != MATERIAL_COUNT
            || data.edge_colors.len() != MATERIAL_COUNT
            || data.glows.len() != MATERIAL_COUNT
        {
            return Err(DocumentError::InvalidPalette);
        }

        let mut palette = Palette::default();
        for (slot, hex) in palette.colors.iter_mut().zip(&data.colors) {
            *slot = Color::from_hex(hex).ok_or_else(|| DocumentError::InvalidColor(hex.clone()))?;
        }
        for (slot, hex) in palette.edge_colors.iter_mut().zip(&data.edge_colors) {
            *slot = Color::from_hex(hex).ok_or_else(|| DocumentError::InvalidColor(hex.clone()))?;
        }
        palette.glows.copy_from_slice(&data.glows);

        let mut grid = VoxelGrid::new(data.size);
        for [x, y, z, material] in data.voxels {
            let pos = IVec3::new(x, y, z);
            if !grid.in_bounds(pos) {
                return Err(DocumentError::VoxelOutOfBounds(x, y, z));
            }
            if material < 0 || material as usize >= MATERIAL_COUNT {
                return Err(DocumentError::MaterialOutOfRange(material));
            }
            grid.set(pos, material as u8);
        }

        Ok(Self {
            name: data.name,
            grid,
            palette,
            melt_floor_height: data.melt_floor_height.min(data.size),
            selected_material: data.selected_material.min(MATERIAL_COUNT - 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("abc_123"), Ok(()));
        assert_eq!(validate_name("a"), Ok(()));
        assert_eq!(validate_name(""), Err(NameError::Empty));
        assert_eq!(validate_name("abc def"), Err(NameError::InvalidCharacters));
        assert_eq!(validate_name("abc-def"), Err(NameError::InvalidCharacters));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut doc = VoxelDocument::new();
        doc.name = "test_mesh".to_string();
        doc.grid.set(IVec3::new(1, 2, 3), 4);
        doc.grid.set(IVec3::new(0, 0, 0), 7);
        doc.melt_floor_height = 2;
        doc.selected_material = 3;

        let json = doc.to_json().expect("serialize");
        let restored = VoxelDocument::from_json(&json).expect("deserialize");

        assert_eq!(restored, doc);
    }

    #[test]
    fn test_from_json_rejects_bad_json() {
        assert!(matches!(
            VoxelDocument::from_json("not json"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_unknown_version() {
        let mut doc_json = VoxelDocument::new().to_json().expect("serialize");
        doc_json = doc_json.replace("\"version\": 1", "\"version\": 99");
        assert!(matches!(
            VoxelDocument::from_json(&doc_json),
            Err(DocumentError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_from_json_rejects_out_of_bounds_voxel() {
        let json = r##"{
            "version": 1,
            "name": "m",
            "size": 4,
            "colors": ["#000000", "#000000", "#000000", "#000000",
                       "#000000", "#000000", "#000000", "#000000"],
            "edge_colors": ["#000000", "#000000", "#000000", "#000000",
                            "#000000", "#000000", "#000000", "#000000"],
            "glows": [false, false, false, false, false, false, false, false],
            "melt_floor_height": 0,
            "selected_material": 0,
            "voxels": [[4, 0, 0, 0]]
        }"##;
        assert!(matches!(
            VoxelDocument::from_json(json),
            Err(DocumentError::VoxelOutOfBounds(4, 0, 0))
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_material() {
        let json = r##"{
            "version": 1,
            "name": "m",
            "size": 4,
            "colors": ["#000000", "#000000", "#000000", "#000000",
                       "#000000", "#000000", "#000000", "#000000"],
            "edge_colors": ["#000000", "#000000", "#000000", "#000000",
                            "#000000", "#000000", "#000000", "#000000"],
            "glows": [false, false, false, false, false, false, false, false],
            "melt_floor_height": 0,
            "selected_material": 0,
            "voxels": [[0, 0, 0, 8]]
        }"##;
        assert!(matches!(
            VoxelDocument::from_json(json),
            Err(DocumentError::MaterialOutOfRange(8))
        ));
    }

    #[test]
    fn test_from_json_rejects_short_palette() {
        let json = r##"{
            "version": 1,
            "name": "m",
            "size": 4,
            "colors": ["#000000"],
            "edge_colors": ["#000000"],
            "glows": [false],
            "melt_floor_height": 0,
            "selected_material": 0,
            "voxels": []
        }"##;
        assert!(matches!(
            VoxelDocument::from_json(json),
            Err(DocumentError::InvalidPalette)
        ));
    }
}
