//! Voxide Core Library
//!
//! Platform-agnostic voxel grid, document, and editor logic for the Voxide
//! mesh editor.

pub mod camera;
pub mod document;
pub mod events;
pub mod frame;
pub mod grid;
pub mod history;
pub mod input;
pub mod layout;
pub mod manager;
pub mod mesher;
pub mod obj;
pub mod palette;
pub mod raycast;
pub mod selection;

pub use camera::{Camera, OrbitController};
pub use document::{
    DEFAULT_GRID_SIZE, DEFAULT_NAME, DocumentError, NameError, VoxelDocument, validate_name,
};
pub use events::{EventQueue, MeshEvent};
pub use frame::FrameScheduler;
pub use grid::VoxelGrid;
pub use history::{Action, ActionLog};
pub use input::{InputState, MouseButton, PointerEvent};
pub use layout::{CanvasInfo, Layout, MENU_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
pub use manager::{MeshManager, cursor_readout};
pub use mesher::{MeshVertex, SurfaceMesh, build_mesh};
pub use palette::{Color, MATERIAL_COUNT, Palette};
pub use raycast::{Ray, RaycastHit, cast, ground_cell};
pub use selection::Selection;
