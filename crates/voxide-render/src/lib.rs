//! Voxide Render Library
//!
//! wgpu rendering of the voxel surface mesh, palette atlas, and cursor
//! highlight for the Voxide editor.

pub mod atlas;
mod renderer;
mod wgpu_impl;

pub use atlas::{ATLAS_CELL, AtlasImage, build_atlas};
pub use renderer::{
    DEPTH_FORMAT, FrameParams, GpuContext, MSAA_SAMPLES, RenderResult, Renderer, RendererError,
    Viewport,
};
pub use wgpu_impl::WgpuRenderer;
