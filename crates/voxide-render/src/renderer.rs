//! Renderer trait abstraction and GPU surface state.

use glam::{IVec3, Mat4};
use std::sync::Arc;
use thiserror::Error;
use voxide_core::mesher::SurfaceMesh;
use voxide_core::palette::Palette;
use winit::window::Window;

/// Multisample count for the voxel pass.
pub const MSAA_SAMPLES: u32 = 4;

/// Depth buffer format for the voxel pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
    #[error("GPU out of memory")]
    OutOfMemory,
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Canvas region of the surface, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Parameters for a single scene render.
pub struct FrameParams<'a> {
    /// Resolved output view (the surface texture).
    pub target: &'a wgpu::TextureView,
    /// World-to-clip transform of the camera.
    pub view_proj: Mat4,
    /// Canvas region to draw into; the rest of the surface is left to the UI.
    pub viewport: Viewport,
    /// Grid cell to highlight with the placement cursor, if any.
    pub cursor: Option<IVec3>,
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Replace the voxel geometry buffers with a freshly extracted mesh.
    fn upload_mesh(&mut self, gpu: &GpuContext, mesh: &SurfaceMesh);

    /// Rebuild the palette atlas texture from the current material colors.
    fn upload_palette(&mut self, gpu: &GpuContext, palette: &Palette, max_anisotropy: u16);

    /// Encode the voxel scene into `encoder`, resolving into the frame target.
    fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        params: &FrameParams,
    ) -> RenderResult<()>;
}

/// Owns the wgpu device, queue, surface, and the MSAA/depth attachments.
pub struct GpuContext {
    surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    msaa_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

impl GpuContext {
    /// Acquire the GPU and configure the window surface.
    pub fn new(window: Arc<Window>, width: u32, height: u32) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .map_err(|e| RendererError::InitFailed(format!("create surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| RendererError::InitFailed(format!("no suitable adapter: {e}")))?;
        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("voxide device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        }))
        .map_err(|e| RendererError::InitFailed(format!("request device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| RendererError::InitFailed("no supported surface format".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let msaa_view = create_msaa_view(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            msaa_view,
            depth_view,
        })
    }

    /// Surface texture format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Highest anisotropic filtering level to ask of the palette sampler.
    pub fn max_anisotropy(&self) -> u16 {
        16
    }

    /// Multisampled color attachment for the voxel pass.
    pub fn msaa_view(&self) -> &wgpu::TextureView {
        &self.msaa_view
    }

    /// Depth attachment for the voxel pass.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Reconfigure the surface and attachments for a new physical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.msaa_view = create_msaa_view(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    /// Fetch the next surface texture.
    ///
    /// Lost or outdated surfaces are reconfigured and the frame skipped
    /// (`Ok(None)`); running out of GPU memory is fatal.
    pub fn acquire_frame(&mut self) -> RenderResult<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(RendererError::OutOfMemory),
            Err(e) => {
                log::warn!("skipping frame: {e}");
                Ok(None)
            }
        }
    }
}

fn create_msaa_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: MSAA_SAMPLES,
            dimension: wgpu::TextureDimension::D2,
            format: config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("depth"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: MSAA_SAMPLES,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}
