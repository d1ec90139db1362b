//! Core application state and lifecycle.

use std::sync::Arc;
use std::sync::mpsc;

use glam::Vec2;
use voxide_core::camera::{Camera, OrbitController};
use voxide_core::document::validate_name;
use voxide_core::events::MeshEvent;
use voxide_core::frame::FrameScheduler;
use voxide_core::input::{InputState, MouseButton, PointerEvent};
use voxide_core::layout::{CanvasInfo, Layout, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use voxide_core::manager::{MeshManager, cursor_readout};
use voxide_render::{FrameParams, GpuContext, Renderer, Viewport, WgpuRenderer};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState};
use winit::window::{Window, WindowId};

use crate::event_handler::EventHandler;
use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, UiState, render_menu};

/// Pixels of scroll per line when the platform reports pixel deltas.
const PIXELS_PER_SCROLL_LINE: f32 = 40.0;

mod file_ops {
    use std::path::PathBuf;
    use std::sync::mpsc::{Receiver, Sender, TryRecvError};
    use voxide_core::obj::obj_file_name;

    /// Result of the background file read for an import.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ImportMessage {
        Loaded(String),
        Failed(String),
    }

    /// Receives the single completion message of an in-flight import read.
    ///
    /// `poll` delivers the message at most once and clears the mailbox on
    /// delivery (or when the reader thread is gone), so a finished import
    /// never re-applies and the user can re-select the same file.
    #[derive(Default)]
    pub struct ImportMailbox {
        rx: Option<Receiver<ImportMessage>>,
    }

    impl ImportMailbox {
        pub fn new() -> Self {
            Self::default()
        }

        /// Whether a read is still in flight.
        pub fn is_pending(&self) -> bool {
            self.rx.is_some()
        }

        /// Start waiting on a reader thread's channel.
        pub fn begin(&mut self, rx: Receiver<ImportMessage>) {
            self.rx = Some(rx);
        }

        /// Non-blocking check for the completion message.
        pub fn poll(&mut self) -> Option<ImportMessage> {
            let rx = self.rx.as_ref()?;
            match rx.try_recv() {
                Ok(message) => {
                    self.rx = None;
                    Some(message)
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    self.rx = None;
                    None
                }
            }
        }
    }

    /// Pick a mesh file to import using the native file dialog.
    pub fn pick_import_file() -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Import Voxel Mesh")
            .add_filter("Voxel Mesh", &["json"])
            .pick_file()
    }

    /// Read the picked file off the UI thread. The result arrives through
    /// `sender` and is drained at the start of a later frame.
    pub fn spawn_read(path: PathBuf, sender: Sender<ImportMessage>) {
        std::thread::spawn(move || {
            let message = match std::fs::read_to_string(&path) {
                Ok(text) => ImportMessage::Loaded(text),
                Err(e) => ImportMessage::Failed(
                    e.raw_os_error()
                        .map(|code| code.to_string())
                        .unwrap_or_else(|| e.kind().to_string()),
                ),
            };
            if sender.send(message).is_err() {
                log::warn!("import result dropped, receiver is gone");
            }
        });
    }

    /// Save the serialized mesh to a JSON file using the native file dialog.
    pub fn save_document(json: &str, name: &str) {
        let dialog = rfd::FileDialog::new()
            .set_title("Save Voxel Mesh")
            .set_file_name(format!("{name}.json"))
            .add_filter("Voxel Mesh", &["json"]);

        if let Some(path) = dialog.save_file() {
            if let Err(e) = std::fs::write(&path, json) {
                log::error!("Failed to write file: {e}");
            } else {
                log::info!("Saved voxel mesh to: {path:?}");
            }
        }
    }

    /// Export OBJ text plus its companion MTL next to it.
    pub fn export_obj(obj: &str, mtl: &str, name: &str) {
        let dialog = rfd::FileDialog::new()
            .set_title("Export OBJ")
            .set_file_name(obj_file_name(name))
            .add_filter("Wavefront OBJ", &["obj"]);

        if let Some(path) = dialog.save_file() {
            if let Err(e) = std::fs::write(&path, obj) {
                log::error!("Failed to write OBJ: {e}");
                return;
            }
            let mtl_path = path.with_extension("mtl");
            if let Err(e) = std::fs::write(&mtl_path, mtl) {
                log::error!("Failed to write MTL: {e}");
            } else {
                log::info!("Exported OBJ to: {path:?}");
            }
        }
    }

    /// Blocking error dialog.
    pub fn alert(title: &str, text: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(text)
            .show();
    }
}

/// Everything that exists once the window and GPU are up.
struct AppState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: WgpuRenderer,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,
    manager: MeshManager,
    camera: Camera,
    orbit: OrbitController,
    input: InputState,
    event_handler: EventHandler,
    scheduler: FrameScheduler,
    layout: Layout,
    canvas_info: CanvasInfo,
    palette_revision: u64,
    modifiers: ModifiersState,
    import_mailbox: file_ops::ImportMailbox,
}

impl AppState {
    /// Recompute the layout and dependent state for a new physical size.
    ///
    /// Safe to call redundantly; it is also called once right after init.
    fn handle_resize(&mut self, width: u32, height: u32) {
        let scale = self.window.scale_factor() as f32;
        self.layout = Layout::compute(width as f32 / scale, height as f32 / scale);
        self.canvas_info = CanvasInfo::from_layout(&self.layout, self.gpu.max_anisotropy());
        self.camera.set_aspect(self.layout.canvas_aspect());
        self.gpu.resize(width, height);
    }

    /// Whether a logical pointer position lies over the canvas region.
    fn over_canvas(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.x < self.layout.canvas_width as f32
            && position.y >= 0.0
            && position.y < self.layout.canvas_height as f32
    }

    /// Apply one menu action or keyboard shortcut.
    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::CommitName(name) => match validate_name(&name) {
                Ok(()) => self.manager.set_name(name),
                Err(_) => {
                    file_ops::alert(
                        "invalid voxel mesh name:",
                        "only a-z, A-Z, 0-9 and _ are allowed as characters\n\
                         name must be at least 1 character long",
                    );
                    self.ui_state.name_input = self.manager.name().to_string();
                }
            },
            UiAction::SelectMaterial(index) => self.manager.set_selected_material(index),
            UiAction::EditMaterial {
                index,
                fill,
                edge,
                glow,
            } => {
                self.manager.set_material_colors(index, fill, edge, glow);
                self.manager.update_texture();
            }
            UiAction::AddRandom => self.manager.add_random_voxels(),
            UiAction::AddCube => self.manager.add_cube(),
            UiAction::AddSphere => self.manager.add_sphere(),
            UiAction::FlipHorizontal => self.manager.flip_horizontal(),
            UiAction::FlipVertical => self.manager.flip_vertical(),
            UiAction::CommitMeltFloor(text) => {
                let committed = self.manager.commit_melt_floor_input(&text);
                self.ui_state.melt_floor_input = committed.to_string();
            }
            UiAction::Melt => {
                let text = self.ui_state.melt_floor_input.clone();
                let committed = self.manager.commit_melt_floor_input(&text);
                self.ui_state.melt_floor_input = committed.to_string();
                self.manager.melt();
            }
            UiAction::Import => {
                if self.import_mailbox.is_pending() {
                    log::warn!("import already in progress");
                } else if let Some(path) = file_ops::pick_import_file() {
                    let (tx, rx) = mpsc::channel();
                    file_ops::spawn_read(path, tx);
                    self.import_mailbox.begin(rx);
                }
            }
            UiAction::Save => match self.manager.export_json() {
                Ok(json) => file_ops::save_document(&json, self.manager.name()),
                Err(e) => log::error!("Failed to serialize mesh: {e}"),
            },
            UiAction::ExportObj => {
                let (obj, mtl) = self.manager.export_obj(true);
                file_ops::export_obj(&obj, &mtl, self.manager.name());
            }
            UiAction::Undo => {
                if self.manager.undo().is_some() {
                    self.ui_state
                        .sync_document(self.manager.name(), self.manager.melt_floor_height());
                }
            }
            UiAction::Redo => {
                if self.manager.redo().is_some() {
                    self.ui_state
                        .sync_document(self.manager.name(), self.manager.melt_floor_height());
                }
            }
        }
    }

    /// Deliver any finished background import.
    fn drain_import(&mut self) {
        match self.import_mailbox.poll() {
            Some(file_ops::ImportMessage::Loaded(text)) => {
                if let Err(e) = self.manager.import_text(&text) {
                    file_ops::alert("Import failed", &e.to_string());
                }
            }
            Some(file_ops::ImportMessage::Failed(code)) => {
                file_ops::alert("Import failed", &format!("File read error: {code}"));
            }
            None => {}
        }
    }

    /// Run one update/draw cycle.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.scheduler.begin_frame() {
            return;
        }

        self.drain_import();

        // Route canvas input, then advance the camera with it.
        self.event_handler
            .process(&self.input, &mut self.orbit, &mut self.manager);
        self.orbit.update(&mut self.camera);

        // Cursor ray from the post-orbit camera at the current pointer.
        let pointer = self.input.pointer_position;
        let canvas_size = Vec2::new(
            self.layout.canvas_width as f32,
            self.layout.canvas_height as f32,
        );
        let ray = (self.over_canvas(pointer) && !self.orbit.rotating)
            .then(|| self.camera.screen_ray(pointer, canvas_size));
        self.manager.update(ray.as_ref());
        self.ui_state.cursor_readout = cursor_readout(self.manager.cursor_position());
        self.ui_state.can_undo = self.manager.can_undo();
        self.ui_state.can_redo = self.manager.can_redo();
        self.input.begin_frame();

        // Run the menu UI and apply at most one action from it.
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut pending: Option<UiAction> = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            pending = render_menu(ctx, &mut self.ui_state);
        });
        if let Some(action) = pending {
            self.apply_action(action);
        }

        for event in self.manager.drain_events() {
            match event {
                MeshEvent::VoxelCountChanged(count) => self.ui_state.voxel_count = count,
                MeshEvent::ImportCompleted => {
                    self.ui_state
                        .sync_document(self.manager.name(), self.manager.melt_floor_height());
                }
            }
        }

        // Push dirty GPU state before drawing.
        if let Some(mesh) = self.manager.take_remeshed() {
            self.renderer.upload_mesh(&self.gpu, mesh);
        }
        if self.manager.palette_revision() != self.palette_revision {
            self.palette_revision = self.manager.palette_revision();
            self.renderer.upload_palette(
                &self.gpu,
                self.manager.palette(),
                self.canvas_info.max_anisotropy,
            );
            self.ui_state.sync_palette(self.manager.palette());
            self.ui_state.picker.selected = self.manager.selected_material();
        }

        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let frame = match self.gpu.acquire_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                // Surface was reconfigured; try again next frame.
                self.window.request_redraw();
                return;
            }
            Err(e) => {
                log::error!("Fatal render error: {e}");
                self.scheduler.stop();
                event_loop.exit();
                return;
            }
        };
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let scale = self.window.scale_factor() as f32;
        let params = FrameParams {
            target: &surface_view,
            view_proj: self.camera.view_projection(),
            viewport: Viewport {
                x: 0.0,
                y: 0.0,
                width: self.layout.canvas_width as f32 * scale,
                height: self.layout.canvas_height as f32 * scale,
            },
            cursor: self.manager.cursor_position(),
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        if let Err(e) = self.renderer.render(&self.gpu, &mut encoder, &params) {
            log::error!("Render failed: {e}");
        }

        // egui on top of the resolved canvas.
        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point: egui_output.pixels_per_point,
        };
        self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &primitives,
            &screen_descriptor,
        );
        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // forget_lifetime satisfies egui-wgpu's 'static requirement.
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &primitives, &screen_descriptor);
        }
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        frame.present();

        self.window.request_redraw();
    }
}

/// The application: a window-less shell until `resumed` builds the state.
#[derive(Default)]
pub struct App {
    state: Option<AppState>,
}

impl App {
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Run the application until the window closes.
    pub fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::new();
        event_loop.run_app(&mut app).expect("Event loop error");
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        // The window stays hidden until init completes.
        let window_attrs = Window::default_attributes()
            .with_title("Voxide")
            .with_inner_size(LogicalSize::new(
                MIN_WINDOW_WIDTH as f64,
                MIN_WINDOW_HEIGHT as f64,
            ))
            .with_min_inner_size(LogicalSize::new(
                MIN_WINDOW_WIDTH as f64,
                MIN_WINDOW_HEIGHT as f64,
            ))
            .with_visible(false);
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let gpu = match GpuContext::new(window.clone(), size.width, size.height) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("Renderer initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };
        let mut renderer = WgpuRenderer::new(&gpu);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );

        let scale = window.scale_factor() as f32;
        let layout = Layout::compute(size.width as f32 / scale, size.height as f32 / scale);
        let canvas_info = CanvasInfo::from_layout(&layout, gpu.max_anisotropy());

        let mut manager = MeshManager::new();
        manager.init();
        let mut camera = Camera::new(layout.canvas_aspect());
        camera.target = manager.center();

        renderer.upload_palette(&gpu, manager.palette(), canvas_info.max_anisotropy);
        let palette_revision = manager.palette_revision();

        let mut ui_state = UiState::new(
            manager.palette(),
            manager.name(),
            manager.melt_floor_height(),
        );
        ui_state.voxel_count = manager.voxel_count();

        log::info!(
            "Voxide initialized - canvas {}x{}, menu {}",
            layout.canvas_width,
            layout.canvas_height,
            layout.menu_width
        );
        ShortcutRegistry::print_all();

        let mut state = AppState {
            window: window.clone(),
            gpu,
            renderer,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            manager,
            camera,
            orbit: OrbitController::new(),
            input: InputState::new(),
            event_handler: EventHandler::new(),
            scheduler: FrameScheduler::new(),
            layout,
            canvas_info,
            palette_revision,
            modifiers: ModifiersState::default(),
            import_mailbox: file_ops::ImportMailbox::new(),
        };

        // Resize handling also runs once at startup.
        state.handle_resize(size.width, size.height);
        self.state = Some(state);

        window.set_visible(true);
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        if let WindowEvent::ModifiersChanged(modifiers) = &event {
            state.modifiers = modifiers.state();
        }

        // Let egui process the event first; if it wants the event
        // exclusively, don't route it to the canvas.
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input()
            || state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                state.scheduler.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                state.handle_resize(size.width, size.height);
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                state.redraw(event_loop);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                state.input.handle_event(PointerEvent::Move {
                    position: Vec2::new(logical.x as f32, logical.y as f32),
                });
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let Some(button) = convert_button(button) else {
                    return;
                };
                let position = state.input.pointer_position;
                match button_state {
                    ElementState::Pressed => {
                        // Presses only count when they start on the canvas.
                        if egui_wants_input || !state.over_canvas(position) {
                            return;
                        }
                        state
                            .input
                            .handle_event(PointerEvent::Down { position, button });
                    }
                    ElementState::Released => {
                        state
                            .input
                            .handle_event(PointerEvent::Up { position, button });
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if egui_wants_input {
                    return;
                }
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_SCROLL_LINE,
                };
                state.input.handle_event(PointerEvent::Scroll { delta: lines });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input || event.state != ElementState::Pressed {
                    return;
                }
                let ctrl = state.modifiers.control_key() || state.modifiers.super_key();
                let shift = state.modifiers.shift_key();
                if !ctrl {
                    return;
                }
                let Key::Character(c) = &event.logical_key else {
                    return;
                };
                let action = match c.to_lowercase().as_str() {
                    "z" if shift => Some(UiAction::Redo),
                    "z" => Some(UiAction::Undo),
                    "y" => Some(UiAction::Redo),
                    "s" => Some(UiAction::Save),
                    "o" => Some(UiAction::Import),
                    "e" => Some(UiAction::ExportObj),
                    _ => None,
                };
                if let Some(action) = action {
                    state.apply_action(action);
                    state.window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn convert_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::file_ops::{ImportMailbox, ImportMessage, spawn_read};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_mailbox_delivers_content_exactly_once() {
        let mut mailbox = ImportMailbox::new();
        let (tx, rx) = mpsc::channel();
        mailbox.begin(rx);
        tx.send(ImportMessage::Loaded("X".to_string())).unwrap();

        assert_eq!(mailbox.poll(), Some(ImportMessage::Loaded("X".to_string())));
        assert!(!mailbox.is_pending());
        assert_eq!(mailbox.poll(), None);
    }

    #[test]
    fn test_mailbox_stays_pending_until_read_finishes() {
        let mut mailbox = ImportMailbox::new();
        let (tx, rx) = mpsc::channel();
        mailbox.begin(rx);

        assert_eq!(mailbox.poll(), None);
        assert!(mailbox.is_pending());

        tx.send(ImportMessage::Failed("2".to_string())).unwrap();
        assert_eq!(mailbox.poll(), Some(ImportMessage::Failed("2".to_string())));
        assert!(!mailbox.is_pending());
    }

    #[test]
    fn test_mailbox_clears_when_reader_dies_silently() {
        let mut mailbox = ImportMailbox::new();
        let (tx, rx) = mpsc::channel::<ImportMessage>();
        mailbox.begin(rx);
        drop(tx);

        assert_eq!(mailbox.poll(), None);
        assert!(!mailbox.is_pending(), "a dead reader must not block imports");
    }

    #[test]
    fn test_spawn_read_delivers_file_contents() {
        let path = std::env::temp_dir().join("voxide_spawn_read_test.json");
        std::fs::write(&path, "{\"version\": 1}").unwrap();

        let (tx, rx) = mpsc::channel();
        spawn_read(path.clone(), tx);
        let message = rx.recv_timeout(Duration::from_secs(5)).unwrap();

        std::fs::remove_file(&path).ok();
        assert_eq!(message, ImportMessage::Loaded("{\"version\": 1}".to_string()));
    }

    #[test]
    fn test_spawn_read_reports_missing_file() {
        let path = std::env::temp_dir().join("voxide_spawn_read_missing.json");

        let (tx, rx) = mpsc::channel();
        spawn_read(path, tx);
        let message = rx.recv_timeout(Duration::from_secs(5)).unwrap();

        assert!(matches!(message, ImportMessage::Failed(_)));
    }
}
