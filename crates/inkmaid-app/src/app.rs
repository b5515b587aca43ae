//! Core application state and lifecycle.

use std::sync::Arc;
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use egui::Color32;
use inkmaid_core::{
    Completion, DEFAULT_SOURCE, EditorSession, MouseButton as PointerButton, NoticeTimers,
    PointerEvent, TouchPhase, TouchTracker, ViewerConfig,
};
use kurbo::{Point, Vec2};
use thiserror::Error;
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowId};

use crate::dispatch::RenderDispatcher;
use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, UiState, render_ui};

#[cfg(feature = "native")]
mod file_ops {
    use inkmaid_core::SvgExport;

    /// Copy text to the system clipboard.
    pub fn copy_text_to_clipboard(text: &str) {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text.to_string()) {
                Ok(()) => log::info!("Copied {} bytes of source to clipboard", text.len()),
                Err(e) => log::error!("Failed to copy to clipboard: {}", e),
            },
            Err(e) => log::error!("Failed to access clipboard: {}", e),
        }
    }

    /// Save an SVG using native file dialog.
    pub fn export_svg(export: &SvgExport) {
        let dialog = rfd::FileDialog::new()
            .set_title("Export SVG")
            .set_file_name(export.file_name)
            .add_filter("SVG Image", &["svg"]);

        if let Some(path) = dialog.save_file() {
            match std::fs::write(&path, export.as_bytes()) {
                Ok(()) => log::info!("Exported SVG to: {:?}", path),
                Err(e) => log::error!("Failed to write file: {}", e),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod file_ops {
    use inkmaid_core::SvgExport;
    use wasm_bindgen::prelude::*;

    /// Copy text to clipboard (fire and forget).
    pub fn copy_text_to_clipboard(text: &str) {
        let text = text.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(window) = web_sys::window() {
                let clipboard = window.navigator().clipboard();
                let promise = clipboard.write_text(&text);
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    log::error!("Failed to copy to clipboard: {:?}", e);
                }
            }
        });
    }

    /// Download an SVG through a temporary object URL.
    pub fn export_svg(export: &SvgExport) {
        if let Err(e) = download_file(export.file_name, &export.contents, export.mime) {
            log::error!("Failed to download {}: {:?}", export.file_name, e);
        }
    }

    fn download_file(filename: &str, content: &str, mime_type: &str) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;

        // Create blob
        let blob_parts = js_sys::Array::new();
        blob_parts.push(&JsValue::from_str(content));

        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime_type);

        let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options)?;

        // Create download URL
        let url = web_sys::Url::create_object_url_with_blob(&blob)?;

        // Create and click download link
        let a = document
            .create_element("a")?
            .dyn_into::<web_sys::HtmlAnchorElement>()?;

        a.set_href(&url);
        a.set_download(filename);
        a.click();

        // Clean up
        web_sys::Url::revoke_object_url(&url)
    }
}

/// Errors while bringing up the GPU surface.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("No suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("Surface is not supported by the adapter")]
    Unsupported,
}

/// Surface, device and queue for the window.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    async fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("inkmaid device"),
                required_limits: adapter.limits(),
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or(GpuError::Unsupported)?;
        // egui-wgpu expects a linear (non-sRGB) target.
        let capabilities = surface.get_capabilities(&adapter);
        if let Some(format) = capabilities.formats.iter().copied().find(|f| !f.is_srgb()) {
            config.format = format;
        }
        config.present_mode = wgpu::PresentMode::AutoVsync;
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Inkmaid".to_string(),
            width: 1280,
            height: 800,
            background_color: Color32::from_rgb(243, 244, 246),
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    gpu: Gpu,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    session: EditorSession,
    dispatcher: RenderDispatcher,
    notice_timers: NoticeTimers,
    config: AppConfig,

    // Input
    /// Last cursor position, in points.
    cursor: Point,
    modifiers: ModifiersState,
    touches: TouchTracker,
}

impl AppState {
    /// Apply an action coming from the UI or a keyboard shortcut.
    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::EditSource => {
                let request = self.session.edit(&self.ui_state.source);
                self.dispatcher.submit(request);
            }
            UiAction::LoadTemplate(template) => {
                let request = self.session.load_template(template);
                self.ui_state.source = template.source.to_string();
                self.dispatcher.submit(request);
            }
            UiAction::ZoomIn => {
                self.session.viewport_mut().zoom_in();
            }
            UiAction::ZoomOut => {
                self.session.viewport_mut().zoom_out();
            }
            UiAction::ResetView => {
                self.session.viewport_mut().reset();
            }
            UiAction::ToggleFullscreen => {
                self.session.toggle_fullscreen();
                self.touches.clear();
            }
            UiAction::CloseFullscreen => {
                if self.session.is_fullscreen() {
                    self.session.set_fullscreen(false);
                    self.touches.clear();
                }
            }
            UiAction::CopySource => {
                file_ops::copy_text_to_clipboard(self.session.copy_text());
            }
            UiAction::ExportSvg => match self.session.export() {
                Some(export) => file_ops::export_svg(&export),
                None => log::debug!("No rendered diagram to export"),
            },
            UiAction::ShowShortcuts => {
                self.ui_state.shortcuts_modal_open = !self.ui_state.shortcuts_modal_open;
            }
        }
    }

    /// Apply finished renders to the session.
    fn collect_renders(&mut self) {
        for (seq, result) in self.dispatcher.poll() {
            let failed = result.as_ref().err().map(|e| e.message().to_string());
            match self.session.complete(seq, result) {
                Completion::Applied => match failed {
                    Some(message) => log::warn!("Render {} failed: {}", seq, message),
                    None => log::debug!("Render {} applied", seq),
                },
                Completion::Stale => log::debug!("Discarded stale render {}", seq),
            }
        }
    }

    /// Convert a physical window position to egui points.
    fn to_points(&self, x: f64, y: f64) -> Point {
        let ppp = self.egui_ctx.pixels_per_point() as f64;
        Point::new(x / ppp, y / ppp)
    }

    fn is_over_preview(&self, point: Point) -> bool {
        self.ui_state
            .is_over_preview(egui::pos2(point.x as f32, point.y as f32))
    }

    /// Arm a timer for a freshly raised zoom notice and fire the due ones.
    fn update_notice_timers(&mut self) {
        let now = Instant::now();
        let viewport = self.session.viewport_mut();
        if let Some(ticket) = viewport.take_raised_notice() {
            self.notice_timers.arm(ticket, now + viewport.notice_delay());
        }
        for ticket in self.notice_timers.due(now) {
            if !viewport.expire_notice(ticket) {
                log::debug!("Notice {} was already replaced", ticket.generation());
            }
        }
    }

    fn redraw(&mut self) {
        self.collect_renders();
        self.update_notice_timers();
        self.ui_state.rendering = self.dispatcher.is_busy();

        // Run egui and get any actions
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, &mut self.ui_state, &self.session);
        });
        if let Some(action) = action {
            self.apply_action(action);
        }

        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let surface_texture = match self.gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = (self.gpu.config.width, self.gpu.config.height);
                self.gpu.resize(width, height);
                self.window.request_redraw();
                return;
            }
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.gpu.device;
        let queue = &self.gpu.queue;

        // Update egui textures
        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui encoder"),
        });
        self.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &egui_primitives,
            &screen_descriptor,
        );

        let [r, g, b, a] = self.config.background_color.to_normalized_gamma_f32();
        let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("egui render pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Use forget_lifetime to satisfy egui-wgpu's 'static requirement
        let mut render_pass = render_pass.forget_lifetime();
        self.egui_renderer
            .render(&mut render_pass, &egui_primitives, &screen_descriptor);
        drop(render_pass);

        queue.submit(std::iter::once(encoder.finish()));

        // Free egui textures
        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        self.window.request_redraw();
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    viewer: ViewerConfig,
    state: Option<AppState>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Result of the async GPU setup, picked up by the next event (WASM only)
    #[cfg(target_arch = "wasm32")]
    pending_gpu: Rc<RefCell<Option<Result<Gpu, GpuError>>>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: bool,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), Self::load_viewer_config())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig, viewer: ViewerConfig) -> Self {
        Self {
            config,
            viewer,
            state: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            pending_gpu: Rc::new(RefCell::new(None)),
            #[cfg(target_arch = "wasm32")]
            init_in_progress: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_viewer_config() -> ViewerConfig {
        ViewerConfig::load_default()
    }

    #[cfg(target_arch = "wasm32")]
    fn load_viewer_config() -> ViewerConfig {
        ViewerConfig::default()
    }

    /// Source shown at start-up.
    fn initial_source() -> &'static str {
        #[cfg(target_arch = "wasm32")]
        if let Some(template) = crate::web::initial_template() {
            log::info!("Template from URL: {}", template.name);
            return template.source;
        }
        DEFAULT_SOURCE
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app).expect("Event loop error");
        }
    }

    /// Finish initialization after the GPU is ready.
    fn finish_init(&mut self, window: Arc<Window>, gpu: Gpu) {
        // Initialize egui
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
            gpu.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let source = Self::initial_source();
        let (session, request) = EditorSession::new(&self.viewer, source);
        let mut dispatcher = RenderDispatcher::from_config(&self.viewer);
        log::info!(
            "Inkmaid initialized - {}x{}, renderer: {}",
            gpu.config.width,
            gpu.config.height,
            dispatcher.renderer_name()
        );
        dispatcher.submit(request);

        self.state = Some(AppState {
            window: window.clone(),
            gpu,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::new(source),
            session,
            dispatcher,
            notice_timers: NoticeTimers::new(),
            config: self.config.clone(),
            cursor: Point::ZERO,
            modifiers: ModifiersState::default(),
            touches: TouchTracker::new(),
        });

        self.pending_window = None;

        // Request initial redraw
        window.request_redraw();
    }

    /// Pick up the async GPU setup result, starting it if needed (WASM only).
    #[cfg(target_arch = "wasm32")]
    fn poll_async_init(&mut self) {
        let Some(window) = self.pending_window.clone() else {
            return;
        };

        let finished = self.pending_gpu.borrow_mut().take();
        match finished {
            Some(Ok(gpu)) => {
                log::info!("Surface created successfully");
                self.finish_init(window, gpu);
                return;
            }
            Some(Err(e)) => {
                log::error!("Failed to create surface: {}", e);
                self.init_in_progress = false;
            }
            None => {}
        }

        if !self.init_in_progress {
            self.init_in_progress = true;

            // Get actual viewport size from browser
            let (width, height) = web_sys::window()
                .map(|w| {
                    let dpr = w.device_pixel_ratio();
                    let width = w.inner_width().ok().and_then(|v| v.as_f64());
                    let height = w.inner_height().ok().and_then(|v| v.as_f64());
                    (
                        (width.unwrap_or(self.config.width as f64) * dpr) as u32,
                        (height.unwrap_or(self.config.height as f64) * dpr) as u32,
                    )
                })
                .unwrap_or((self.config.width, self.config.height));

            let slot = Rc::clone(&self.pending_gpu);
            let window_clone = window.clone();
            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Creating surface asynchronously...");
                let result = Gpu::new(window_clone, width, height).await;
                *slot.borrow_mut() = Some(result);
            });
        }

        // Request redraw to keep the event loop running
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        // Create window attributes - native gets fixed size, WASM will use viewport
        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach canvas to DOM and use full viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let web_window = web_sys::window().expect("No window");
            let document = web_window.document().expect("No document");

            // Remove loading indicator
            if let Some(loading) = document.get_element_by_id("loading") {
                loading.remove();
            }

            // Create canvas
            let canvas = document
                .get_element_by_id("inkmaid-canvas")
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
                .or_else(|| {
                    let app_div = document.get_element_by_id("app")?;
                    let canvas = document.create_element("canvas").ok()?;
                    canvas.set_id("inkmaid-canvas");
                    app_div.append_child(&canvas).ok()?;
                    canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
                })
                .expect("Failed to create canvas");

            let style = canvas.style();
            let _ = style.set_property("width", "100%");
            let _ = style.set_property("height", "100%");
            let _ = style.set_property("display", "block");
            let _ = style.set_property("position", "fixed");
            let _ = style.set_property("top", "0");
            let _ = style.set_property("left", "0");
            // Let the viewport own touch gestures instead of the browser.
            let _ = style.set_property("touch-action", "none");

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
                .with_prevent_default(true)
        };

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        log::info!("Window created, initializing renderer...");

        // On native, block on async GPU setup
        #[cfg(not(target_arch = "wasm32"))]
        {
            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                (self.config.width, self.config.height)
            } else {
                (size.width, size.height)
            };
            log::info!("Surface size: {}x{}", width, height);

            let gpu = pollster::block_on(Gpu::new(window.clone(), width, height))
                .expect("Failed to initialize GPU");
            self.finish_init(window, gpu);
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // On WASM, handle async initialization
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            self.poll_async_init();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);

        // If egui wants this event exclusively, don't send it to the viewport
        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input()
            || state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                state.gpu.resize(size.width, size.height);
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                state.redraw();
            }

            WindowEvent::Focused(false) => {
                state.touches.clear();
                state.session.viewport_mut().cancel_gesture();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = state.to_points(position.x, position.y);
                state.cursor = point;

                // A drag keeps going even when the pointer leaves the preview
                if state.session.viewport().gesture().is_dragging() {
                    state
                        .session
                        .viewport_mut()
                        .handle_pointer(PointerEvent::Move { position: point });
                }
            }

            WindowEvent::MouseInput { state: btn_state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Left,
                    MouseButton::Right => PointerButton::Right,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                let position = state.cursor;

                match btn_state {
                    ElementState::Pressed => {
                        // Skip viewport processing if egui wants the pointer
                        if egui_wants_input || !state.is_over_preview(position) {
                            return;
                        }
                        state
                            .session
                            .viewport_mut()
                            .handle_pointer(PointerEvent::Down { position, button });
                    }
                    ElementState::Released => {
                        // Always end a drag, wherever the button goes up
                        state
                            .session
                            .viewport_mut()
                            .handle_pointer(PointerEvent::Up { position, button });
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                // Skip viewport processing if egui wants the pointer
                if egui_wants_input || !state.is_over_preview(state.cursor) {
                    return;
                }

                let scroll = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(x as f64 * 20.0, y as f64 * 20.0),
                    MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x, pos.y),
                };

                // winit reports scrolling up as positive; the viewport takes
                // DOM-style deltas where positive means down.
                state.session.viewport_mut().handle_pointer(PointerEvent::Scroll {
                    position: state.cursor,
                    delta: -scroll,
                });
            }

            WindowEvent::Touch(touch) => {
                let point = state.to_points(touch.location.x, touch.location.y);
                let phase = match touch.phase {
                    winit::event::TouchPhase::Started => TouchPhase::Start,
                    winit::event::TouchPhase::Moved => TouchPhase::Move,
                    winit::event::TouchPhase::Ended => TouchPhase::End,
                    winit::event::TouchPhase::Cancelled => TouchPhase::Cancel,
                };

                // New fingers only count when they land on the preview
                if phase == TouchPhase::Start && (egui_wants_input || !state.is_over_preview(point)) {
                    return;
                }

                let event = state.touches.update(touch.id, phase, point);
                state.session.viewport_mut().handle_touch(event);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }

                let ctrl = state.modifiers.control_key() || state.modifiers.super_key();
                let shift = state.modifiers.shift_key();
                let Some(action) = ShortcutRegistry::action_for(&event.logical_key, ctrl, shift)
                else {
                    return;
                };

                // Escape always closes the fullscreen preview; everything else
                // yields to egui text input.
                let is_escape = matches!(event.logical_key, Key::Named(NamedKey::Escape));
                if egui_wants_input && !is_escape {
                    return;
                }
                state.apply_action(action);
            }

            _ => {}
        }
    }
}
