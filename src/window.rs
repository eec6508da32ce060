//! Window and Event Loop Management
//!
//! This module contains the shared windowing logic used by both
//! WASM (lib.rs) and desktop (main.rs) entry points. It translates winit
//! events into pointer events and commands for [`App`].

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, KeyCode, ModifiersState, NamedKey, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::app::CommandOutcome;
use crate::config::CanvasConfig;
use crate::export::PngDocument;
use crate::font::FontBook;
use crate::geometry::{Point, SurfaceSize};
use crate::input::PointerEvent;
use crate::{debug, App, Command, Renderer};

/// Wrapper for the application window and state
pub struct AppWrapper {
    pub window: Option<Arc<Window>>,
    pub renderer: Option<Renderer>,
    pub app: Option<App>,
    config: CanvasConfig,
    /// Last cursor position; button events carry no coordinates
    cursor: Point,
    modifiers: ModifiersState,
    /// Renderer finished by the async web initialisation, adopted on the next event
    #[cfg(target_arch = "wasm32")]
    pending_renderer: std::rc::Rc<std::cell::RefCell<Option<Renderer>>>,
}

impl AppWrapper {
    /// Create a new empty app wrapper
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            window: None,
            renderer: None,
            app: None,
            config,
            cursor: Point::default(),
            modifiers: ModifiersState::default(),
            #[cfg(target_arch = "wasm32")]
            pending_renderer: Default::default(),
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Resize the presenter and re-initialise the drawing surface
    fn resize(&mut self, physical_size: winit::dpi::PhysicalSize<u32>) {
        // Skip invalid sizes
        if physical_size.width == 0 || physical_size.height == 0 {
            log::warn!("Ignoring resize to zero size: {:?}", physical_size);
            return;
        }
        let dpi_y = self
            .window
            .as_ref()
            .map(|w| (w.scale_factor() * 96.0).round() as u32)
            .unwrap_or(96);

        if let Some(renderer) = &mut self.renderer {
            renderer.resize(physical_size);
        }
        if let Some(app) = &mut self.app {
            app.resize(SurfaceSize::new(physical_size.width, physical_size.height), dpi_y);
            log::info!("✅ Surface resized to {:?} at {} dpi", physical_size, dpi_y);
        }
        self.request_redraw();
    }

    fn pointer(&mut self, event: PointerEvent) {
        let Some(app) = &mut self.app else {
            return;
        };
        let changed = app.handle_pointer(event);
        debug::update_pointer(event.position.x, event.position.y, app.is_drawing());
        if changed {
            self.request_redraw();
        }
    }

    fn command(&mut self, event_loop: &ActiveEventLoop, command: Command) {
        let Some(app) = &mut self.app else {
            return;
        };
        match app.command(command) {
            CommandOutcome::Applied => debug::update_mode(app.surface().mode()),
            CommandOutcome::Printed(document) => print_document(&document, &self.config),
            CommandOutcome::Exit => {
                log::info!("Exit requested");
                event_loop.exit();
            }
        }
    }

    fn keyboard(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        if event.logical_key == Key::Named(NamedKey::Escape) {
            self.command(event_loop, Command::Exit);
            return;
        }
        // Physical keys, so Ctrl combinations map the same on every layout
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(key) = shortcut_char(code) else {
            return;
        };
        if let Some(command) = Command::from_shortcut(key, self.modifiers.control_key()) {
            self.command(event_loop, command);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn adopt_pending_renderer(&mut self) {
        let Some(renderer) = self.pending_renderer.borrow_mut().take() else {
            return;
        };
        log::info!("✅ Renderer initialized successfully");
        let size = renderer.size();
        self.renderer = Some(renderer);
        self.resize(size);
    }
}

impl ApplicationHandler for AppWrapper {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let size = winit::dpi::PhysicalSize::new(self.config.window.width, self.config.window.height);
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(size);

        let window = event_loop
            .create_window(window_attributes)
            .expect("Failed to create window");

        log::info!("Window created: {:?}", window.inner_size());

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;

            let canvas = window.canvas().expect("Failed to get canvas from window");

            web_sys::window()
                .and_then(|win| win.document())
                .and_then(|doc| {
                    let container = doc.get_element_by_id("canvas-container")?;
                    container.append_child(&canvas).ok()?;
                    Some(())
                })
                .expect("Failed to append canvas to document");

            // On web the canvas size can only be set once it is in the DOM
            let _ = window.request_inner_size(size);
            log::info!("✅ Canvas appended to DOM and size requested: {:?}", size);

            let window_arc = Arc::new(window);
            self.window = Some(window_arc.clone());
            // No system font access in the browser
            self.app = Some(App::new(&self.config, FontBook::bundled()));

            let pending = self.pending_renderer.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let renderer = Renderer::new(window_arc.clone(), size).await;
                *pending.borrow_mut() = Some(renderer);
                // Next event adopts the renderer
                window_arc.request_redraw();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let window_arc = Arc::new(window);
            let initial_size = window_arc.inner_size();

            let renderer = pollster::block_on(Renderer::new(window_arc.clone(), initial_size));
            let app = App::new(&self.config, FontBook::with_system_fonts());

            self.window = Some(window_arc);
            self.renderer = Some(renderer);
            self.app = Some(app);
            self.resize(initial_size);

            log::info!("✅ Renderer and drawing surface created");
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        self.adopt_pending_renderer();

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                log::info!("Resize event: {:?}", physical_size);
                self.resize(physical_size);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point::new(position.x as i32, position.y as i32);
                self.pointer(PointerEvent::moved(self.cursor.x, self.cursor.y));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let Point { x, y } = self.cursor;
                let event = match state {
                    ElementState::Pressed => PointerEvent::down(x, y),
                    ElementState::Released => PointerEvent::up(x, y),
                };
                self.pointer(event);
            }
            WindowEvent::Focused(false) => {
                if self.app.as_mut().is_some_and(|app| app.cancel_stroke()) {
                    self.request_redraw();
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard(event_loop, event);
            }
            WindowEvent::RedrawRequested => {
                if let (Some(renderer), Some(app)) = (&mut self.renderer, &self.app) {
                    app.render(renderer);
                }
            }
            _ => {}
        }
    }
}

/// Letter keys that carry shortcuts
fn shortcut_char(code: KeyCode) -> Option<char> {
    let key = match code {
        KeyCode::KeyB => 'b',
        KeyCode::KeyC => 'c',
        KeyCode::KeyF => 'f',
        KeyCode::KeyH => 'h',
        KeyCode::KeyI => 'i',
        KeyCode::KeyL => 'l',
        KeyCode::KeyP => 'p',
        KeyCode::KeyQ => 'q',
        KeyCode::KeyR => 'r',
        KeyCode::KeyS => 's',
        KeyCode::KeyT => 't',
        KeyCode::KeyW => 'w',
        _ => return None,
    };
    Some(key)
}

/// Hand a printed document to the output device
#[cfg(not(target_arch = "wasm32"))]
fn print_document(document: &PngDocument, config: &CanvasConfig) {
    match document.write_pages(&config.export.directory) {
        Ok(paths) => {
            let job = paths
                .first()
                .and_then(|p| p.parent())
                .unwrap_or(config.export.directory.as_path());
            log::info!("🖨️ Printed {} page(s) to {}", paths.len(), job.display());
        }
        Err(e) => log::error!("Print failed: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn print_document(document: &PngDocument, _config: &CanvasConfig) {
    match document.encode_pages() {
        Ok(pages) => log::info!("🖨️ Encoded {} page(s); no file output on the web", pages.len()),
        Err(e) => log::error!("Print failed: {}", e),
    }
}
