//! Drawing Surface Library
//!
//! A double-buffered drawing demo: drag to draw lines, brush-filled
//! rectangles or sample text, change pen/brush/font, and print the canvas.
//! It can run:
//! - As a native desktop application (`drawing_surface_app`)
//! - Standalone in a browser (via WASM)
//!
//! The core ([`DrawingSurface`]) rasterises on the CPU into a `tiny_skia`
//! back-buffer and is independent of the windowing system; `window` and
//! `renderer` only deliver events and present frames.

mod app;
mod color;
mod command;
pub mod config;
pub mod debug;
mod export;
mod font;
mod geometry;
mod input;
mod mode;
mod renderer;
mod style;
mod surface;
mod target;
mod window;

pub use app::{App, CommandOutcome};
pub use color::{Color, Palette, ParseColorError, PALETTE_SIZE};
pub use command::Command;
pub use config::{CanvasConfig, ConfigError};
pub use export::{ExportError, PageDevice, PngDocument};
pub use font::{FontBook, FontError, LoadedFont, TextRun};
pub use geometry::{CornerRect, Point, SurfaceSize};
pub use input::{PointerEvent, PointerEventType, StrokeAction, StrokeTracker};
pub use mode::{DrawMode, SAMPLE_TEXT};
pub use renderer::Renderer;
pub use style::{point_size_to_pixels, Brush, FontDescriptor, Pen, Slot, TextColors, PEN_WIDTH};
pub use surface::{DrawingSurface, StyleState, SurfaceOptions, BACKGROUND};
pub use target::RenderTarget;
pub use window::AppWrapper;

// Re-export for WASM builds
#[cfg(target_arch = "wasm32")]
pub use wasm_bindgen;

/// Initialize panic hook for better error messages in WASM
#[cfg(target_arch = "wasm32")]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize logging for WASM (logs go to browser console)
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to initialize logger");
}

/// WASM entry point - called when the module is loaded
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    init_panic_hook();
    init_logging();

    log::info!("🚀 Drawing Surface WASM module started");

    wasm_bindgen_futures::spawn_local(async {
        run_event_loop();
    });
}

#[cfg(target_arch = "wasm32")]
fn run_event_loop() {
    use winit::event_loop::{ControlFlow, EventLoop};

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    // No filesystem on the web; built-in defaults only
    let mut app_wrapper = AppWrapper::new(CanvasConfig::default());

    let _ = event_loop.run_app(&mut app_wrapper);
}
