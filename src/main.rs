//! Standalone Drawing Surface Application (Desktop)
//!
//! This binary runs the drawing demo as a native desktop application.
//! For WASM/web builds, the entry point is in lib.rs (wasm_start).

use drawing_surface::{AppWrapper, CanvasConfig};
use winit::event_loop::{ControlFlow, EventLoop};

fn main() {
    env_logger::init();

    log::info!("🚀 Starting drawing surface desktop app");

    let config = CanvasConfig::load_or_default();

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app_wrapper = AppWrapper::new(config);

    event_loop.run_app(&mut app_wrapper).expect("Event loop error");
}
