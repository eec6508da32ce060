//! Debug overlay utilities for web platform
//!
//! Forwards initialization stages, the active draw mode and pointer position
//! to the page's on-screen debug display. No-ops on desktop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::mode::DrawMode;

/// Update the debug status line
#[cfg(target_arch = "wasm32")]
pub fn update_status(status: &str) {
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = updateDebugStatus)]
        fn update_debug_status(status: &str);
    }
    update_debug_status(status);
}

/// Show the active draw mode
#[cfg(target_arch = "wasm32")]
pub fn update_mode(mode: DrawMode) {
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = updateDebugMode)]
        fn update_debug_mode(mode: &str);
    }
    update_debug_mode(mode.name());
}

/// Update pointer information in the debug overlay
#[cfg(target_arch = "wasm32")]
pub fn update_pointer(x: i32, y: i32, drawing: bool) {
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = updateDebugPointer)]
        fn update_debug_pointer(x: i32, y: i32, drawing: bool);
    }
    update_debug_pointer(x, y, drawing);
}

/// Increment the frame counter
#[cfg(target_arch = "wasm32")]
pub fn increment_frame_count() {
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = incrementFrameCount)]
        fn increment_frame_count_js();
    }
    increment_frame_count_js();
}

// No-op versions for non-WASM platforms
#[cfg(not(target_arch = "wasm32"))]
pub fn update_status(_status: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn update_mode(_mode: DrawMode) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn update_pointer(_x: i32, _y: i32, _drawing: bool) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn increment_frame_count() {}
