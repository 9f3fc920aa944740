//! obj-viewer
//!
//! A small 3D model viewer for the desktop and the browser. It loads one OBJ
//! file, centres it, lights it with an ambient and a directional light and
//! shows it through a damped orbit camera. Four controls operate on the
//! view: reset view, toggle wireframe, toggle auto rotation and screenshot.
//! Loading errors are shown in a banner that disappears after five seconds.
//!
//! High-level modules
//! - `app`: winit application loop and the events async work reports back with
//! - `viewer`: platform-independent viewer state and per-frame logic
//! - `camera`: camera, projection, orbit controller and the camera uniform
//! - `controls`: the four user actions and their keyboard shortcuts
//! - `interaction`: pointer hit testing against the loaded meshes
//! - `context`: GPU device, surface, uniforms and the uploaded model
//! - `render`: the render pass
//! - `screenshot`: offscreen capture, readback and PNG encoding
//! - `resources`: fetching and parsing the OBJ file, GPU buffers
//! - `data_structures`: model, scene, transform and textures
//! - `banner`, `error`, `config`, `viewport`: supporting types
//!

pub mod app;
pub mod banner;
pub mod camera;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod error;
pub mod interaction;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod screenshot;
pub mod viewer;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::run;
pub use config::ViewerConfig;
pub use error::LoadError;
pub use viewer::Viewer;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run(ViewerConfig::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
