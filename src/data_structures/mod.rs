//! Viewer data structures: scene graph, model, transform and textures.
//!
//! - `model` contains meshes, materials and bounds of the loaded model
//! - `scene` holds lights and the slot for the one loaded model
//! - `texture` wraps GPU textures (depth buffer, offscreen colour target)
//! - `transform` is the model's position/rotation/scale around a pivot

pub mod model;
pub mod scene;
pub mod texture;
pub mod transform;
