//! Viewer configuration.
//!
//! Every tunable the viewer uses lives in [`ViewerConfig`]. The defaults
//! reproduce the stock viewer: a 75° camera five units in front of the origin,
//! a damped orbit controller and a white ambient + directional light pair.

use std::time::Duration;

/// Light colour and strength. Colours are linear RGB in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// OBJ file resolved against the page origin (web) or `./assets` (native).
    pub model_file: String,

    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Camera position after load and after "reset view". The camera always
    /// looks at the origin from here.
    pub camera_position: [f32; 3],

    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_pan: bool,

    /// Radians added to the model's Y rotation every frame while rotating.
    pub rotation_step: f32,
    pub start_rotating: bool,

    pub ambient: LightConfig,
    pub directional: LightConfig,
    /// Position of the directional light; it shines towards the origin.
    pub directional_position: [f32; 3],
    /// Used for meshes whose material file is missing or has no `Kd`.
    pub default_mesh_color: [f32; 3],
    pub clear_colour: wgpu::Color,

    pub banner_duration: Duration,
    pub screenshot_file_name: String,

    pub container_id: String,
    pub canvas_id: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_file: "male_ecorche.obj".to_string(),
            fovy_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            camera_position: [0.0, 0.0, 5.0],
            damping_factor: 0.05,
            min_distance: 1.0,
            max_distance: 50.0,
            enable_pan: false,
            rotation_step: 0.01,
            start_rotating: true,
            ambient: LightConfig {
                color: [1.0, 1.0, 1.0],
                intensity: 0.5,
            },
            directional: LightConfig {
                color: [1.0, 1.0, 1.0],
                intensity: 1.0,
            },
            directional_position: [1.0, 1.0, 1.0],
            default_mesh_color: [0.8, 0.8, 0.8],
            clear_colour: wgpu::Color::BLACK,
            banner_duration: Duration::from_secs(5),
            screenshot_file_name: "model-screenshot.png".to_string(),
            container_id: "app".to_string(),
            canvas_id: "canvas".to_string(),
        }
    }
}
