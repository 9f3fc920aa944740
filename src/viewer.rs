//! Platform-independent viewer state and per-frame logic.
//!
//! [`Viewer`] owns everything the GPU context does not: the scene, the camera
//! rig, pointer interaction, the rotation flag and the error banner. The
//! application loop feeds it input and calls [`Viewer::tick`] once per frame
//! before painting.

use cgmath::{Deg, Point3};
use instant::Instant;

use crate::{
    banner::BannerSlot,
    camera::{Camera, OrbitController, Projection},
    config::ViewerConfig,
    controls::{self, Action},
    data_structures::{model::Model, scene::Scene},
    error::LoadError,
    interaction::{InteractionEvent, InteractionManager},
    viewport::Viewport,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewerState {
    pub is_rotating: bool,
}

#[derive(Debug)]
pub struct Viewer {
    pub config: ViewerConfig,
    pub state: ViewerState,
    pub scene: Scene,
    pub camera: Camera,
    pub projection: Projection,
    pub controller: OrbitController,
    pub viewport: Viewport,
    pub interaction: InteractionManager,
    pub banner: BannerSlot,
}

impl Viewer {
    pub fn new(config: ViewerConfig, width: u32, height: u32) -> Self {
        let camera = Camera::new(config.camera_position);
        let projection = Projection::new(
            width.max(1),
            height.max(1),
            Deg(config.fovy_degrees),
            config.znear,
            config.zfar,
        );
        let mut controller =
            OrbitController::new(config.damping_factor, config.min_distance, config.max_distance);
        controller.enable_pan = config.enable_pan;
        let state = ViewerState {
            is_rotating: config.start_rotating,
        };
        controller.enabled = !state.is_rotating;
        controller.save_state(&camera);

        Self {
            scene: Scene::new(&config),
            banner: BannerSlot::new(config.banner_duration),
            viewport: Viewport::new(width, height),
            interaction: InteractionManager::new(),
            camera,
            projection,
            controller,
            state,
            config,
        }
    }

    pub fn home(&self) -> Point3<f32> {
        Point3::from(self.config.camera_position)
    }

    /// Adopt a new surface size. Returns `false` for zero sizes.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.viewport.resize(width, height, &mut self.projection)
    }

    /// Advance one frame: spin the model, step the controller, hit test the
    /// pointer. The hit test is repeated whenever the model or the camera
    /// moved, so hover state follows a spinning model under a still cursor.
    pub fn tick(&mut self) -> Vec<InteractionEvent> {
        let before = (self.camera.position, self.camera.target);
        if self.state.is_rotating {
            let step = self.config.rotation_step;
            if let Some(model) = self.scene.model_mut() {
                model.transform.rotate_y(step);
                self.interaction.invalidate();
            }
        }
        self.controller.update(&mut self.camera);
        if (self.camera.position, self.camera.target) != before {
            self.interaction.invalidate();
        }
        self.interaction.update(
            self.scene.model(),
            &self.camera,
            &self.projection,
            &self.viewport,
        )
    }

    /// Handle the outcome of the model load.
    ///
    /// On success the model is centred, attached and made clickable, and the
    /// camera is placed at its home position. On failure the error is logged
    /// and shown in the banner; the scene stays empty.
    pub fn on_model_loaded(&mut self, result: Result<Model, LoadError>) -> bool {
        match result {
            Ok(mut model) => {
                model.center_at_origin();
                let mesh_count = model.meshes.len();
                log::info!(
                    "Model {} loaded: {} meshes, {} triangles",
                    model.name,
                    mesh_count,
                    model.triangle_count()
                );
                self.scene.attach(model);
                self.interaction.clear();
                for idx in 0..mesh_count {
                    self.interaction.add(idx);
                }
                self.camera.position = self.home();
                self.camera.look_at(Point3::new(0.0, 0.0, 0.0));
                self.controller.update(&mut self.camera);
                self.controller.save_state(&self.camera);
                true
            }
            Err(e) => {
                let message = e.banner_message();
                log::error!("{}", message);
                self.banner.show(message, Instant::now());
                false
            }
        }
    }

    /// Apply a button or key action. Screenshots are not handled here.
    pub fn perform(&mut self, action: Action) {
        match action {
            Action::ResetView => {
                if self.scene.model().is_none() {
                    log::info!("No model loaded, nothing to reset");
                    return;
                }
                let home = self.home();
                controls::reset_view(&mut self.camera, &mut self.controller, home);
            }
            Action::ToggleWireframe => {
                if !controls::toggle_wireframe(&mut self.scene) {
                    log::info!("No model loaded, nothing to toggle");
                }
            }
            Action::ToggleRotation => {
                controls::toggle_rotation(&mut self.state.is_rotating, &mut self.controller);
                log::info!("Auto rotation {}", if self.state.is_rotating { "on" } else { "off" });
            }
            Action::Screenshot => log::warn!("Screenshots need a GPU context"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::model::{Material, Mesh, ModelVertex};

    fn triangle_model() -> Model {
        let v = |x: f32, y: f32, z: f32| ModelVertex {
            position: [x, y, z],
            normal: [0.0, 0.0, 1.0],
        };
        Model::new(
            "tri",
            vec![Mesh::new(
                "tri",
                vec![v(10.0, 0.0, 0.0), v(12.0, 0.0, 0.0), v(10.0, 2.0, 0.0)],
                vec![0, 1, 2],
                Material::new("default", [0.8; 3]),
            )],
        )
    }

    #[test]
    fn starts_rotating_with_controller_disabled() {
        let viewer = Viewer::new(ViewerConfig::default(), 800, 600);
        assert!(viewer.state.is_rotating);
        assert!(!viewer.controller.enabled);
        assert_eq!(viewer.camera.position, Point3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn rotation_only_advances_while_enabled() {
        let mut viewer = Viewer::new(ViewerConfig::default(), 800, 600);
        viewer.on_model_loaded(Ok(triangle_model()));
        viewer.tick();
        viewer.tick();
        let angle = viewer.scene.model().unwrap().transform.rotation.y.0;
        assert!((angle - 0.02).abs() < 1e-6);

        viewer.perform(Action::ToggleRotation);
        viewer.tick();
        let angle = viewer.scene.model().unwrap().transform.rotation.y.0;
        assert!((angle - 0.02).abs() < 1e-6);
    }

    #[test]
    fn failed_load_shows_banner_and_keeps_scene_empty() {
        let mut viewer = Viewer::new(ViewerConfig::default(), 800, 600);
        let loaded = viewer.on_model_loaded(Err(LoadError::Empty {
            file: "empty.obj".to_string(),
        }));
        assert!(!loaded);
        assert_eq!(viewer.scene.model_count(), 0);
        let banner = viewer.banner.current().unwrap();
        assert!(banner.message.starts_with("Error loading model:"));
    }

    #[test]
    fn reset_without_model_leaves_camera_alone() {
        let mut viewer = Viewer::new(ViewerConfig::default(), 800, 600);
        viewer.camera.position = Point3::new(1.0, 2.0, 3.0);
        viewer.perform(Action::ResetView);
        assert_eq!(viewer.camera.position, Point3::new(1.0, 2.0, 3.0));
    }

    fn centred_quad() -> Model {
        let v = |x: f32, y: f32| ModelVertex {
            position: [x, y, 0.0],
            normal: [0.0, 0.0, 1.0],
        };
        Model::new(
            "quad",
            vec![Mesh::new(
                "quad",
                vec![v(-1.0, -1.0), v(1.0, -1.0), v(1.0, 1.0), v(-1.0, 1.0)],
                vec![0, 1, 2, 0, 2, 3],
                Material::new("default", [0.8; 3]),
            )],
        )
    }

    #[test]
    fn hover_follows_spinning_model_under_still_pointer() {
        use winit::{dpi::PhysicalPosition, event::{DeviceId, WindowEvent}};

        let mut viewer = Viewer::new(ViewerConfig::default(), 800, 600);
        viewer.on_model_loaded(Ok(centred_quad()));
        viewer.interaction.handle_window_events(&WindowEvent::CursorMoved {
            device_id: unsafe { DeviceId::dummy() },
            position: PhysicalPosition::new(440.0, 300.0),
        });
        assert_eq!(viewer.tick(), vec![InteractionEvent::PointerOver { mesh: 0 }]);

        viewer.scene.model_mut().unwrap().transform.rotate_y(std::f32::consts::FRAC_PI_2);
        assert_eq!(viewer.tick(), vec![InteractionEvent::PointerOut { mesh: 0 }]);
    }

    #[test]
    fn loaded_model_is_registered_for_interaction() {
        let mut viewer = Viewer::new(ViewerConfig::default(), 800, 600);
        assert!(viewer.on_model_loaded(Ok(triangle_model())));
        assert_eq!(viewer.interaction.targets(), &[0]);
        assert_eq!(viewer.scene.model_count(), 1);
    }
}
