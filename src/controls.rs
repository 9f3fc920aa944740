//! User actions: the four header buttons and their keyboard shortcuts.
//!
//! The handlers take exactly the state they touch. Screenshots need the GPU
//! and are handled by the application loop instead.

use cgmath::Point3;
use winit::keyboard::{Key, NamedKey};

use crate::{
    camera::{Camera, OrbitController},
    data_structures::scene::Scene,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    ResetView,
    ToggleWireframe,
    ToggleRotation,
    Screenshot,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::ResetView,
        Action::ToggleWireframe,
        Action::ToggleRotation,
        Action::Screenshot,
    ];

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Action::ResetView => "Reset View",
            Action::ToggleWireframe => "Toggle Wireframe",
            Action::ToggleRotation => "Toggle Rotation",
            Action::Screenshot => "Screenshot",
        }
    }

    /// DOM id of the button.
    pub fn element_id(self) -> &'static str {
        match self {
            Action::ResetView => "reset-view",
            Action::ToggleWireframe => "toggle-wireframe",
            Action::ToggleRotation => "toggle-rotation",
            Action::Screenshot => "screenshot",
        }
    }

    /// Native shortcut: R, W, Space and P.
    pub fn from_key(key: &Key) -> Option<Action> {
        match key {
            Key::Named(NamedKey::Space) => Some(Action::ToggleRotation),
            Key::Character(c) => match c.to_lowercase().as_str() {
                "r" => Some(Action::ResetView),
                "w" => Some(Action::ToggleWireframe),
                "p" => Some(Action::Screenshot),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Put the camera back at `home`, looking at the origin, and drop any pending
/// controller motion.
pub fn reset_view(camera: &mut Camera, controller: &mut OrbitController, home: Point3<f32>) {
    controller.reset(camera);
    camera.position = home;
    camera.look_at(Point3::new(0.0, 0.0, 0.0));
    controller.save_state(camera);
}

/// Flip the wireframe flag of every mesh. Returns `false` when no model is loaded.
pub fn toggle_wireframe(scene: &mut Scene) -> bool {
    match scene.model_mut() {
        Some(model) => {
            model.toggle_wireframe();
            true
        }
        None => false,
    }
}

/// Flip auto-rotation. Manual orbiting is only possible while not rotating.
pub fn toggle_rotation(is_rotating: &mut bool, controller: &mut OrbitController) {
    *is_rotating = !*is_rotating;
    controller.enabled = !*is_rotating;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(Action::from_key(&Key::Character("r".into())), Some(Action::ResetView));
        assert_eq!(Action::from_key(&Key::Character("W".into())), Some(Action::ToggleWireframe));
        assert_eq!(
            Action::from_key(&Key::Named(NamedKey::Space)),
            Some(Action::ToggleRotation)
        );
        assert_eq!(Action::from_key(&Key::Character("p".into())), Some(Action::Screenshot));
        assert_eq!(Action::from_key(&Key::Character("x".into())), None);
    }

    #[test]
    fn rotation_and_controller_stay_complementary() {
        let mut is_rotating = true;
        let mut controller = OrbitController::new(0.05, 1.0, 50.0);
        controller.enabled = false;
        for _ in 0..3 {
            toggle_rotation(&mut is_rotating, &mut controller);
            assert_eq!(controller.enabled, !is_rotating);
        }
    }

    #[test]
    fn wireframe_without_model_is_a_no_op() {
        let mut scene = Scene::new(&ViewerConfig::default());
        assert!(!toggle_wireframe(&mut scene));
    }

    #[test]
    fn reset_returns_home() {
        let mut camera = Camera::new((3.0, 4.0, 2.0));
        camera.look_at((1.0, 1.0, 1.0));
        let mut controller = OrbitController::new(0.05, 1.0, 50.0);
        controller.rotate_left(1.0);
        reset_view(&mut camera, &mut controller, Point3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
        controller.update(&mut camera);
        assert!((camera.position.z - 5.0).abs() < 1e-4);
    }
}
