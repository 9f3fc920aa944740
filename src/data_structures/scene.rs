//! Scene graph.
//!
//! The scene is deliberately flat: two lights and a slot for the single
//! loaded [`Model`], whose meshes form the only subtree.

use crate::{config::ViewerConfig, data_structures::model::Model};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// A light shining from `position` towards the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
}

#[derive(Debug)]
pub struct Scene {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    model: Option<Model>,
}

impl Scene {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            ambient: AmbientLight {
                color: config.ambient.color,
                intensity: config.ambient.intensity,
            },
            directional: DirectionalLight {
                color: config.directional.color,
                intensity: config.directional.intensity,
                position: config.directional_position,
            },
            model: None,
        }
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    pub fn model_count(&self) -> usize {
        usize::from(self.model.is_some())
    }

    /// Attach `model`, detaching and returning the previously attached one.
    ///
    /// The scene never holds more than one model.
    pub fn attach(&mut self, model: Model) -> Option<Model> {
        let previous = self.model.replace(model);
        if let Some(previous) = &previous {
            log::warn!("Replacing previously loaded model {}", previous.name);
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_replaces_instead_of_stacking() {
        let mut scene = Scene::new(&ViewerConfig::default());
        assert_eq!(scene.model_count(), 0);
        assert!(scene.attach(Model::new("first", Vec::new())).is_none());
        let previous = scene.attach(Model::new("second", Vec::new()));
        assert_eq!(previous.map(|m| m.name), Some("first".to_string()));
        assert_eq!(scene.model_count(), 1);
        assert_eq!(scene.model().map(|m| m.name.as_str()), Some("second"));
    }

    #[test]
    fn lights_follow_configuration() {
        let scene = Scene::new(&ViewerConfig::default());
        assert_eq!(scene.ambient.intensity, 0.5);
        assert_eq!(scene.directional.intensity, 1.0);
        assert_eq!(scene.directional.position, [1.0, 1.0, 1.0]);
    }
}
