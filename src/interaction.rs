//! Pointer interaction with the loaded meshes.
//!
//! Meshes registered with [`InteractionManager::add`] become clickable. Hit
//! testing is done on the CPU: a ray is cast from the camera through the
//! cursor, transformed into model space and tested against each registered
//! mesh's bounding box, then against its triangles. The nearest hit wins.
//!
//! A click is a left press and release within [`CLICK_SLOP`] pixels, so an
//! orbit drag does not count as a click.

use cgmath::{InnerSpace, SquareMatrix, Transform as _};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, WindowEvent},
};

use crate::{
    camera::{Camera, Projection, Ray},
    data_structures::model::Model,
    viewport::Viewport,
};

/// Maximum pointer travel in pixels between press and release of a click.
pub const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionEvent {
    Click { mesh: usize, distance: f32 },
    PointerOver { mesh: usize },
    PointerOut { mesh: usize },
}

#[derive(Debug, Default)]
pub struct InteractionManager {
    targets: Vec<usize>,
    pointer: Option<PhysicalPosition<f64>>,
    pressed_at: Option<PhysicalPosition<f64>>,
    pending_click: bool,
    hovered: Option<usize>,
    dirty: bool,
}

impl InteractionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mesh at `mesh_index` of the scene's model.
    pub fn add(&mut self, mesh_index: usize) {
        if !self.targets.contains(&mesh_index) {
            self.targets.push(mesh_index);
        }
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.hovered = None;
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    #[cfg(test)]
    pub(crate) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Force a hit test on the next [`update`](Self::update), e.g. after the
    /// model or the camera moved under a still pointer.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = Some(*position);
                self.dirty = true;
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
                self.pressed_at = None;
                self.dirty = true;
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.pressed_at = self.pointer,
                ElementState::Released => {
                    if let (Some(down), Some(up)) = (self.pressed_at.take(), self.pointer) {
                        let (dx, dy) = (up.x - down.x, up.y - down.y);
                        if dx * dx + dy * dy <= CLICK_SLOP * CLICK_SLOP {
                            self.pending_click = true;
                            self.dirty = true;
                        }
                    }
                }
            },
            _ => (),
        }
    }

    /// Hit test the pointer against the registered meshes.
    ///
    /// Only runs when the pointer moved, clicked or [`invalidate`](Self::invalidate)
    /// was called since the last call.
    pub fn update(
        &mut self,
        model: Option<&Model>,
        camera: &Camera,
        projection: &Projection,
        viewport: &Viewport,
    ) -> Vec<InteractionEvent> {
        if !self.dirty {
            return Vec::new();
        }
        self.dirty = false;
        let click = std::mem::take(&mut self.pending_click);

        let hit = match (self.pointer, model) {
            (Some(pointer), Some(model)) if !viewport.is_empty() => {
                let ray = camera.cast_ray_from_mouse(
                    pointer,
                    viewport.width as f32,
                    viewport.height as f32,
                    projection,
                );
                self.hit_test(&ray, model)
            }
            _ => None,
        };

        let mut events = Vec::new();
        let hovered = hit.map(|(mesh, _)| mesh);
        if hovered != self.hovered {
            if let Some(mesh) = self.hovered {
                events.push(InteractionEvent::PointerOut { mesh });
            }
            if let Some(mesh) = hovered {
                events.push(InteractionEvent::PointerOver { mesh });
            }
            self.hovered = hovered;
        }
        if let (true, Some((mesh, distance))) = (click, hit) {
            events.push(InteractionEvent::Click { mesh, distance });
        }
        events
    }

    /// Nearest registered mesh hit by `ray`, with the hit distance.
    pub fn hit_test(&self, ray: &Ray, model: &Model) -> Option<(usize, f32)> {
        let to_local = model.transform.to_matrix().invert()?;
        let local = Ray {
            origin: to_local.transform_point(ray.origin),
            direction: to_local.transform_vector(ray.direction),
        };
        let mut nearest: Option<(usize, f32)> = None;
        for &idx in &self.targets {
            let Some(mesh) = model.meshes.get(idx) else {
                continue;
            };
            let Some(bounds) = mesh.bounds() else {
                continue;
            };
            if !local.hits_box(bounds.min, bounds.max) {
                continue;
            }
            for [a, b, c] in mesh.triangles() {
                if let Some(t) = local.intersect_triangle(a, b, c) {
                    if nearest.is_none_or(|(_, best)| t < best) {
                        nearest = Some((idx, t));
                    }
                }
            }
        }
        // Distances are measured in model space; report them in world space.
        let to_world = model.transform.to_matrix();
        nearest.map(|(idx, t)| {
            let world = to_world.transform_point(local.origin + local.direction * t);
            (idx, (world - ray.origin).magnitude())
        })
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::data_structures::model::{Material, Mesh, ModelVertex};

    fn quad(z: f32) -> Mesh {
        let v = |x: f32, y: f32| ModelVertex {
            position: [x, y, z],
            normal: [0.0, 0.0, 1.0],
        };
        Mesh::new(
            "quad",
            vec![v(-1.0, -1.0), v(1.0, -1.0), v(1.0, 1.0), v(-1.0, 1.0)],
            vec![0, 1, 2, 0, 2, 3],
            Material::new("default", [0.8; 3]),
        )
    }

    fn rig() -> (Camera, Projection, Viewport) {
        (
            Camera::new((0.0, 0.0, 5.0)),
            Projection::new(800, 600, cgmath::Deg(75.0), 0.1, 1000.0),
            Viewport::new(800, 600),
        )
    }

    fn move_to(manager: &mut InteractionManager, x: f64, y: f64) {
        manager.pointer = Some(PhysicalPosition::new(x, y));
        manager.dirty = true;
    }

    #[test]
    fn nearest_mesh_wins() {
        let model = Model::new("two", vec![quad(0.0), quad(1.0)]);
        let mut manager = InteractionManager::new();
        manager.add(0);
        manager.add(1);
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 5.0),
            direction: cgmath::Vector3::new(0.0, 0.0, -1.0),
        };
        let (mesh, distance) = manager.hit_test(&ray, &model).unwrap();
        assert_eq!(mesh, 1);
        assert!((distance - 4.0).abs() < 1e-4);
    }

    #[test]
    fn unregistered_meshes_are_ignored() {
        let model = Model::new("one", vec![quad(0.0)]);
        let manager = InteractionManager::new();
        let ray = Ray {
            origin: Point3::new(0.0, 0.0, 5.0),
            direction: cgmath::Vector3::new(0.0, 0.0, -1.0),
        };
        assert!(manager.hit_test(&ray, &model).is_none());
    }

    #[test]
    fn hover_then_click_on_model() {
        let model = Model::new("one", vec![quad(0.0)]);
        let (camera, projection, viewport) = rig();
        let mut manager = InteractionManager::new();
        manager.add(0);

        move_to(&mut manager, 400.0, 300.0);
        let events = manager.update(Some(&model), &camera, &projection, &viewport);
        assert_eq!(events, vec![InteractionEvent::PointerOver { mesh: 0 }]);

        manager.pressed_at = manager.pointer;
        manager.pending_click = true;
        manager.dirty = true;
        let events = manager.update(Some(&model), &camera, &projection, &viewport);
        assert!(matches!(events.as_slice(), [InteractionEvent::Click { mesh: 0, .. }]));

        move_to(&mut manager, 5.0, 5.0);
        let events = manager.update(Some(&model), &camera, &projection, &viewport);
        assert_eq!(events, vec![InteractionEvent::PointerOut { mesh: 0 }]);
    }

    #[test]
    fn idle_pointer_skips_hit_testing() {
        let model = Model::new("one", vec![quad(0.0)]);
        let (camera, projection, viewport) = rig();
        let mut manager = InteractionManager::new();
        manager.add(0);
        assert!(manager.update(Some(&model), &camera, &projection, &viewport).is_empty());
        assert_eq!(manager.hovered(), None);
    }

    #[test]
    fn invalidate_refreshes_hover_under_still_pointer() {
        let mut model = Model::new("one", vec![quad(0.0)]);
        let (camera, projection, viewport) = rig();
        let mut manager = InteractionManager::new();
        manager.add(0);

        move_to(&mut manager, 440.0, 300.0);
        manager.update(Some(&model), &camera, &projection, &viewport);
        assert_eq!(manager.hovered(), Some(0));

        // Edge-on to the camera, the quad no longer covers the pointer.
        model.transform.rotate_y(std::f32::consts::FRAC_PI_2);
        assert!(manager.update(Some(&model), &camera, &projection, &viewport).is_empty());
        assert_eq!(manager.hovered(), Some(0));

        manager.invalidate();
        let events = manager.update(Some(&model), &camera, &projection, &viewport);
        assert_eq!(events, vec![InteractionEvent::PointerOut { mesh: 0 }]);
        assert_eq!(manager.hovered(), None);
    }
}
