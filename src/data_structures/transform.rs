//! Model transform.
//!
//! Position, Euler rotation and scale of a model, applied around a pivot
//! point in model space so that a centred model spins in place.

use cgmath::{Euler, Matrix3, Matrix4, Quaternion, Rad, Vector3, Zero};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// XYZ Euler angles.
    pub rotation: Euler<Rad<f32>>,
    pub scale: Vector3<f32>,
    /// Model-space point that ends up at `position`.
    pub pivot: Vector3<f32>,
}

impl Transform {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            scale: Vector3::new(1.0, 1.0, 1.0),
            pivot: Vector3::zero(),
        }
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation.y += Rad(angle);
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(Quaternion::from(self.rotation))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
            * Matrix4::from_translation(-self.pivot)
    }

    /// Normals only need the rotation as long as the scale stays uniform.
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        Matrix3::from(Quaternion::from(self.rotation))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Point3, Transform as _};

    use super::*;

    #[test]
    fn pivot_lands_on_position() {
        let mut transform = Transform::new();
        transform.pivot = Vector3::new(1.0, 2.0, 3.0);
        transform.rotate_y(1.3);
        let p = transform
            .to_matrix()
            .transform_point(Point3::new(1.0, 2.0, 3.0));
        assert!((p - Point3::new(0.0, 0.0, 0.0)).magnitude() < 1e-5);
    }
}
