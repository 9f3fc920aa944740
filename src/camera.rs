//! Camera rig: perspective camera, projection and a damped orbit controller.
//!
//! The controller follows the usual orbit-control scheme: left drag orbits
//! around the target, the wheel zooms, right drag pans (off by default).
//! Input only accumulates deltas; [`OrbitController::update`] applies a
//! damped fraction of them to the camera once per frame.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, Zero};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

/// wgpu's clip space has z in `[0, 1]` whereas cgmath produces OpenGL style `[-1, 1]`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const EPS: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
        }
    }

    pub fn look_at<P: Into<Point3<f32>>>(&mut self, target: P) {
        self.target = target.into();
    }

    pub fn forward(&self) -> Vector3<f32> {
        let dir = self.target - self.position;
        if dir.magnitude2() < EPS {
            -Vector3::unit_z()
        } else {
            dir.normalize()
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Cast a ray from the camera through a pixel of a `width` x `height` surface.
    pub fn cast_ray_from_mouse(
        &self,
        mouse: PhysicalPosition<f64>,
        width: f32,
        height: f32,
        projection: &Projection,
    ) -> Ray {
        let ndc_x = (2.0 * mouse.x as f32 / width) - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse.y as f32 / height);
        let half_height = (projection.fovy.0 / 2.0).tan();
        let half_width = half_height * projection.aspect;

        let forward = self.forward();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        let direction =
            (forward + right * (ndc_x * half_width) + up * (ndc_y * half_height)).normalize();
        Ray {
            origin: self.position,
            direction,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Distance along the ray to the triangle `(a, b, c)` (Möller–Trumbore), if hit.
    pub fn intersect_triangle(
        &self,
        a: Point3<f32>,
        b: Point3<f32>,
        c: Point3<f32>,
    ) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPS {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(q) * inv_det;
        (t > EPS).then_some(t)
    }

    /// Slab test against an axis-aligned box.
    pub fn hits_box(&self, min: Point3<f32>, max: Point3<f32>) -> bool {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            if dir.abs() < EPS {
                if origin < min[axis] || origin > max[axis] {
                    return false;
                }
                continue;
            }
            let t1 = (min[axis] - origin) / dir;
            let t2 = (max[axis] - origin) / dir;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }
        t_max >= t_min.max(0.0)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Camera offset from the target in spherical coordinates (y is up).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    /// Azimuth around the y axis, measured from +z.
    theta: f32,
    /// Polar angle from +y.
    phi: f32,
}

impl Spherical {
    fn from_vector(v: Vector3<f32>) -> Self {
        let radius = v.magnitude();
        if radius < EPS {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_vector(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Drag {
    None,
    Rotate,
    Pan,
}

/// Damped orbit/zoom/pan controller for a [`Camera`].
#[derive(Debug)]
pub struct OrbitController {
    /// Input is ignored while disabled. Damping still settles on `update`.
    pub enabled: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    delta: Spherical,
    scale: f32,
    pan_offset: Vector3<f32>,
    saved: Option<(Point3<f32>, Point3<f32>)>,
    drag: Drag,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl OrbitController {
    pub fn new(damping_factor: f32, min_distance: f32, max_distance: f32) -> Self {
        Self {
            enabled: true,
            enable_damping: true,
            damping_factor,
            min_distance,
            max_distance,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            enable_pan: false,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vector3::zero(),
            saved: None,
            drag: Drag::None,
            last_cursor: None,
        }
    }

    /// Remember the camera pose that [`reset`](Self::reset) returns to.
    pub fn save_state(&mut self, camera: &Camera) {
        self.saved = Some((camera.position, camera.target));
    }

    /// Snap the camera back to the saved pose and drop all pending motion.
    pub fn reset(&mut self, camera: &mut Camera) {
        if let Some((position, target)) = self.saved {
            camera.position = position;
            camera.target = target;
        }
        self.delta = Spherical::default();
        self.pan_offset = Vector3::zero();
        self.scale = 1.0;
        self.drag = Drag::None;
    }

    /// True once all pending input has been applied.
    #[cfg(test)]
    pub(crate) fn is_settled(&self) -> bool {
        self.delta.theta.abs() < EPS
            && self.delta.phi.abs() < EPS
            && self.pan_offset.magnitude2() < EPS
            && (self.scale - 1.0).abs() < EPS
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    pub fn zoom_in(&mut self) {
        self.scale *= self.zoom_scale();
    }

    pub fn zoom_out(&mut self) {
        self.scale /= self.zoom_scale();
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    /// Accumulate a drag of `(dx, dy)` pixels on a surface `height` pixels tall.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64, height: u32) {
        if !self.enabled {
            return;
        }
        let height = height.max(1) as f32;
        self.rotate_left(2.0 * PI * dx as f32 / height * self.rotate_speed);
        self.rotate_up(2.0 * PI * dy as f32 / height * self.rotate_speed);
    }

    pub fn handle_scroll(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        if delta > 0.0 {
            self.zoom_in();
        } else if delta < 0.0 {
            self.zoom_out();
        }
    }

    fn handle_pan(
        &mut self,
        dx: f64,
        dy: f64,
        camera: &Camera,
        projection: &Projection,
        height: u32,
    ) {
        if !self.enabled || !self.enable_pan {
            return;
        }
        let distance =
            (camera.position - camera.target).magnitude() * (projection.fovy.0 / 2.0).tan();
        let height = height.max(1) as f32;
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize();
        // Pan parallel to the ground plane.
        let ahead = camera.up.cross(right).normalize();
        self.pan_offset -= right * (2.0 * dx as f32 * distance / height * self.pan_speed);
        self.pan_offset += ahead * (2.0 * dy as f32 * distance / height * self.pan_speed);
    }

    pub fn handle_window_events(
        &mut self,
        event: &WindowEvent,
        camera: &Camera,
        projection: &Projection,
        height: u32,
    ) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.drag = match (state, button) {
                    (ElementState::Pressed, MouseButton::Left) if self.enabled => Drag::Rotate,
                    (ElementState::Pressed, MouseButton::Right) if self.enabled => Drag::Pan,
                    (ElementState::Released, _) => Drag::None,
                    _ => self.drag,
                };
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.last_cursor {
                    let (dx, dy) = (position.x - last.x, position.y - last.y);
                    match self.drag {
                        Drag::Rotate => self.handle_mouse(dx, dy, height),
                        Drag::Pan => self.handle_pan(dx, dy, camera, projection, height),
                        Drag::None => (),
                    }
                }
                self.last_cursor = Some(*position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
                self.drag = Drag::None;
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.handle_scroll(*y),
                MouseScrollDelta::PixelDelta(pos) => self.handle_scroll(pos.y as f32),
            },
            _ => (),
        }
    }

    /// Apply one damped step of the accumulated input to `camera`.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - camera.target;
        let mut spherical = Spherical::from_vector(offset);

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.delta.theta * factor;
        spherical.phi += self.delta.phi * factor;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.target += self.pan_offset * factor;
        camera.position = camera.target + spherical.to_vector();

        if self.enable_damping {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta = Spherical::default();
            self.pan_offset = Vector3::zero();
        }
        self.scale = 1.0;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform data, its buffer and bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn rig() -> (Camera, OrbitController) {
        let camera = Camera::new((0.0, 0.0, 5.0));
        let mut controller = OrbitController::new(0.05, 1.0, 50.0);
        controller.save_state(&camera);
        (camera, controller)
    }

    #[test]
    fn spherical_round_trip_keeps_offset() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let back = Spherical::from_vector(v).to_vector();
        assert!((back - v).magnitude() < 1e-4);
    }

    #[test]
    fn damped_orbit_converges_to_full_delta() {
        let (mut camera, mut controller) = rig();
        controller.rotate_left(PI / 2.0);
        controller.update(&mut camera);
        // Only a damped fraction is applied on the first frame.
        assert!(camera.position.x.abs() < 1.0);
        for _ in 0..2000 {
            controller.update(&mut camera);
        }
        assert!(controller.is_settled());
        assert!(approx(camera.position.x, -5.0));
        assert!(approx(camera.position.z, 0.0));
    }

    #[test]
    fn zoom_is_clamped_to_distance_bounds() {
        let (mut camera, mut controller) = rig();
        for _ in 0..200 {
            controller.zoom_out();
            controller.update(&mut camera);
        }
        assert!(approx((camera.position - camera.target).magnitude(), 50.0));
        for _ in 0..400 {
            controller.zoom_in();
            controller.update(&mut camera);
        }
        assert!(approx((camera.position - camera.target).magnitude(), 1.0));
    }

    #[test]
    fn disabled_controller_ignores_input() {
        let (mut camera, mut controller) = rig();
        controller.enabled = false;
        controller.handle_mouse(100.0, 40.0, 600);
        controller.handle_scroll(1.0);
        controller.update(&mut camera);
        assert!(approx(camera.position.z, 5.0));
        assert!(controller.is_settled());
    }

    #[test]
    fn pan_is_ignored_when_disabled_by_configuration() {
        let (mut camera, mut controller) = rig();
        let projection = Projection::new(800, 600, cgmath::Deg(75.0), 0.1, 1000.0);
        controller.handle_pan(50.0, 50.0, &camera, &projection, 600);
        controller.update(&mut camera);
        assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn reset_restores_saved_pose_and_clears_motion() {
        let (mut camera, mut controller) = rig();
        controller.handle_mouse(300.0, -120.0, 600);
        controller.zoom_out();
        controller.update(&mut camera);
        assert!(!controller.is_settled());
        controller.reset(&mut camera);
        assert!(controller.is_settled());
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));
        controller.update(&mut camera);
        assert!(approx(camera.position.z, 5.0));
    }

    #[test]
    fn projection_resize_sets_aspect() {
        let mut projection = Projection::new(100, 100, cgmath::Deg(75.0), 0.1, 1000.0);
        projection.resize(1920, 1080);
        assert!(approx(projection.aspect, 1920.0 / 1080.0));
    }

    #[test]
    fn centre_ray_points_at_target() {
        let camera = Camera::new((0.0, 0.0, 5.0));
        let projection = Projection::new(800, 600, cgmath::Deg(75.0), 0.1, 1000.0);
        let ray = camera.cast_ray_from_mouse((400.0, 300.0).into(), 800.0, 600.0, &projection);
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-4);
        let t = ray.intersect_triangle(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(approx(t.unwrap(), 5.0));
        assert!(ray.hits_box(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)));
    }
}
