use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::scene::Scene;

/// Ambient and directional light, premultiplied by intensity.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    ambient: [f32; 4],
    color: [f32; 4],
    // Normalised direction towards the light, w is padding.
    direction: [f32; 4],
}

impl LightUniform {
    pub fn from_scene(scene: &Scene) -> Self {
        let scaled = |c: [f32; 3], i: f32| [c[0] * i, c[1] * i, c[2] * i, 1.0];
        let position = Vector3::from(scene.directional.position);
        let direction = if position.magnitude2() > 0.0 {
            position.normalize()
        } else {
            Vector3::unit_z()
        };
        Self {
            ambient: scaled(scene.ambient.color, scene.ambient.intensity),
            color: scaled(scene.directional.color, scene.directional.intensity),
            direction: [direction.x, direction.y, direction.z, 0.0],
        }
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Upload the lights when they changed since the last call.
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let uniform = LightUniform::from_scene(scene);
        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;

    #[test]
    fn default_lights_are_premultiplied() {
        let uniform = LightUniform::from_scene(&Scene::new(&ViewerConfig::default()));
        assert_eq!(uniform.ambient, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(uniform.color, [1.0, 1.0, 1.0, 1.0]);
        let d = 1.0 / 3f32.sqrt();
        for c in &uniform.direction[..3] {
            assert!((c - d).abs() < 1e-6);
        }
    }
}
