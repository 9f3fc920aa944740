//! GPU copies of the loaded model.

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::data_structures::model::{Mesh, Model};

/// Per-mesh uniform: model matrix, normal matrix and material colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl MeshUniform {
    pub fn new(model: &Model, mesh: &Mesh) -> Self {
        let [r, g, b] = mesh.material.color;
        Self {
            model: model.transform.to_matrix().into(),
            normal: Matrix4::from(model.transform.normal_matrix()).into(),
            color: [r, g, b, 1.0],
        }
    }
}

pub fn mesh_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
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
        label: Some("mesh_bind_group_layout"),
    })
}

#[derive(Debug)]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub edge_buffer: wgpu::Buffer,
    pub num_indices: u32,
    pub num_edges: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    fn new(
        device: &wgpu::Device,
        model: &Model,
        mesh: &Mesh,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Edge Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.edges),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Uniform Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&[MeshUniform::new(model, mesh)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("mesh_bind_group"),
        });
        Self {
            vertex_buffer,
            index_buffer,
            edge_buffer,
            num_indices: mesh.indices.len() as u32,
            num_edges: mesh.edges.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.edge_buffer.destroy();
        self.uniform_buffer.destroy();
    }
}

/// Buffers for every mesh of a [`Model`], in mesh order.
#[derive(Debug)]
pub struct GpuModel {
    pub meshes: Vec<GpuMesh>,
}

impl GpuModel {
    pub fn new(device: &wgpu::Device, model: &Model, layout: &wgpu::BindGroupLayout) -> Self {
        let meshes = model
            .meshes
            .iter()
            .map(|mesh| GpuMesh::new(device, model, mesh, layout))
            .collect();
        Self { meshes }
    }

    /// Upload the current transform and material colours.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, model: &Model) {
        for (gpu, mesh) in self.meshes.iter().zip(&model.meshes) {
            queue.write_buffer(
                &gpu.uniform_buffer,
                0,
                bytemuck::cast_slice(&[MeshUniform::new(model, mesh)]),
            );
        }
    }

    /// Release the GPU memory right away instead of waiting for the drop.
    pub fn destroy(self) {
        for mesh in &self.meshes {
            mesh.destroy();
        }
    }
}
