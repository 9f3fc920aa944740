//! Render pipelines.
//!
//! - `light`: light uniform and its bind group
//! - `mesh`: the solid and wireframe mesh pipelines

pub mod light;
pub mod mesh;

use crate::resources::gpu::mesh_bind_group_layout;

#[derive(Debug)]
pub struct Pipelines {
    pub solid: wgpu::RenderPipeline,
    pub wireframe: wgpu::RenderPipeline,
    pub mesh_bind_group_layout: wgpu::BindGroupLayout,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let mesh_bind_group_layout = mesh_bind_group_layout(device);
        let (solid, wireframe) = mesh::mk_mesh_pipelines(
            device,
            color_format,
            camera_bind_group_layout,
            light_bind_group_layout,
            &mesh_bind_group_layout,
        );
        Self {
            solid,
            wireframe,
            mesh_bind_group_layout,
        }
    }
}
