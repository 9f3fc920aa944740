//! Render pass composition.
//!
//! One pass per frame: clear, then every mesh of the loaded model with either
//! the solid or the wireframe pipeline depending on its material.

use crate::{
    context::Context,
    data_structures::scene::Scene,
    resources::gpu::GpuMesh,
};

pub trait DrawMesh {
    fn draw_mesh(
        &mut self,
        mesh: &GpuMesh,
        wireframe: bool,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    );
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(
        &mut self,
        mesh: &GpuMesh,
        wireframe: bool,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_bind_group(0, camera_bind_group, &[]);
        self.set_bind_group(1, light_bind_group, &[]);
        self.set_bind_group(2, &mesh.bind_group, &[]);
        if wireframe {
            self.set_index_buffer(mesh.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.draw_indexed(0..mesh.num_edges, 0, 0..1);
        } else {
            self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.draw_indexed(0..mesh.num_indices, 0, 0..1);
        }
    }
}

/// Record the scene into `color` and `depth`.
pub fn encode_scene(
    ctx: &Context,
    encoder: &mut wgpu::CommandEncoder,
    color: &wgpu::TextureView,
    depth: &wgpu::TextureView,
    scene: &Scene,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(ctx.clear_colour),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        ..Default::default()
    });

    let (Some(model), Some(gpu_model)) = (scene.model(), &ctx.gpu_model) else {
        return;
    };
    for (mesh, gpu_mesh) in model.meshes.iter().zip(&gpu_model.meshes) {
        let wireframe = mesh.material.wireframe;
        let count = if wireframe {
            gpu_mesh.num_edges
        } else {
            gpu_mesh.num_indices
        };
        if count == 0 {
            continue;
        }
        render_pass.set_pipeline(if wireframe {
            &ctx.pipelines.wireframe
        } else {
            &ctx.pipelines.solid
        });
        render_pass.draw_mesh(
            gpu_mesh,
            wireframe,
            &ctx.camera.bind_group,
            &ctx.light.bind_group,
        );
    }
}
