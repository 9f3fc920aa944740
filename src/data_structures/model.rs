//! Loaded model: meshes, materials and bounds.
//!
//! Everything here is plain CPU data. GPU buffers for a model are created
//! separately by [`crate::resources::gpu::GpuModel`].

use std::collections::HashSet;

use cgmath::{Point3, Transform as _};

use crate::data_structures::transform::Transform;

/// Describes how a vertex type is laid out in a vertex buffer.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn from_points<I: IntoIterator<Item = Point3<f32>>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in points {
            aabb.include(p);
        }
        Some(aabb)
    }

    pub fn include(&mut self, p: Point3<f32>) {
        self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: [f32; 3],
    /// Draw only the edges of the mesh.
    pub wireframe: bool,
}

impl Material {
    pub fn new(name: &str, color: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            color,
            wireframe: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    /// Triangle list.
    pub indices: Vec<u32>,
    /// Line list of the unique triangle edges, used in wireframe mode.
    pub edges: Vec<u32>,
    pub material: Material,
}

impl Mesh {
    pub fn new(
        name: &str,
        vertices: Vec<ModelVertex>,
        indices: Vec<u32>,
        material: Material,
    ) -> Self {
        let edges = edge_list(&indices);
        Self {
            name: name.to_string(),
            vertices,
            indices,
            edges,
            material,
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| Point3::from(v.position)))
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| {
            [
                Point3::from(self.vertices[c[0] as usize].position),
                Point3::from(self.vertices[c[1] as usize].position),
                Point3::from(self.vertices[c[2] as usize].position),
            ]
        })
    }
}

/// Unique undirected edges of a triangle list, in first-seen order.
pub fn edge_list(indices: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if seen.insert((a.min(b), a.max(b))) {
                edges.push(a);
                edges.push(b);
            }
        }
    }
    edges
}

/// The loaded model: a transform and the meshes it moves.
#[derive(Clone, Debug)]
pub struct Model {
    pub name: String,
    pub transform: Transform,
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn new(name: &str, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::new(),
            meshes,
        }
    }

    /// Bounds in model space, ignoring the transform.
    pub fn local_bounds(&self) -> Option<Aabb> {
        self.meshes
            .iter()
            .filter_map(Mesh::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Bounds of the transformed geometry.
    pub fn world_bounds(&self) -> Option<Aabb> {
        let matrix = self.transform.to_matrix();
        Aabb::from_points(self.meshes.iter().flat_map(|mesh| {
            mesh.vertices
                .iter()
                .map(move |v| matrix.transform_point(Point3::from(v.position)))
        }))
    }

    /// Move the model so that the centre of its bounding box sits at the origin.
    pub fn center_at_origin(&mut self) {
        if let Some(bounds) = self.local_bounds() {
            let center = bounds.center();
            self.transform.pivot = cgmath::Vector3::new(center.x, center.y, center.z);
            self.transform.position = cgmath::Vector3::new(0.0, 0.0, 0.0);
        }
    }

    pub fn toggle_wireframe(&mut self) {
        for mesh in &mut self.meshes {
            mesh.material.wireframe = !mesh.material.wireframe;
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> ModelVertex {
        ModelVertex {
            position: [x, y, z],
            normal: [0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn quad_has_five_unique_edges() {
        let edges = edge_list(&[0, 1, 2, 2, 1, 3]);
        assert_eq!(edges.len(), 10);
    }

    #[test]
    fn centring_moves_box_centre_to_origin() {
        let mesh = Mesh::new(
            "offset",
            vec![vertex(10.0, 2.0, -4.0), vertex(12.0, 6.0, -4.0), vertex(11.0, 4.0, 0.0)],
            vec![0, 1, 2],
            Material::new("default", [0.8; 3]),
        );
        let mut model = Model::new("offset", vec![mesh]);
        model.center_at_origin();
        let center = model.world_bounds().unwrap().center();
        assert!(center.x.abs() < 1e-5 && center.y.abs() < 1e-5 && center.z.abs() < 1e-5);
    }
}
