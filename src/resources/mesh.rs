use cgmath::{InnerSpace, Vector3, Zero};

use crate::data_structures::model::{Material, Mesh, ModelVertex};

/// Convert parsed OBJ models into meshes.
///
/// Meshes without triangles are skipped. Materials come from the MTL file
/// when it could be loaded; otherwise every mesh gets `default_color`.
pub fn load_meshes(
    models: &[tobj::Model],
    materials: &[tobj::Material],
    file_name: &str,
    default_color: [f32; 3],
) -> Vec<Mesh> {
    models
        .iter()
        .enumerate()
        .filter_map(|(idx, m)| {
            if m.mesh.indices.len() < 3 {
                log::warn!(
                    "Mesh {} ({}) in {} has no faces and is skipped.",
                    idx,
                    m.name,
                    file_name
                );
                return None;
            }
            let mut vertices = (0..m.mesh.positions.len() / 3)
                .map(|i| ModelVertex {
                    position: [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ],
                    normal: [
                        m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                })
                .collect::<Vec<_>>();

            if m.mesh.normals.len() != m.mesh.positions.len() {
                compute_normals(&mut vertices, &m.mesh.indices);
            }

            let material = m
                .mesh
                .material_id
                .and_then(|id| materials.get(id))
                .map(|mat| Material::new(&mat.name, mat.diffuse.unwrap_or(default_color)))
                .unwrap_or_else(|| Material::new("default", default_color));

            let name = if m.name.is_empty() {
                format!("{}#{}", file_name, idx)
            } else {
                m.name.clone()
            };
            Some(Mesh::new(&name, vertices, m.mesh.indices.clone(), material))
        })
        .collect()
}

/// Smooth vertex normals, weighted by triangle area.
///
/// The face normal is accumulated unnormalised into each corner, so larger
/// faces pull harder. Vertices not referenced by any face keep a zero normal.
pub fn compute_normals(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut normals = vec![Vector3::<f32>::zero(); vertices.len()];
    for c in indices.chunks_exact(3) {
        let pos0: Vector3<_> = vertices[c[0] as usize].position.into();
        let pos1: Vector3<_> = vertices[c[1] as usize].position.into();
        let pos2: Vector3<_> = vertices[c[2] as usize].position.into();
        let face = (pos1 - pos0).cross(pos2 - pos0);
        normals[c[0] as usize] += face;
        normals[c[1] as usize] += face;
        normals[c[2] as usize] += face;
    }
    for (vertex, normal) in vertices.iter_mut().zip(normals) {
        vertex.normal = if normal.magnitude2() > 0.0 {
            normal.normalize().into()
        } else {
            [0.0; 3]
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_triangle_normal_faces_viewer() {
        let mut vertices = vec![
            ModelVertex {
                position: [0.0, 0.0, 0.0],
                normal: [0.0; 3],
            },
            ModelVertex {
                position: [1.0, 0.0, 0.0],
                normal: [0.0; 3],
            },
            ModelVertex {
                position: [0.0, 1.0, 0.0],
                normal: [0.0; 3],
            },
        ];
        compute_normals(&mut vertices, &[0, 1, 2]);
        for v in &vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }
}
