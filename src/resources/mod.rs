use std::io::{BufReader, Cursor};

use crate::{data_structures::model::Model, error::LoadError};

pub use fetch::{LoadProgress, load_binary};

/**
 * This module contains all logic for loading the model from external files
 * and turning it into GPU resources.
 */
pub mod fetch;
pub mod gpu;
pub mod mesh;

/// Load and parse an OBJ file.
///
/// Natively the file is read from `./assets`, on the web it is fetched relative
/// to the page origin. `on_progress` is called after every received chunk.
pub async fn load_model_obj(
    file_name: &str,
    default_color: [f32; 3],
    mut on_progress: impl FnMut(LoadProgress),
) -> Result<Model, LoadError> {
    let data = load_binary(file_name, &mut on_progress).await?;
    parse_obj(file_name, &data, default_color).await
}

/// Parse OBJ bytes into a [`Model`].
///
/// Faces are triangulated. A `mtllib` that cannot be loaded is not fatal: the
/// meshes fall back to `default_color`.
///
/// Material libraries are read through [`load_binary`], so natively this must
/// be polled inside a tokio runtime.
pub async fn parse_obj(
    file_name: &str,
    data: &[u8],
    default_color: [f32; 3],
) -> Result<Model, LoadError> {
    let base_dir = match file_name.rfind('/') {
        Some(idx) => file_name[..=idx].to_string(),
        None => String::new(),
    };
    let mut obj_reader = BufReader::new(Cursor::new(data));
    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| {
            let path = format!("{}{}", base_dir, p);
            async move {
                match load_binary(&path, &mut |_: LoadProgress| {}).await {
                    Ok(mtl) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mtl))),
                    Err(e) => {
                        log::warn!("Material library unavailable, using default material: {}", e);
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        },
    )
    .await
    .map_err(|source| LoadError::Parse {
        file: file_name.to_string(),
        source,
    })?;

    let materials = obj_materials.unwrap_or_else(|e| {
        log::warn!("Could not load materials for {}: {}", file_name, e);
        Vec::new()
    });
    let meshes = mesh::load_meshes(&models, &materials, file_name, default_color);
    let model = Model::new(file_name, meshes);
    if model.triangle_count() == 0 {
        return Err(LoadError::Empty {
            file: file_name.to_string(),
        });
    }
    log::info!(
        "Parsed {}: {} meshes, {} triangles",
        file_name,
        model.meshes.len(),
        model.triangle_count()
    );
    Ok(model)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    const TRIANGLE: &str = "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[tokio::test]
    async fn parses_triangle_with_default_material() {
        let model = parse_obj("tri.obj", TRIANGLE.as_bytes(), [0.5; 3]).await.unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.triangle_count(), 1);
        assert_eq!(model.meshes[0].material.color, [0.5; 3]);
        assert_eq!(model.meshes[0].vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[tokio::test]
    async fn quads_are_triangulated() {
        let quad = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let model = parse_obj("quad.obj", quad.as_bytes(), [0.8; 3]).await.unwrap();
        assert_eq!(model.triangle_count(), 2);
    }

    #[tokio::test]
    async fn file_without_faces_is_rejected() {
        let err = parse_obj("points.obj", b"v 0 0 0\n", [0.8; 3]).await.unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
    }
}
