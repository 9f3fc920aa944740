use obj_viewer::{
    Viewer, ViewerConfig,
    data_structures::model::Model,
    resources::parse_obj,
};

/// Two triangles forming a 2x2 quad in the z = 0 plane, offset along x.
pub const OFFSET_QUAD: &str = "\
o quad
v 9 -1 0
v 11 -1 0
v 11 1 0
v 9 1 0
f 1 2 3
f 1 3 4
";

/// Parse `source` on a throwaway tokio runtime; material libraries are read
/// with `tokio::fs`.
pub fn parse(source: &str) -> Model {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
        .block_on(parse_obj("test.obj", source.as_bytes(), [0.8; 3]))
        .expect("fixture should parse")
}

pub fn viewer() -> Viewer {
    Viewer::new(ViewerConfig::default(), 800, 600)
}

/// A viewer with [`OFFSET_QUAD`] loaded.
pub fn loaded_viewer() -> Viewer {
    let mut viewer = viewer();
    assert!(viewer.on_model_loaded(Ok(parse(OFFSET_QUAD))));
    viewer
}
