use obj_viewer::ViewerConfig;

fn main() -> anyhow::Result<()> {
    let mut config = ViewerConfig::default();
    if let Some(file) = std::env::args().nth(1) {
        config.model_file = file;
    }
    obj_viewer::run(config)
}
