use flowpack_build::{BundleGenerator, create_archive};
use flowpack_core::{Flow, FlowpackConfig};
use std::path::{Path, PathBuf};

pub fn generate(flow_path: &Path, out: Option<PathBuf>, zip: bool) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = FlowpackConfig::load(&project_dir)?;
    let store = super::template_store(&project_dir, &config)?;

    let flow = Flow::from_json_file(flow_path)?;
    let output_root = out.unwrap_or(config.bundle.output_dir);

    let bundle_dir = BundleGenerator::new(&store).generate(&flow, &output_root)?;
    println!("Generated bundle: {}", bundle_dir.display());

    if zip {
        let archive = create_archive(&bundle_dir)?;
        println!("Archive: {}", archive.display());
    }

    Ok(())
}
