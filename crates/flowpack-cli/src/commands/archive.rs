use std::path::Path;

pub fn archive(bundle_dir: &Path) -> anyhow::Result<()> {
    let archive = flowpack_build::create_archive(bundle_dir)?;
    println!("Archive: {}", archive.display());
    Ok(())
}
