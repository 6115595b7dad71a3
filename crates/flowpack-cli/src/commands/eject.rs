use std::path::PathBuf;

pub fn eject() -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let dir = flowpack_build::eject_templates(&project_dir)?;

    println!("Ejected bundle templates to {}", dir.display());
    println!("You can now edit them directly. flowpack generate will use these files.");
    Ok(())
}
