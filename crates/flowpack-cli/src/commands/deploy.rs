use std::path::{Path, PathBuf};

/// Generate, build, and run a flow, printing each step.
pub async fn deploy(flow_path: &Path, out: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let outcome = super::deploy_pipeline::run(&project_dir, flow_path, out).await?;

    if json {
        super::print_json(&outcome)?;
    } else {
        for step in &outcome.steps {
            println!("  {step}");
        }
        if let Some(info) = outcome.run.as_ref().and_then(|r| r.info.as_ref()) {
            println!();
            println!("Running: {}", info.url);
        }
    }

    if let Some(message) = outcome.failure() {
        anyhow::bail!("{message}");
    }
    Ok(())
}
