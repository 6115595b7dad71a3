use flowpack_build::bundle::BUNDLE_SUFFIX;
use flowpack_core::FlowpackConfig;
use std::path::{Path, PathBuf};

pub async fn build(bundle_dir: &Path, image: Option<String>, json: bool) -> anyhow::Result<()> {
    let config = FlowpackConfig::load(&PathBuf::from("."))?;
    let image = match image {
        Some(image) => image,
        None => default_image_name(bundle_dir)?,
    };

    let result = super::container_client(&config)
        .build(bundle_dir, &image)
        .await;

    if json {
        super::print_json(&result)?;
    } else if result.success {
        println!("{}", result.message);
    }

    if !result.success {
        anyhow::bail!("{}", result.message);
    }
    Ok(())
}

/// `support_bot_flow_app` → `support_bot`.
fn default_image_name(bundle_dir: &Path) -> anyhow::Result<String> {
    let dir_name = bundle_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "cannot derive an image name from {}; pass --image",
                bundle_dir.display()
            )
        })?;
    Ok(dir_name
        .strip_suffix(BUNDLE_SUFFIX)
        .unwrap_or(dir_name)
        .to_owned())
}
