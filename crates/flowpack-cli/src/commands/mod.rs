mod archive;
mod build;
mod deploy;
mod deploy_pipeline;
mod doctor;
mod eject;
mod generate;
mod port;
mod run;

use flowpack_build::{TemplateStore, ejected_template_dir};
use flowpack_container::ContainerClient;
use flowpack_core::FlowpackConfig;
use std::path::Path;

pub use archive::archive;
pub use build::build;
pub use deploy::deploy;
pub use doctor::doctor;
pub use eject::eject;
pub use generate::generate;
pub use port::port;
pub use run::run;

/// Template set for this project: `[bundle].template_dir`, else ejected
/// templates, else the embedded set.
pub(crate) fn template_store(
    project_dir: &Path,
    config: &FlowpackConfig,
) -> anyhow::Result<TemplateStore> {
    let override_dir = config
        .bundle
        .template_dir
        .as_ref()
        .map(|dir| project_dir.join(dir))
        .or_else(|| ejected_template_dir(project_dir));

    match override_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "using template overrides");
            Ok(TemplateStore::with_override_dir(&dir)?)
        }
        None => Ok(TemplateStore::embedded()),
    }
}

pub(crate) fn container_client(config: &FlowpackConfig) -> ContainerClient {
    ContainerClient::new(&config.container.runtime)
}

/// Print `value` as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
