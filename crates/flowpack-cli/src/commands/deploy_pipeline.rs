use flowpack_build::BundleGenerator;
use flowpack_container::{BuildResult, RunResult, find_available_port};
use flowpack_core::{Flow, FlowpackConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Record of a deploy pipeline run.
#[derive(Debug, Serialize)]
pub(crate) struct DeployOutcome {
    pub steps: Vec<String>,
    pub bundle: PathBuf,
    pub build: BuildResult,
    /// Absent when the build failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunResult>,
}

impl DeployOutcome {
    /// Message of the first failed stage, if any.
    pub fn failure(&self) -> Option<&str> {
        if !self.build.success {
            return Some(self.build.message.as_str());
        }
        self.run
            .as_ref()
            .filter(|r| !r.success)
            .map(|r| r.message.as_str())
    }
}

/// Run the pipeline: generate → build → find port → run.
///
/// Generation and port errors abort with `Err`; build and run failures are
/// recorded in the outcome.
pub(crate) async fn run(
    project_dir: &Path,
    flow_path: &Path,
    out: Option<PathBuf>,
) -> anyhow::Result<DeployOutcome> {
    let mut steps = Vec::new();

    let config = FlowpackConfig::load(project_dir)?;
    let store = super::template_store(project_dir, &config)?;
    let flow = Flow::from_json_file(flow_path)?;

    // Generate
    let output_root = out.unwrap_or_else(|| project_dir.join(&config.bundle.output_dir));
    let bundle = BundleGenerator::new(&store).generate(&flow, &output_root)?;
    steps.push(format!("Bundle generated: {}", bundle.display()));

    // Build
    let client = super::container_client(&config);
    let build = client.build(&bundle, &flow.name).await;
    let Some(image) = build.image_name.clone().filter(|_| build.success) else {
        steps.push(format!("Build failed: {}", build.message));
        return Ok(DeployOutcome {
            steps,
            bundle,
            build,
            run: None,
        });
    };
    steps.push(format!("Image built: {image}"));

    // Port
    let host_port = find_available_port(config.ports.start, config.ports.max)?;
    steps.push(format!("Host port: {host_port}"));

    // Run
    let run = client
        .run(&image, &container_name(&image, host_port), host_port)
        .await;
    match &run.info {
        Some(info) => steps.push(format!(
            "Container started: {} ({})",
            info.container_name, info.container_id
        )),
        None => steps.push(format!("Run failed: {}", run.message)),
    }

    Ok(DeployOutcome {
        steps,
        bundle,
        build,
        run: Some(run),
    })
}

/// Container name for a deploy: the image name plus the host port, so a
/// redeploy on a new port does not collide with the running container.
fn container_name(image: &str, host_port: u16) -> String {
    format!("{image}-{host_port}")
}
