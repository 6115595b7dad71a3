use crate::executor::{RealExecutor, RuntimeExecutor};
use crate::result::{BuildResult, ContainerInfo, RunResult};
use crate::runtime::RuntimeError;
use flowpack_core::{ErrorKind, SERVICE_PORT, sanitize_name};
use std::path::Path;

/// Host port used when the caller does not pick one.
pub const DEFAULT_HOST_PORT: u16 = 8000;

/// Container runtime operations, parameterized over the executor for
/// testability.
pub struct ContainerClient<E: RuntimeExecutor = RealExecutor> {
    runtime: String,
    executor: E,
}

impl ContainerClient<RealExecutor> {
    /// Client driving the given runtime CLI (`docker`, `podman`, ...).
    pub fn new(runtime: &str) -> Self {
        Self {
            runtime: runtime.to_owned(),
            executor: RealExecutor::new(runtime),
        }
    }
}

impl Default for ContainerClient<RealExecutor> {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl<E: RuntimeExecutor> ContainerClient<E> {
    /// `runtime` is only used to label messages; commands go to `executor`.
    pub fn with_executor(runtime: &str, executor: E) -> Self {
        Self {
            runtime: runtime.to_owned(),
            executor,
        }
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    // ── Probe ──

    /// Lightweight availability check; returns the runtime's version line.
    pub async fn probe(&self) -> Result<String, RuntimeError> {
        let version = self.executor.exec(&args(["--version"])).await?;
        Ok(version.trim().to_owned())
    }

    /// Probe, turning any failure into the user-facing "unavailable" message.
    async fn require_runtime(&self) -> Result<(), String> {
        match self.probe().await {
            Ok(version) => {
                tracing::debug!(runtime = %self.runtime, %version, "runtime available");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(runtime = %self.runtime, error = %e, "runtime unavailable");
                Err(format!(
                    "container runtime '{}' is not available: {}",
                    self.runtime,
                    e.diagnostic()
                ))
            }
        }
    }

    // ── Build ──

    /// Build an image from `bundle_dir`, tagged with the sanitized `image_name`.
    ///
    /// Never fails: problems are reported in the returned [`BuildResult`].
    /// Callers must run the returned `image_name`, which may differ from the
    /// requested one.
    pub async fn build(&self, bundle_dir: &Path, image_name: &str) -> BuildResult {
        if let Err(message) = self.require_runtime().await {
            return BuildResult::failed(message, ErrorKind::ExternalToolUnavailable);
        }

        let image = sanitize_name(image_name);
        if image.is_empty() {
            return BuildResult::failed(
                format!("image name {image_name:?} has no characters usable in an image tag"),
                ErrorKind::Validation,
            );
        }

        let Some(context) = bundle_dir.to_str() else {
            return BuildResult::failed(
                format!("bundle path is not valid UTF-8: {}", bundle_dir.display()),
                ErrorKind::Validation,
            );
        };

        tracing::info!(%image, bundle = %bundle_dir.display(), "building image");
        match self
            .executor
            .exec(&args(["build", "-t", &image, context]))
            .await
        {
            Ok(_) => {
                tracing::info!(%image, "image built");
                BuildResult::ok(image.clone(), format!("built image '{image}'"))
            }
            Err(e) => {
                tracing::warn!(%image, error = %e, "image build failed");
                BuildResult::failed(
                    format!("build of image '{image}' failed:\n{}", e.diagnostic()),
                    e.kind(),
                )
            }
        }
    }

    // ── Run ──

    /// Start a detached container from `image_name`, publishing `host_port`
    /// on the service port.
    ///
    /// Never fails: problems are reported in the returned [`RunResult`].
    /// The container is left running; stopping or removing it is up to the
    /// caller.
    pub async fn run(&self, image_name: &str, container_name: &str, host_port: u16) -> RunResult {
        if let Err(message) = self.require_runtime().await {
            return RunResult::failed(message, ErrorKind::ExternalToolUnavailable);
        }

        let image = sanitize_name(image_name);
        let container = sanitize_name(container_name);
        if image.is_empty() || container.is_empty() {
            return RunResult::failed(
                format!(
                    "image {image_name:?} and container {container_name:?} need characters usable as identifiers"
                ),
                ErrorKind::Validation,
            );
        }

        let mapping = format!("{host_port}:{SERVICE_PORT}");
        tracing::info!(%image, %container, %mapping, "starting container");
        let started = match self
            .executor
            .exec(&args([
                "run", "-d", "-p", &mapping, "--name", &container, &image,
            ]))
            .await
        {
            Ok(stdout) => stdout.trim().to_owned(),
            Err(e) => {
                tracing::warn!(%container, error = %e, "container run failed");
                return RunResult::failed(
                    format!("failed to start container '{container}':\n{}", e.diagnostic()),
                    e.kind(),
                );
            }
        };

        let container_id = match self.inspect(&container).await {
            Ok(Some(id)) => id,
            Ok(None) => started,
            Err(e) => {
                tracing::warn!(%container, error = %e, "container inspect failed");
                return RunResult::failed(
                    format!("failed to inspect container '{container}':\n{}", e.diagnostic()),
                    e.kind(),
                );
            }
        };

        let url = format!("http://localhost:{host_port}");
        tracing::info!(%container, %container_id, %url, "container running");
        RunResult::ok(
            format!("container '{container}' running at {url}"),
            ContainerInfo {
                container_id,
                container_name: container,
                image_name: image,
                host_port,
                url,
            },
        )
    }

    // ── Inspect ──

    /// Container id reported by `<runtime> inspect`, if the output carries one.
    pub async fn inspect(&self, container: &str) -> Result<Option<String>, RuntimeError> {
        let output = self
            .executor
            .exec(&args(["inspect", container]))
            .await?;

        let value: serde_json::Value =
            serde_json::from_str(&output).map_err(|e| RuntimeError::UnexpectedOutput {
                program: self.runtime.clone(),
                detail: format!("inspect output is not JSON: {e}"),
            })?;

        // docker and podman print an array with one object per container.
        let record = match &value {
            serde_json::Value::Array(items) => items.first(),
            other => Some(other),
        };

        Ok(record
            .and_then(|r| r.get("Id"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned))
    }

    // ── Doctor ──

    /// Run all diagnostic checks without early return.
    pub async fn doctor(&self) -> DoctorReport {
        let mut report = DoctorReport::default();

        match self.probe().await {
            Ok(version) => report.runtime = CheckResult::ok(&version),
            Err(e) => {
                report.runtime = CheckResult::fail(&e.to_string());
                report.daemon = CheckResult::fail("skipped: runtime not available");
                return report;
            }
        }

        match self
            .executor
            .exec(&args(["info", "--format", "{{.ServerVersion}}"]))
            .await
        {
            Ok(v) if !v.trim().is_empty() => {
                report.daemon = CheckResult::ok(&format!("server {}", v.trim()));
            }
            Ok(_) => report.daemon = CheckResult::fail("no server version reported"),
            Err(e) => report.daemon = CheckResult::fail(&e.diagnostic()),
        }

        report
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub runtime: CheckResult,
    pub daemon: CheckResult,
    pub config_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.runtime.passed && self.daemon.passed && self.config_file.passed
    }
}

impl std::fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[{}] runtime  {}", self.runtime.icon(), self.runtime.detail)?;
        writeln!(f, "[{}] daemon   {}", self.daemon.icon(), self.daemon.detail)?;
        write!(
            f,
            "[{}] config   {}",
            self.config_file.icon(),
            self.config_file.detail
        )
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}
