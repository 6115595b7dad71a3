use crate::runtime::RuntimeError;

/// Abstraction over container runtime CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait RuntimeExecutor: Send + Sync {
    /// Execute a runtime command and capture stdout.
    ///
    /// A nonzero exit becomes [`RuntimeError::CommandFailed`] carrying the
    /// captured stderr.
    async fn exec(&self, args: &[String]) -> Result<String, RuntimeError>;
}

/// Runs the real runtime CLI (`docker`, `podman`, ...) as a subprocess.
pub struct RealExecutor {
    program: String,
}

impl RealExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl RuntimeExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, RuntimeError> {
        use std::process::Stdio;

        tracing::debug!(program = %self.program, ?args, "exec");
        let output = tokio::process::Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| RuntimeError::NotFound {
                program: self.program.clone(),
                source: e,
            })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| RuntimeError::InvalidUtf8 {
                program: self.program.clone(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(RuntimeError::CommandFailed {
                program: self.program.clone(),
                args: args.to_vec(),
                stderr,
            })
        }
    }
}
