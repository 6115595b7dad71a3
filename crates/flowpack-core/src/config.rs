use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the per-project configuration file.
pub const CONFIG_FILE: &str = "flowpack.toml";

/// flowpack.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowpackConfig {
    #[serde(default)]
    pub bundle: BundleConfig,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub ports: PortRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Root directory bundles are generated into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory whose files replace the embedded templates by name.
    /// When None, an ejected `.flowpack/templates/` is used if present.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Container runtime CLI (docker, podman, ...)
    #[serde(default = "default_runtime")]
    pub runtime: String,
}

/// Inclusive host port range scanned for a free port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortRange {
    #[serde(default = "default_port_start")]
    pub start: u16,
    #[serde(default = "default_port_max")]
    pub max: u16,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            template_dir: None,
        }
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
        }
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            start: default_port_start(),
            max: default_port_max(),
        }
    }
}

impl FlowpackConfig {
    /// Load from flowpack.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            let config = toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path.clone(),
                source: e,
            })?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("flowpack-out")
}

fn default_runtime() -> String {
    "docker".to_owned()
}

fn default_port_start() -> u16 {
    8000
}

fn default_port_max() -> u16 {
    9000
}
