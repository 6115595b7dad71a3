use flowpack_core::ErrorKind;
use serde::Serialize;

/// Outcome of an image build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildResult {
    pub success: bool,
    pub message: String,
    /// Sanitized image name actually built; set on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl BuildResult {
    pub fn ok(image_name: String, message: String) -> Self {
        Self {
            success: true,
            message,
            image_name: Some(image_name),
            error_kind: None,
        }
    }

    pub fn failed(message: String, kind: ErrorKind) -> Self {
        Self {
            success: false,
            message,
            image_name: None,
            error_kind: Some(kind),
        }
    }
}

/// A running container started by flowpack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub container_id: String,
    pub container_name: String,
    pub image_name: String,
    pub host_port: u16,
    pub url: String,
}

/// Outcome of a container run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub success: bool,
    pub message: String,
    /// Set on success only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<ContainerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl RunResult {
    pub fn ok(message: String, info: ContainerInfo) -> Self {
        Self {
            success: true,
            message,
            info: Some(info),
            error_kind: None,
        }
    }

    pub fn failed(message: String, kind: ErrorKind) -> Self {
        Self {
            success: false,
            message,
            info: None,
            error_kind: Some(kind),
        }
    }
}
