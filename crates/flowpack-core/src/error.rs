use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes shared by every flowpack crate.
///
/// Each crate keeps its own error enum; `kind()` on those enums maps the
/// variant onto one of these classes so a CLI or API layer can decide how to
/// present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or unusable template/asset.
    Configuration,
    /// Malformed graph payload or missing required flow fields.
    Validation,
    /// Filesystem failure.
    Io,
    /// Container runtime not installed or not reachable.
    ExternalToolUnavailable,
    /// Container runtime invoked but exited nonzero.
    ExternalToolFailure,
    /// No free port in the requested range.
    ResourceExhausted,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Configuration => "configuration error",
            Self::Validation => "validation error",
            Self::Io => "I/O error",
            Self::ExternalToolUnavailable => "external tool unavailable",
            Self::ExternalToolFailure => "external tool failure",
            Self::ResourceExhausted => "resource exhausted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Flow records ──
    #[error("failed to read flow file {path}")]
    FlowRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse flow file {path}")]
    FlowParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("flow is missing required field `{0}`")]
    MissingFlowField(&'static str),

    #[error("name {0:?} contains no characters usable as an identifier")]
    InvalidName(String),

    #[error("graph payload is not valid JSON")]
    MalformedGraph { source: serde_json::Error },

    #[error("graph payload must be a JSON object, found {found}")]
    GraphNotObject { found: &'static str },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigLoad { .. } | Self::FlowRead { .. } => ErrorKind::Io,
            Self::ConfigParse { .. } => ErrorKind::Configuration,
            Self::FlowParse { .. }
            | Self::MissingFlowField(_)
            | Self::InvalidName(_)
            | Self::MalformedGraph { .. }
            | Self::GraphNotObject { .. } => ErrorKind::Validation,
        }
    }
}
