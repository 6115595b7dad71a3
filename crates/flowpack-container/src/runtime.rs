use flowpack_core::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("container runtime '{program}' not found on PATH")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} command failed: {args:?}\n{stderr}")]
    CommandFailed {
        program: String,
        args: Vec<String>,
        stderr: String,
    },

    #[error("{program} output was not valid UTF-8")]
    InvalidUtf8 {
        program: String,
        source: std::string::FromUtf8Error,
    },

    #[error("unexpected {program} output: {detail}")]
    UnexpectedOutput { program: String, detail: String },
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::ExternalToolUnavailable,
            _ => ErrorKind::ExternalToolFailure,
        }
    }

    /// Text worth showing a user: the runtime's stderr for failed commands,
    /// the error message otherwise.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::CommandFailed { stderr, .. } => stderr.trim().to_owned(),
            other => other.to_string(),
        }
    }
}
