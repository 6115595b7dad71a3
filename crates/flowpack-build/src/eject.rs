use std::path::{Path, PathBuf};

use flowpack_core::ErrorKind;

use crate::template::TEMPLATES;

/// Ejects the embedded bundle templates into the project directory.
///
/// After ejecting, generation reads templates from `.flowpack/templates/`
/// instead of the embedded set, so they can be edited in place.
pub fn eject_templates(project_dir: &Path) -> Result<PathBuf, EjectError> {
    let template_dir = template_dir(project_dir);
    if has_templates(&template_dir) {
        return Err(EjectError::AlreadyEjected(template_dir));
    }

    std::fs::create_dir_all(&template_dir).map_err(|e| EjectError::CreateDir {
        path: template_dir.clone(),
        source: e,
    })?;

    for tpl in TEMPLATES {
        let path = template_dir.join(tpl.file_name);
        std::fs::write(&path, tpl.source())
            .map_err(|e| EjectError::Write { path, source: e })?;
    }

    tracing::info!(dir = %template_dir.display(), "ejected templates");
    Ok(template_dir)
}

/// The ejected template directory, if the project has one.
pub fn ejected_template_dir(project_dir: &Path) -> Option<PathBuf> {
    let dir = template_dir(project_dir);
    has_templates(&dir).then_some(dir)
}

fn template_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(".flowpack").join("templates")
}

fn has_templates(dir: &Path) -> bool {
    TEMPLATES
        .iter()
        .any(|tpl| dir.join(tpl.file_name).exists())
}

#[derive(Debug, thiserror::Error)]
pub enum EjectError {
    #[error("failed to create template directory at {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("templates already ejected at {0}; edit them directly or delete to re-eject")]
    AlreadyEjected(PathBuf),
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl EjectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyEjected(_) => ErrorKind::Configuration,
            Self::CreateDir { .. } | Self::Write { .. } => ErrorKind::Io,
        }
    }
}
