use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One generated file: its template name, the file holding the template
/// text, and where the rendered output lands inside a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateFile {
    pub name: &'static str,
    pub file_name: &'static str,
    pub output_path: &'static str,
    source: &'static str,
}

impl TemplateFile {
    /// Template text compiled into the binary.
    pub fn source(&self) -> &'static str {
        self.source
    }
}

pub const ENTRYPOINT: &str = "entrypoint";
pub const FLOW_LOADER: &str = "flow_loader";
pub const MANIFEST: &str = "manifest";
pub const README: &str = "readme";
pub const CONTAINER_DEFINITION: &str = "container_definition";

/// Every template a bundle needs, in render order.
pub const TEMPLATES: &[TemplateFile] = &[
    TemplateFile {
        name: ENTRYPOINT,
        file_name: "main.py.tera",
        output_path: "app/main.py",
        source: include_str!("../templates/main.py.tera"),
    },
    TemplateFile {
        name: FLOW_LOADER,
        file_name: "flow.py.tera",
        output_path: "app/flow.py",
        source: include_str!("../templates/flow.py.tera"),
    },
    TemplateFile {
        name: MANIFEST,
        file_name: "requirements.txt.tera",
        output_path: "requirements.txt",
        source: include_str!("../templates/requirements.txt.tera"),
    },
    TemplateFile {
        name: README,
        file_name: "README.md.tera",
        output_path: "README.md",
        source: include_str!("../templates/README.md.tera"),
    },
    TemplateFile {
        name: CONTAINER_DEFINITION,
        file_name: "Dockerfile.tera",
        output_path: "Dockerfile",
        source: include_str!("../templates/Dockerfile.tera"),
    },
];

/// Named template texts used to render a bundle.
///
/// Starts from the set compiled into the binary; an override directory can
/// replace individual templates by file name.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: HashMap<String, String>,
}

impl TemplateStore {
    pub fn embedded() -> Self {
        let templates = TEMPLATES
            .iter()
            .map(|tpl| (tpl.name.to_owned(), tpl.source.to_owned()))
            .collect();
        Self { templates }
    }

    /// Embedded templates, with any `<dir>/<file_name>` that exists taking
    /// precedence. A missing directory leaves the embedded set untouched.
    pub fn with_override_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut store = Self::embedded();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "template override directory not present");
            return Ok(store);
        }

        for tpl in TEMPLATES {
            let path = dir.join(tpl.file_name);
            if !path.is_file() {
                continue;
            }
            let text =
                std::fs::read_to_string(&path).map_err(|e| TemplateError::ReadOverride {
                    path: path.clone(),
                    source: e,
                })?;
            tracing::debug!(
                template = tpl.name,
                path = %path.display(),
                "using template override"
            );
            store.templates.insert(tpl.name.to_owned(), text);
        }

        Ok(store)
    }

    /// Template text by name.
    pub fn get(&self, name: &str) -> Result<&str, TemplateError> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| TemplateError::NotFound(name.to_owned()))
    }

    /// Replace or add a template.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.templates.insert(name.into(), text.into());
    }

    /// Drop a template; generation then fails naming it.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.templates.remove(name)
    }

    /// Names of the required templates, in render order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        TEMPLATES.iter().map(|tpl| tpl.name)
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::embedded()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template '{0}' not found")]
    NotFound(String),

    #[error("failed to read template override {path}")]
    ReadOverride {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl TemplateError {
    pub fn kind(&self) -> flowpack_core::ErrorKind {
        match self {
            Self::NotFound(_) => flowpack_core::ErrorKind::Configuration,
            Self::ReadOverride { .. } => flowpack_core::ErrorKind::Io,
        }
    }
}
