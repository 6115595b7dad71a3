use std::path::{Path, PathBuf};

use flowpack_core::{ErrorKind, Flow, SERVICE_PORT};
use serde::Serialize;

use crate::template::{TEMPLATES, TemplateError, TemplateStore};

/// Suffix appended to the sanitized flow name to form the bundle directory.
pub const BUNDLE_SUFFIX: &str = "_flow_app";

/// Variables available to every bundle template.
///
/// Plain fields are for prose (README). Fields ending in `_literal` are
/// already quoted string literals and are the only form that may be
/// interpolated into generated source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateVars {
    pub flow_id: String,
    pub flow_name: String,
    pub flow_description: String,
    pub image_name: String,
    pub service_port: u16,
    pub flow_id_literal: String,
    pub flow_name_literal: String,
    pub flow_description_literal: String,
    pub graph_literal: String,
    /// Quoted for Dockerfile instructions, with `$` escaped against
    /// variable expansion.
    pub flow_id_label: String,
    pub flow_name_label: String,
}

impl TemplateVars {
    /// Validate `flow` and derive the template variables from it.
    pub fn from_flow(flow: &Flow) -> Result<Self, GenerateError> {
        flow.validate().map_err(|e| GenerateError::InvalidFlow { source: e })?;
        let graph = flow
            .graph()
            .map_err(|e| GenerateError::InvalidFlow { source: e })?;

        let description = flow.description_or_default();
        Ok(Self {
            flow_id: flow.id.clone(),
            flow_name: flow.name.clone(),
            flow_description: description.to_owned(),
            image_name: flow.slug(),
            service_port: SERVICE_PORT,
            flow_id_literal: source_literal(&flow.id),
            flow_name_literal: source_literal(&flow.name),
            flow_description_literal: source_literal(description),
            graph_literal: source_literal(graph.as_str()),
            flow_id_label: dockerfile_literal(&flow.id),
            flow_name_label: dockerfile_literal(&flow.name),
        })
    }
}

/// Quote `text` as a double-quoted string literal.
///
/// JSON string escapes are a subset of what Python and Dockerfile string
/// literals accept, so the result embeds safely in either.
fn source_literal(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}

/// Quote `text` for a Dockerfile value. Docker expands `$VAR` inside double
/// quotes, so `$` is escaped on top of the JSON quoting.
fn dockerfile_literal(text: &str) -> String {
    source_literal(text).replace('$', "\\$")
}

/// Directory a flow's bundle is generated into under `output_root`.
pub fn bundle_dir(output_root: &Path, flow: &Flow) -> PathBuf {
    output_root.join(format!("{}{BUNDLE_SUFFIX}", flow.slug()))
}

/// Renders a flow into a service bundle on disk.
pub struct BundleGenerator<'a> {
    store: &'a TemplateStore,
}

impl<'a> BundleGenerator<'a> {
    pub fn new(store: &'a TemplateStore) -> Self {
        Self { store }
    }

    /// Render every template for `flow` without touching the filesystem.
    ///
    /// Returns `(output path relative to the bundle, contents)` in render order.
    pub fn render(&self, flow: &Flow) -> Result<Vec<(&'static str, String)>, GenerateError> {
        let vars = TemplateVars::from_flow(flow)?;
        let context = tera::Context::from_serialize(&vars).map_err(|e| GenerateError::Render {
            template: "<context>".to_owned(),
            detail: tera_error_detail(&e),
        })?;

        let mut files = Vec::with_capacity(TEMPLATES.len());
        for tpl in TEMPLATES {
            let text = self
                .store
                .get(tpl.name)
                .map_err(|e| GenerateError::Template { source: e })?;
            let rendered =
                tera::Tera::one_off(text, &context, false).map_err(|e| GenerateError::Render {
                    template: tpl.name.to_owned(),
                    detail: tera_error_detail(&e),
                })?;
            files.push((tpl.output_path, rendered));
        }

        Ok(files)
    }

    /// Generate the bundle for `flow` under `output_root` and return its path.
    ///
    /// A previous bundle at the same path is removed first. All templates are
    /// rendered before anything is written, so a template or validation
    /// failure leaves the filesystem untouched.
    pub fn generate(&self, flow: &Flow, output_root: &Path) -> Result<PathBuf, GenerateError> {
        let files = self.render(flow)?;
        let bundle_dir = bundle_dir(output_root, flow);

        // Clean previous bundle
        if bundle_dir.exists() {
            std::fs::remove_dir_all(&bundle_dir).map_err(|e| GenerateError::Cleanup {
                path: bundle_dir.clone(),
                source: e,
            })?;
        }
        std::fs::create_dir_all(&bundle_dir).map_err(|e| GenerateError::Create {
            path: bundle_dir.clone(),
            source: e,
        })?;

        for (relative_path, contents) in &files {
            let dst = bundle_dir.join(relative_path);
            if let Some(parent) = dst.parent() {
                std::fs::create_dir_all(parent).map_err(|e| GenerateError::Create {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
            std::fs::write(&dst, contents).map_err(|e| GenerateError::Write {
                path: dst.clone(),
                source: e,
            })?;
            tracing::debug!(file = %dst.display(), bytes = contents.len(), "wrote bundle file");
        }

        tracing::info!(
            flow_id = %flow.id,
            bundle = %bundle_dir.display(),
            "generated bundle"
        );
        Ok(bundle_dir)
    }
}

/// Flatten a Tera error and its source chain into one line.
fn tera_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }
    details.join(" | ")
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid flow: {source}")]
    InvalidFlow { source: flowpack_core::Error },

    #[error("missing required template: {source}")]
    Template { source: TemplateError },

    #[error("failed to render template '{template}': {detail}")]
    Render { template: String, detail: String },

    #[error("failed to clean up bundle directory {path}")]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory {path}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFlow { source } => source.kind(),
            Self::Template { .. } | Self::Render { .. } => ErrorKind::Configuration,
            Self::Cleanup { .. } | Self::Create { .. } | Self::Write { .. } => ErrorKind::Io,
        }
    }
}
