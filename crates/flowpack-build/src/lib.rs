//! Bundle generation, archiving, and template eject for flowpack.
//!
//! # Generate pipeline
//!
//! ```text
//! flowpack generate flow.json
//!   1. Validate    ── Flow::validate + GraphPayload::parse
//!   2. Variables   ── TemplateVars::from_flow (quoted literals for source files)
//!   3. Render      ── TemplateStore → Tera, all five templates in memory
//!   4. Write       ── <out>/<slug>_flow_app/ (previous bundle removed first)
//!   5. Archive     ── <out>/<slug>_flow_app.zip (with --zip)
//! ```
//!
//! # Bundle layout
//!
//! ```text
//! <slug>_flow_app/
//!   app/main.py        entrypoint
//!   app/flow.py        flow loader, graph payload embedded
//!   requirements.txt   dependency manifest
//!   README.md
//!   Dockerfile         installs requirements.txt, serves app.main:app
//! ```
//!
//! # Templates
//!
//! The five templates are compiled in. An override directory (configured, or
//! ejected to `.flowpack/templates/`) replaces them file by file.

pub mod archive;
pub mod bundle;
pub mod eject;
pub mod template;

pub use archive::{ArchiveError, archive_path, create_archive, extract_archive};
pub use bundle::{BundleGenerator, GenerateError, TemplateVars, bundle_dir};
pub use eject::{EjectError, eject_templates, ejected_template_dir};
pub use template::{TemplateError, TemplateStore};
