//! Package flow graphs as containerized HTTP services.
//!
//! This is the unified facade crate that re-exports all flowpack sub-crates.
//! Use feature flags to control which components are included.
//!
//! # Feature flags
//!
//! | Feature | Default | Crate | Description |
//! |---------|---------|-------|-------------|
//! | `core` | yes | [`flowpack-core`](https://crates.io/crates/flowpack-core) | Flow records, configuration, name sanitization |
//! | `build` | yes | [`flowpack-build`](https://crates.io/crates/flowpack-build) | Bundle generation, archiving, template eject |
//! | `container` | yes | [`flowpack-container`](https://crates.io/crates/flowpack-container) | Image build, container run, port finder |
//!
//! # Quick start
//!
//! ```toml
//! [dependencies]
//! flowpack = "0.1"
//! ```
//!
//! ```rust,no_run
//! use std::path::Path;
//! use flowpack::Flow;
//! use flowpack::build::{BundleGenerator, TemplateStore, create_archive};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let flow = Flow::new("3f2a9c1e", "Support Bot").with_data(r#"{"nodes": [], "edges": []}"#);
//! let store = TemplateStore::embedded();
//! let bundle = BundleGenerator::new(&store).generate(&flow, Path::new("flowpack-out"))?;
//! let archive = create_archive(&bundle)?;
//! # Ok(())
//! # }
//! ```

// Core types flattened into root namespace for convenience.
#[cfg(feature = "core")]
pub use flowpack_core::*;

/// Bundle generation, archiving, and template eject.
///
/// See [`flowpack-build`](https://crates.io/crates/flowpack-build) for details.
#[cfg(feature = "build")]
pub mod build {
    pub use flowpack_build::*;
}

/// Container image build and run drivers, plus the host port finder.
///
/// See [`flowpack-container`](https://crates.io/crates/flowpack-container) for details.
#[cfg(feature = "container")]
pub mod container {
    pub use flowpack_container::*;
}
