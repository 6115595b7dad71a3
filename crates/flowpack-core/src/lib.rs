//! Core types and configuration for flowpack.
//!
//! This crate defines the flow record handed in by the persistence layer
//! ([`Flow`]), graph payload validation ([`GraphPayload`]), container name
//! sanitization ([`sanitize_name`]), the `flowpack.toml` schema
//! ([`FlowpackConfig`]), and the shared error taxonomy ([`ErrorKind`]).

pub mod config;
pub mod error;
pub mod flow;
pub mod sanitize;

pub use config::{BundleConfig, ContainerConfig, FlowpackConfig, PortRange};
pub use error::{Error, ErrorKind, Result};
pub use flow::{Flow, GraphPayload};
pub use sanitize::{is_sanitized, sanitize_name};

/// Port the generated service listens on inside its container.
pub const SERVICE_PORT: u16 = 8000;
