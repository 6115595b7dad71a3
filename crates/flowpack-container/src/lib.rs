//! Container runtime drivers for flowpack.
//!
//! Every runtime interaction (version probe, build, run, inspect) goes
//! through [`RuntimeExecutor`], so tests drive [`ContainerClient`] with a
//! mock instead of a real `docker`/`podman` install. Build and run resolve
//! to [`BuildResult`]/[`RunResult`] rather than errors.

pub mod client;
pub mod executor;
pub mod port;
pub mod result;
pub mod runtime;

pub use client::{CheckResult, ContainerClient, DEFAULT_HOST_PORT, DoctorReport};
pub use executor::{RealExecutor, RuntimeExecutor};
pub use port::{PortError, find_available_port, is_port_in_use};
pub use result::{BuildResult, ContainerInfo, RunResult};
pub use runtime::RuntimeError;
