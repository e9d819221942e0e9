//! Container runtime access.
//!
//! This module provides the handle and runtime seams, the Docker
//! implementation, harness configuration and scoped containers.

mod config;
mod docker;
mod handle;
mod scope;

pub use config::{DEFAULT_IMAGE_TAG, HarnessConfig};
pub use docker::{DockerContainer, DockerRuntime};
pub use handle::{ContainerHandle, ContainerRuntime, RunSpec};
pub use scope::with_container;
