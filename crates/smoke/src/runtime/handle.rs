//! Seams between the harness and a container runtime.

use async_trait::async_trait;
use smoke_common::{ContainerName, ContainerStatus, ExitStatus, SmokeResult};

/// A started container, observed through the runtime.
///
/// The status is cached; [`reload`](Self::reload) refreshes it. Handles are
/// created and removed by a [`ContainerRuntime`], never by the code that
/// observes them.
#[async_trait]
pub trait ContainerHandle: Send + Sync {
    /// The container name.
    fn name(&self) -> &ContainerName;

    /// Status as of the last refresh.
    fn status(&self) -> ContainerStatus;

    /// Refresh the status from the runtime.
    async fn reload(&mut self) -> SmokeResult<()>;

    /// Block until the container reaches a terminal status.
    async fn wait(&self) -> SmokeResult<ExitStatus>;

    /// Combined stdout and stderr produced so far.
    async fn logs(&self) -> SmokeResult<String>;
}

/// Starts and removes containers.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Handle type produced by [`run`](Self::run).
    type Handle: ContainerHandle;

    /// Create and start a detached container.
    async fn run(&self, spec: &RunSpec) -> SmokeResult<Self::Handle>;

    /// Remove a container, killing it first if it is still running.
    async fn force_remove(&self, handle: &Self::Handle) -> SmokeResult<()>;
}

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    /// Image reference, e.g. `local/test-image:latest`.
    pub image: String,
    /// Container name.
    pub name: ContainerName,
    /// Environment as `KEY=VALUE` pairs.
    pub env: Vec<String>,
}

impl RunSpec {
    /// Run `image` under `name` with an empty environment.
    pub fn new(image: impl Into<String>, name: ContainerName) -> Self {
        Self {
            image: image.into(),
            name,
            env: Vec::new(),
        }
    }

    /// Add an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push(format!("{key}={value}"));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_spec_env() {
        let spec = RunSpec::new("local/test-image:latest", ContainerName::default())
            .with_env("RUST_LOG", "debug");
        assert_eq!(spec.env, vec!["RUST_LOG=debug".to_string()]);
        assert_eq!(spec.name.as_str(), "main");
    }
}
