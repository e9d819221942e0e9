//! Harness configuration.

use std::time::Duration;

use smoke_common::ContainerName;

use super::handle::RunSpec;
use crate::monitor::ReadinessMonitor;

/// Image tag exercised when none is given.
pub const DEFAULT_IMAGE_TAG: &str = "local/test-image:latest";

/// Harness configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Image under test.
    pub image_tag: String,
    /// Name given to the container.
    pub container_name: ContainerName,
    /// Status refreshes allowed while the container is still `created`.
    pub max_attempts: u32,
    /// Delay between refreshes.
    pub poll_interval: Duration,
    /// Bound on the exit wait; `None` waits indefinitely.
    pub exit_timeout: Option<Duration>,
    /// Whether checks marked slow run.
    pub run_slow: bool,
    /// Whether each check is wrapped in a GitHub Actions log group.
    pub log_groups: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            image_tag: DEFAULT_IMAGE_TAG.to_string(),
            container_name: ContainerName::default(),
            max_attempts: ReadinessMonitor::DEFAULT_MAX_ATTEMPTS,
            poll_interval: ReadinessMonitor::DEFAULT_POLL_INTERVAL,
            exit_timeout: None,
            run_slow: false,
            log_groups: false,
        }
    }
}

impl HarnessConfig {
    /// Set the image under test.
    #[must_use]
    pub fn with_image_tag(mut self, image_tag: impl Into<String>) -> Self {
        self.image_tag = image_tag.into();
        self
    }

    /// Set the container name.
    #[must_use]
    pub fn with_container_name(mut self, name: ContainerName) -> Self {
        self.container_name = name;
        self
    }

    /// Set the refresh budget.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay between refreshes.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Bound the exit wait.
    #[must_use]
    pub fn with_exit_timeout(mut self, timeout: Duration) -> Self {
        self.exit_timeout = Some(timeout);
        self
    }

    /// Run checks marked slow.
    #[must_use]
    pub fn with_run_slow(mut self, run_slow: bool) -> Self {
        self.run_slow = run_slow;
        self
    }

    /// Wrap checks in GitHub Actions log groups.
    #[must_use]
    pub fn with_log_groups(mut self, log_groups: bool) -> Self {
        self.log_groups = log_groups;
        self
    }

    /// The monitor these settings describe.
    #[must_use]
    pub fn monitor(&self) -> ReadinessMonitor {
        let monitor = ReadinessMonitor::new(self.max_attempts, self.poll_interval);
        match self.exit_timeout {
            Some(timeout) => monitor.with_exit_timeout(timeout),
            None => monitor,
        }
    }

    /// The container to run.
    #[must_use]
    pub fn run_spec(&self) -> RunSpec {
        RunSpec::new(self.image_tag.clone(), self.container_name.clone())
    }
}
