//! Container readiness monitoring.
//!
//! Two waits, kept separate so each can be checked on its own:
//!
//! - [`ReadinessMonitor::await_left_created`] polls until the container is
//!   no longer `created`, within a fixed budget of refreshes. Running out of
//!   budget is not an error; the caller inspects the final status.
//! - [`ReadinessMonitor::await_clean_exit`] blocks until the container exits
//!   and returns its exit status.

use std::time::Duration;

use smoke_common::{ContainerStatus, ExitStatus, SmokeError, SmokeResult};

use crate::runtime::ContainerHandle;

/// Where polling stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Refreshes performed.
    pub attempts: u32,
    /// Status after the last refresh.
    pub status: ContainerStatus,
}

impl PollOutcome {
    /// Returns true if the container settled in `running` or `exited`.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.status.is_ready()
    }
}

/// Bounded status polling and exit waiting for one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessMonitor {
    max_attempts: u32,
    poll_interval: Duration,
    exit_timeout: Option<Duration>,
}

impl Default for ReadinessMonitor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_POLL_INTERVAL)
    }
}

impl ReadinessMonitor {
    /// Refreshes allowed by default.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    /// Delay between refreshes by default.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

    /// Create a monitor with an unbounded exit wait.
    #[must_use]
    pub const fn new(max_attempts: u32, poll_interval: Duration) -> Self {
        Self {
            max_attempts,
            poll_interval,
            exit_timeout: None,
        }
    }

    /// Bound the exit wait.
    #[must_use]
    pub const fn with_exit_timeout(mut self, timeout: Duration) -> Self {
        self.exit_timeout = Some(timeout);
        self
    }

    /// Refresh budget.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between refreshes.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Bound on the exit wait, if any.
    #[must_use]
    pub const fn exit_timeout(&self) -> Option<Duration> {
        self.exit_timeout
    }

    /// Poll until the container leaves `created` or the budget runs out.
    ///
    /// Sleeps `poll_interval` between refreshes, never after the last one, so
    /// this returns within `max_attempts * poll_interval` plus the time spent
    /// in the refreshes themselves. With a budget of zero nothing is
    /// refreshed and the cached status is reported.
    ///
    /// # Errors
    ///
    /// Propagates refresh failures from the runtime.
    pub async fn await_left_created<H>(&self, handle: &mut H) -> SmokeResult<PollOutcome>
    where
        H: ContainerHandle + ?Sized,
    {
        let mut attempts = 0;

        while attempts < self.max_attempts {
            handle.reload().await?;
            attempts += 1;

            let status = handle.status();
            tracing::debug!(
                container = %handle.name(),
                attempt = attempts,
                status = %status,
                "Polled container status"
            );

            if !status.is_created() {
                break;
            }
            if attempts < self.max_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        let outcome = PollOutcome {
            attempts,
            status: handle.status(),
        };

        if outcome.status.is_created() {
            tracing::warn!(
                container = %handle.name(),
                attempts,
                "Container still created after polling budget"
            );
        }

        Ok(outcome)
    }

    /// Wait for the container to exit and return its exit status.
    ///
    /// Not retried. Without an exit timeout this waits as long as the
    /// runtime does.
    ///
    /// # Errors
    ///
    /// Propagates wait failures from the runtime, and returns
    /// [`SmokeError::WaitTimedOut`] when the exit timeout elapses first.
    pub async fn await_clean_exit<H>(&self, handle: &H) -> SmokeResult<ExitStatus>
    where
        H: ContainerHandle + ?Sized,
    {
        tracing::info!(container = %handle.name(), "Waiting for container to exit");

        let exit = match self.exit_timeout {
            None => handle.wait().await?,
            Some(timeout) => tokio::time::timeout(timeout, handle.wait())
                .await
                .map_err(|_| SmokeError::WaitTimedOut {
                    name: handle.name().to_string(),
                    timeout_secs: timeout.as_secs(),
                })??,
        };

        tracing::info!(
            container = %handle.name(),
            exit_code = exit.code,
            "Container exited"
        );

        Ok(exit)
    }
}
